//! Integration tests for recur-core
//!
//! These tests exercise the full import → detect → confirm → store workflow.

use recur_core::{
    confirm, detect_subscriptions, detect_subscriptions_with_report,
    import::read_transactions_csv, load_subscriptions, save_subscriptions, AmountType,
    BillingFrequency, Confirmation, DetectionConfig, JsonFileStore, SubscriptionStore,
};

/// Six months of a mixed Swedish bank statement with:
/// - Netflix and Spotify at fixed monthly prices (noisy descriptions)
/// - A variable electricity bill
/// - An annual insurance premium (only twice)
/// - Salary and scattered grocery runs that must not be detected
fn statement_csv() -> &'static str {
    "id,date,amount,description,category_id,subcategory_id
1,2024-01-15,-149.00,NETFLIX COM /24-01-15,entertainment,streaming
2,2024-01-20,-59.00,KORTKÖP 240120 SPOTIFY,entertainment,music
3,2024-01-25,25000.00,SALARY EMPLOYER,,
4,2024-01-28,-612.40,AUTOGIRO ELLEVIO,housing,electricity
5,2024-02-03,-412.18,ICA KVANTUM,,
6,2024-02-15,-149.00,NETFLIX COM /24-02-15,entertainment,streaming
7,2024-02-20,-59.00,KORTKÖP 240220 SPOTIFY,entertainment,music
8,2024-02-25,25000.00,SALARY EMPLOYER,,
9,2024-02-28,-701.90,AUTOGIRO ELLEVIO,housing,electricity
10,2024-03-09,-88.50,ICA KVANTUM,,
11,2024-03-15,-149.00,NETFLIX COM /24-03-15,entertainment,streaming
12,2024-03-20,-59.00,KORTKÖP 240320 SPOTIFY,entertainment,music
13,2024-03-25,25000.00,SALARY EMPLOYER,,
14,2024-03-28,-655.00,AUTOGIRO ELLEVIO,housing,electricity
15,2024-04-15,-149.00,NETFLIX COM /24-04-15,entertainment,streaming
16,2024-04-20,-59.00,KORTKÖP 240420 SPOTIFY,entertainment,music
17,2024-04-25,25000.00,SALARY EMPLOYER,,
18,2024-04-26,-1290.00,ICA KVANTUM,,
19,2024-04-28,-580.25,AUTOGIRO ELLEVIO,housing,electricity
20,2023-05-02,-2400.00,FOLKSAM REF 55512,insurance,home
21,2024-05-02,-2400.00,FOLKSAM REF 55513,insurance,home
"
}

#[test]
fn test_full_detection_workflow() {
    let transactions = read_transactions_csv(statement_csv().as_bytes()).unwrap();
    assert_eq!(transactions.len(), 21);

    let (detected, report) =
        detect_subscriptions_with_report(&transactions, &DetectionConfig::default());

    let names: Vec<&str> = detected.iter().map(|d| d.recipient_name.as_str()).collect();
    assert!(names.contains(&"Netflix Com"), "got {:?}", names);
    assert!(names.contains(&"Spotify"), "got {:?}", names);
    assert!(names.contains(&"Ellevio"), "got {:?}", names);
    assert!(names.contains(&"Folksam"), "got {:?}", names);
    assert!(!names.contains(&"Salary Employer"));
    assert!(!names.contains(&"Ica Kvantum"));

    assert_eq!(report.transactions_seen, 21);
    assert_eq!(report.expenses_considered, 17);
    assert_eq!(report.detected, detected.len());
    assert!(report.rejected_no_cadence >= 1);

    let netflix = detected
        .iter()
        .find(|d| d.recipient_name == "Netflix Com")
        .unwrap();
    assert_eq!(netflix.billing_frequency, BillingFrequency::Monthly);
    assert_eq!(netflix.amount_type, AmountType::Fixed);
    assert_eq!(netflix.category_id.as_deref(), Some("entertainment"));
    assert_eq!(netflix.subcategory_id.as_deref(), Some("streaming"));

    let folksam = detected
        .iter()
        .find(|d| d.recipient_name == "Folksam")
        .unwrap();
    assert_eq!(folksam.billing_frequency, BillingFrequency::Annual);
    assert_eq!(folksam.occurrence_count, 2);

    assert!(detected
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
}

#[test]
fn test_confirm_and_persist() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("subscriptions.json"));

    let transactions = read_transactions_csv(statement_csv().as_bytes()).unwrap();
    let detected = detect_subscriptions(&transactions);

    let mut subscriptions = load_subscriptions(&store);
    assert!(subscriptions.is_empty());

    for candidate in &detected {
        assert_eq!(
            confirm(&mut subscriptions, candidate, None),
            Confirmation::Added
        );
    }
    save_subscriptions(&store, &subscriptions);

    // A second run over the same statement recognizes everything
    let mut reloaded = store.load().unwrap();
    let ids = |subs: &[recur_core::Subscription]| -> Vec<String> {
        subs.iter().map(|s| s.id.clone()).collect()
    };
    assert_eq!(ids(&reloaded), ids(&subscriptions));
    for candidate in &detect_subscriptions(&transactions) {
        assert_eq!(
            confirm(&mut reloaded, candidate, None),
            Confirmation::AlreadyTracked
        );
    }
    assert_eq!(reloaded.len(), detected.len());
}

#[test]
fn test_detection_is_deterministic() {
    let transactions = read_transactions_csv(statement_csv().as_bytes()).unwrap();
    assert_eq!(
        detect_subscriptions(&transactions),
        detect_subscriptions(&transactions)
    );
}
