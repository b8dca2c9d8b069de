//! Grouping of expenses by normalized recipient

use std::collections::HashMap;

use crate::models::Transaction;
use crate::normalize::normalize;

/// Expenses believed to share one real-world counterparty
#[derive(Debug, Clone)]
pub struct RecipientGroup<'a> {
    /// Normalized merchant key
    pub name: String,
    /// Members in encounter order (not sorted by date)
    pub transactions: Vec<&'a Transaction>,
}

/// Partition expenses by normalized description.
///
/// Income and zero amounts are dropped. Groups come back in the order their
/// key was first seen, and members keep their input order.
pub fn group_by_recipient(transactions: &[Transaction]) -> Vec<RecipientGroup<'_>> {
    let mut groups: Vec<RecipientGroup<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        if !tx.is_expense() {
            continue;
        }

        let name = normalize(&tx.description);
        if name.is_empty() {
            continue;
        }

        match index.get(&name) {
            Some(&i) => groups[i].transactions.push(tx),
            None => {
                index.insert(name.clone(), groups.len());
                groups.push(RecipientGroup {
                    name,
                    transactions: vec![tx],
                });
            }
        }
    }

    groups
}
