//! Domain models for recur

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A normalized bank transaction, as handed to the detection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub subcategory_id: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

/// Billing cadence of a recurring payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annual,
}

impl BillingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }

    /// Number of billing periods in a year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::Annual => 1,
        }
    }

    /// Whether the billing day is best described as a weekday rather than
    /// a day of the month
    pub fn bills_on_weekday(&self) -> bool {
        matches!(self, Self::Weekly | Self::Biweekly)
    }

    /// Advance a date by exactly one billing step.
    ///
    /// Month-based cadences use calendar arithmetic, so Jan 31 + 1 month
    /// lands on the last day of February.
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        let next = match self {
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Biweekly => date.checked_add_days(Days::new(14)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Annual => date.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(NaiveDate::MAX)
    }
}

impl std::str::FromStr for BillingFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" | "yearly" => Ok(Self::Annual),
            _ => Err(format!("Unknown billing frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a recurring charge has a stable price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    Fixed,
    Variable,
}

impl AmountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }
}

impl std::fmt::Display for AmountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence tier derived from the 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 75 {
            Self::High
        } else if score >= 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of recurring payment the user says this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    #[default]
    Subscription,
    Bill,
    Loan,
    Other,
}

impl RecurringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Bill => "bill",
            Self::Loan => "loan",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for RecurringType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subscription" => Ok(Self::Subscription),
            "bill" => Ok(Self::Bill),
            "loan" => Ok(Self::Loan),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown recurring type: {}", s)),
        }
    }
}

impl std::fmt::Display for RecurringType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four sub-scores that make up a confidence value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Amount consistency (0-30)
    pub amount_score: u32,
    /// Timing consistency (0-30)
    pub timing_score: u32,
    /// Number of occurrences (0-20)
    pub occurrence_score: u32,
    /// Joint timing + amount clarity (0-20)
    pub clarity_score: u32,
}

impl ConfidenceBreakdown {
    pub fn total(&self) -> u32 {
        self.amount_score + self.timing_score + self.occurrence_score + self.clarity_score
    }
}

/// A recurring payment candidate produced by the detection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSubscription {
    /// Stable id derived from recipient name and core amount
    pub id: String,
    pub recipient_name: String,
    /// Mean absolute amount, rounded to cents
    pub average_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub common_day_of_month: u32,
    /// Weekday (1 = Monday) for weekly/biweekly cadences, day of month otherwise
    pub expected_billing_day: u32,
    /// Member transaction ids, ascending by date
    pub transaction_ids: Vec<String>,
    pub occurrence_count: usize,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub confidence: u32,
    pub confidence_level: ConfidenceLevel,
    pub billing_frequency: BillingFrequency,
    /// Median relative deviation from the core amount (0-1)
    pub amount_variance: f64,
    pub amount_type: AmountType,
    pub next_expected_date: NaiveDate,
    /// Unset until the user classifies the payment
    pub recurring_type: Option<RecurringType>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub score_breakdown: ConfidenceBreakdown,
}

impl DetectedSubscription {
    pub fn with_recurring_type(mut self, recurring_type: RecurringType) -> Self {
        self.recurring_type = Some(recurring_type);
        self
    }

    /// Projected yearly spend at the average amount
    pub fn annual_cost(&self) -> f64 {
        self.average_amount * self.billing_frequency.periods_per_year() as f64
    }

    pub fn monthly_cost(&self) -> f64 {
        self.annual_cost() / 12.0
    }
}

/// A recurring payment the user has confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub recipient_name: String,
    pub average_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub common_day_of_month: u32,
    pub expected_billing_day: u32,
    pub transaction_ids: Vec<String>,
    pub occurrence_count: usize,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub confidence: u32,
    pub confidence_level: ConfidenceLevel,
    pub billing_frequency: BillingFrequency,
    pub amount_variance: f64,
    pub amount_type: AmountType,
    pub next_expected_date: NaiveDate,
    pub recurring_type: RecurringType,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub score_breakdown: ConfidenceBreakdown,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn annual_cost(&self) -> f64 {
        self.average_amount * self.billing_frequency.periods_per_year() as f64
    }

    pub fn monthly_cost(&self) -> f64 {
        self.annual_cost() / 12.0
    }
}
