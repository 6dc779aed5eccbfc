//! Domain model for recurring-transaction rules.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PaymentMethod, Transaction, TransactionKind};

/// A template that periodically generates a real transaction.
///
/// Invariant: at most one transaction is materialized per rule per calendar
/// month. The daily processor is the only writer of `last_materialized`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub frequency: Frequency,
    /// Target day of month, 1 through 31.
    pub day_of_month: u32,
    /// The rule is inactive before this date.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub active: bool,
    #[serde(default)]
    pub last_materialized: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl RecurringRule {
    pub fn new(
        user_id: Uuid,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        kind: TransactionKind,
        day_of_month: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            category: category.into(),
            description: description.into(),
            kind,
            frequency: Frequency::default(),
            day_of_month: day_of_month.clamp(1, 31),
            start_date,
            payment_method: PaymentMethod::default(),
            active: true,
            last_materialized: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Builds the concrete transaction this rule generates for `date`.
    pub fn materialize(&self, date: NaiveDate) -> Transaction {
        Transaction::new(
            self.user_id,
            self.amount,
            self.category.clone(),
            self.description.clone(),
            self.kind,
            date,
        )
        .with_payment_method(self.payment_method)
    }
}

/// Cadence of a recurring rule. All four values are accepted and stored, but
/// only `Monthly` rules are evaluated by the processor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(label)
    }
}
