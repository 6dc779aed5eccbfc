//! Persistence seam for the background jobs.
//!
//! The jobs only ever touch a [`LedgerStore`]; the reference implementations
//! here are an in-memory store and a JSON-file store built on top of it.

pub mod json_backend;
pub mod memory;

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Budget, MonthToken, RecurringRule, Transaction, TransactionKind, User};
use crate::errors::StoreError;

/// The full persisted dataset the jobs operate over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub rules: Vec<RecurringRule>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Abstraction over the collections the jobs read and write.
///
/// Implementations take `&self`; interior mutability keeps them shareable
/// across the scheduler's worker threads.
pub trait LedgerStore: Send + Sync {
    /// Rules with `active = true` and `start_date <= today`.
    fn active_rules(&self, today: NaiveDate) -> Result<Vec<RecurringRule>, StoreError>;

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), StoreError>;

    fn set_last_materialized(&self, rule_id: Uuid, date: NaiveDate) -> Result<(), StoreError>;

    /// Transactions for one user and category, of one kind, dated within `month`.
    fn transactions_in_month(
        &self,
        user_id: Uuid,
        category: &str,
        kind: TransactionKind,
        month: MonthToken,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Users whose preferences have budget alerts enabled.
    fn alert_enabled_users(&self) -> Result<Vec<User>, StoreError>;

    fn budgets_for_month(&self, user_id: Uuid, month: MonthToken)
        -> Result<Vec<Budget>, StoreError>;
}
