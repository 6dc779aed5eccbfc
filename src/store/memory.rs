use std::sync::Mutex;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Budget, MonthToken, RecurringRule, Transaction, TransactionKind, User};
use crate::errors::StoreError;

use super::{Ledger, LedgerStore};

/// In-memory [`LedgerStore`] backed by a mutex-guarded [`Ledger`].
///
/// This is the store the test suites run against and the base the JSON
/// backend builds on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    /// Runs `f` against the guarded ledger. Lock poisoning is reported as a
    /// backend failure rather than a panic.
    fn with_ledger<T>(
        &self,
        f: impl FnOnce(&mut Ledger) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".into()))?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> Result<Ledger, StoreError> {
        self.with_ledger(|ledger| ledger.clone())
    }

    pub fn add_user(&self, user: User) -> Result<(), StoreError> {
        self.with_ledger(|ledger| ledger.users.push(user))
    }

    pub fn add_budget(&self, budget: Budget) -> Result<(), StoreError> {
        self.with_ledger(|ledger| ledger.budgets.push(budget))
    }

    pub fn add_rule(&self, rule: RecurringRule) -> Result<(), StoreError> {
        self.with_ledger(|ledger| ledger.rules.push(rule))
    }
}

impl LedgerStore for MemoryStore {
    fn active_rules(&self, today: NaiveDate) -> Result<Vec<RecurringRule>, StoreError> {
        self.with_ledger(|ledger| {
            ledger
                .rules
                .iter()
                .filter(|rule| rule.active && rule.start_date <= today)
                .cloned()
                .collect()
        })
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        self.with_ledger(|ledger| ledger.transactions.push(transaction))
    }

    fn set_last_materialized(&self, rule_id: Uuid, date: NaiveDate) -> Result<(), StoreError> {
        self.with_ledger(|ledger| {
            ledger
                .rules
                .iter_mut()
                .find(|rule| rule.id == rule_id)
                .map(|rule| rule.last_materialized = Some(date))
                .ok_or(StoreError::RuleNotFound(rule_id))
        })?
    }

    fn transactions_in_month(
        &self,
        user_id: Uuid,
        category: &str,
        kind: TransactionKind,
        month: MonthToken,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.with_ledger(|ledger| {
            ledger
                .transactions
                .iter()
                .filter(|txn| {
                    txn.user_id == user_id
                        && txn.category == category
                        && txn.kind == kind
                        && month.contains(txn.date)
                })
                .cloned()
                .collect()
        })
    }

    fn alert_enabled_users(&self) -> Result<Vec<User>, StoreError> {
        self.with_ledger(|ledger| {
            ledger
                .users
                .iter()
                .filter(|user| user.notification_preferences.budget_alerts)
                .cloned()
                .collect()
        })
    }

    fn budgets_for_month(
        &self,
        user_id: Uuid,
        month: MonthToken,
    ) -> Result<Vec<Budget>, StoreError> {
        self.with_ledger(|ledger| {
            ledger
                .budgets
                .iter()
                .filter(|budget| budget.user_id == user_id && budget.month == month)
                .cloned()
                .collect()
        })
    }
}
