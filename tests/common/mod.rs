#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use chrono::NaiveDate;
use uuid::Uuid;

use fintrack_core::domain::{
    Budget, MonthToken, RecurringRule, Transaction, TransactionKind, User,
};
use fintrack_core::errors::{NotifyError, StoreError};
use fintrack_core::notify::Notifier;
use fintrack_core::store::{LedgerStore, MemoryStore};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn month(y: i32, m: u32) -> MonthToken {
    MonthToken::new(y, m).unwrap()
}

pub fn expense(user: Uuid, amount: f64, category: &str, on: NaiveDate) -> Transaction {
    Transaction::new(
        user,
        amount,
        category,
        "test expense",
        TransactionKind::Expense,
        on,
    )
}

pub fn monthly_rule(user: Uuid, day_of_month: u32, start: NaiveDate) -> RecurringRule {
    RecurringRule::new(
        user,
        120.0,
        "Utilities",
        "Electricity",
        TransactionKind::Expense,
        day_of_month,
        start,
    )
}

pub fn alert_user(email: &str) -> User {
    User::new(email, "Test User")
}

/// One captured alert: recipient, category, spent, percentage.
pub type SentAlert = (String, String, f64, f64);

/// Notifier that captures every alert for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentAlert>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().expect("sent lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send_budget_alert(
        &self,
        user: &User,
        budget: &Budget,
        spent: f64,
        percentage: f64,
    ) -> Result<(), NotifyError> {
        self.sent.lock().expect("sent lock").push((
            user.email.clone(),
            budget.category.clone(),
            spent,
            percentage,
        ));
        Ok(())
    }
}

/// Notifier whose every delivery fails.
#[derive(Debug, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send_budget_alert(
        &self,
        _user: &User,
        _budget: &Budget,
        _spent: f64,
        _percentage: f64,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp connection refused".into()))
    }
}

/// Store wrapper that injects failures: the next `fail_inserts` transaction
/// inserts error out, and listing queries fail while `fail_listing` is set.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_inserts: AtomicUsize,
    pub fail_listing: AtomicBool,
}

impl FlakyStore {
    pub fn fail_next_inserts(&self, count: usize) {
        self.fail_inserts.store(count, Ordering::SeqCst);
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }
}

impl LedgerStore for FlakyStore {
    fn active_rules(&self, today: NaiveDate) -> Result<Vec<RecurringRule>, StoreError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("listing query failed".into()));
        }
        self.inner.active_rules(today)
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        let remaining = self.fail_inserts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_inserts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("insert rejected".into()));
        }
        self.inner.insert_transaction(transaction)
    }

    fn set_last_materialized(&self, rule_id: Uuid, d: NaiveDate) -> Result<(), StoreError> {
        self.inner.set_last_materialized(rule_id, d)
    }

    fn transactions_in_month(
        &self,
        user_id: Uuid,
        category: &str,
        kind: TransactionKind,
        m: MonthToken,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.inner.transactions_in_month(user_id, category, kind, m)
    }

    fn alert_enabled_users(&self) -> Result<Vec<User>, StoreError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("listing query failed".into()));
        }
        self.inner.alert_enabled_users()
    }

    fn budgets_for_month(
        &self,
        user_id: Uuid,
        m: MonthToken,
    ) -> Result<Vec<Budget>, StoreError> {
        self.inner.budgets_for_month(user_id, m)
    }
}
