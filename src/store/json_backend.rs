use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Budget, MonthToken, RecurringRule, Transaction, TransactionKind, User};
use crate::errors::StoreError;

use super::{Ledger, LedgerStore, MemoryStore};

const TMP_SUFFIX: &str = "tmp";

/// File-backed [`LedgerStore`]: the whole ledger lives in one pretty-printed
/// JSON document, rewritten atomically after every mutation.
pub struct JsonStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl JsonStore {
    /// Opens the store at `path`, creating an empty ledger file if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ledger = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Ledger::default()
        };
        Ok(Self {
            inner: MemoryStore::new(ledger),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let ledger = self.inner.snapshot()?;
        let json = serde_json::to_string_pretty(&ledger)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LedgerStore for JsonStore {
    fn active_rules(&self, today: NaiveDate) -> Result<Vec<RecurringRule>, StoreError> {
        self.inner.active_rules(today)
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        self.inner.insert_transaction(transaction)?;
        self.persist()
    }

    fn set_last_materialized(&self, rule_id: Uuid, date: NaiveDate) -> Result<(), StoreError> {
        self.inner.set_last_materialized(rule_id, date)?;
        self.persist()
    }

    fn transactions_in_month(
        &self,
        user_id: Uuid,
        category: &str,
        kind: TransactionKind,
        month: MonthToken,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.inner.transactions_in_month(user_id, category, kind, month)
    }

    fn alert_enabled_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.alert_enabled_users()
    }

    fn budgets_for_month(
        &self,
        user_id: Uuid,
        month: MonthToken,
    ) -> Result<Vec<Budget>, StoreError> {
        self.inner.budgets_for_month(user_id, month)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
