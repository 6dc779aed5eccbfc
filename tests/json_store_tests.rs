mod common;

use common::{date, expense, month, monthly_rule};
use fintrack_core::domain::TransactionKind;
use fintrack_core::store::{JsonStore, Ledger, LedgerStore};
use tempfile::TempDir;
use uuid::Uuid;

fn seeded_file(temp: &TempDir, ledger: &Ledger) -> std::path::PathBuf {
    let path = temp.path().join("ledger.json");
    std::fs::write(&path, serde_json::to_string_pretty(ledger).unwrap()).unwrap();
    path
}

#[test]
fn open_reads_a_seeded_ledger_document() {
    let temp = TempDir::new().expect("temp dir");
    let user = common::alert_user("file@example.com");
    let user_id = user.id;
    let ledger = Ledger {
        users: vec![user],
        budgets: Vec::new(),
        rules: vec![monthly_rule(user_id, 15, date(2024, 1, 1))],
        transactions: vec![expense(user_id, 40.0, "Food", date(2024, 6, 3))],
    };
    let path = seeded_file(&temp, &ledger);

    let store = JsonStore::open(&path).expect("open store");
    assert_eq!(store.active_rules(date(2024, 6, 1)).unwrap().len(), 1);
    assert_eq!(store.alert_enabled_users().unwrap().len(), 1);
    let txns = store
        .transactions_in_month(user_id, "Food", TransactionKind::Expense, month(2024, 6))
        .unwrap();
    assert_eq!(txns.len(), 1);
}

#[test]
fn open_creates_an_empty_store_when_file_is_missing() {
    let temp = TempDir::new().expect("temp dir");
    let store = JsonStore::open(temp.path().join("missing.json")).expect("open store");
    assert!(store.active_rules(date(2024, 6, 1)).unwrap().is_empty());
    assert!(store.alert_enabled_users().unwrap().is_empty());
}

#[test]
fn writes_persist_across_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let user_id = Uuid::new_v4();
    let rule = monthly_rule(user_id, 15, date(2024, 1, 1));
    let rule_id = rule.id;
    let ledger = Ledger {
        users: Vec::new(),
        budgets: Vec::new(),
        rules: vec![rule],
        transactions: Vec::new(),
    };
    let path = seeded_file(&temp, &ledger);

    {
        let store = JsonStore::open(&path).expect("open store");
        store
            .insert_transaction(expense(user_id, 120.0, "Utilities", date(2024, 3, 15)))
            .expect("insert transaction");
        store
            .set_last_materialized(rule_id, date(2024, 3, 15))
            .expect("advance marker");
    }

    let reopened = JsonStore::open(&path).expect("reopen store");
    let txns = reopened
        .transactions_in_month(user_id, "Utilities", TransactionKind::Expense, month(2024, 3))
        .unwrap();
    assert_eq!(txns.len(), 1);
    let rules = reopened.active_rules(date(2024, 6, 1)).unwrap();
    assert_eq!(rules[0].last_materialized, Some(date(2024, 3, 15)));
}
