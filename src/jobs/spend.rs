//! Month-to-date spend aggregation.

use uuid::Uuid;

use crate::domain::{MonthToken, TransactionKind};
use crate::errors::StoreError;
use crate::store::LedgerStore;

/// Sums expense amounts for one user and category within `month`.
/// Returns 0 when nothing matches; income entries are never counted.
pub fn compute_spent(
    store: &dyn LedgerStore,
    user_id: Uuid,
    category: &str,
    month: MonthToken,
) -> Result<f64, StoreError> {
    let expenses =
        store.transactions_in_month(user_id, category, TransactionKind::Expense, month)?;
    Ok(expenses.iter().map(|txn| txn.amount).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Transaction;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(user: Uuid, amount: f64, category: &str, on: NaiveDate) -> Transaction {
        Transaction::new(user, amount, category, "test", TransactionKind::Expense, on)
    }

    #[test]
    fn sums_only_matching_expenses() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let june = MonthToken::new(2024, 6).unwrap();

        store
            .insert_transaction(expense(user, 40.0, "Food", date(2024, 6, 3)))
            .unwrap();
        store
            .insert_transaction(expense(user, 60.0, "Food", date(2024, 6, 20)))
            .unwrap();
        // Wrong category, wrong month, wrong user, wrong kind.
        store
            .insert_transaction(expense(user, 99.0, "Travel", date(2024, 6, 5)))
            .unwrap();
        store
            .insert_transaction(expense(user, 99.0, "Food", date(2024, 7, 1)))
            .unwrap();
        store
            .insert_transaction(expense(other, 99.0, "Food", date(2024, 6, 5)))
            .unwrap();
        store
            .insert_transaction(Transaction::new(
                user,
                99.0,
                "Food",
                "salary refund",
                TransactionKind::Income,
                date(2024, 6, 10),
            ))
            .unwrap();

        let spent = compute_spent(&store, user, "Food", june).unwrap();
        assert!((spent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_month_sums_to_zero() {
        let store = MemoryStore::default();
        let spent = compute_spent(
            &store,
            Uuid::new_v4(),
            "Food",
            MonthToken::new(2024, 6).unwrap(),
        )
        .unwrap();
        assert_eq!(spent, 0.0);
    }
}
