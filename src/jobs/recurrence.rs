//! Recurrence evaluation and the daily materialization batch.

use chrono::{Datelike, NaiveDate};

use crate::domain::{Frequency, RecurringRule, Transaction};
use crate::errors::JobError;
use crate::store::LedgerStore;

/// Decides whether `rule` should generate a transaction for `today`.
///
/// Only monthly rules are evaluated; daily, weekly, and yearly values are
/// stored but never acted on. Pure and deterministic, no I/O.
pub fn should_materialize(rule: &RecurringRule, today: NaiveDate) -> bool {
    if !rule.active {
        return false;
    }
    if today < rule.start_date {
        return false;
    }
    if rule.frequency != Frequency::Monthly {
        return false;
    }
    if today.day() != rule.day_of_month {
        return false;
    }
    match rule.last_materialized {
        Some(last) => !same_month_of_year(last, today),
        None => true,
    }
}

/// Compares month-of-year only, never the year: a rule last materialized on
/// 2023-12-15 stays blocked on 2024-12-15. Replace with `MonthToken::from_date`
/// equality to compare full year-months instead.
fn same_month_of_year(a: NaiveDate, b: NaiveDate) -> bool {
    a.month() == b.month()
}

/// Result of one daily materialization run.
#[derive(Debug, Default)]
pub struct RecurrenceOutcome {
    /// Number of transactions successfully persisted this run.
    pub processed: usize,
    pub materialized: Vec<Transaction>,
    /// Per-rule persistence failures that were logged and skipped.
    pub failed: usize,
}

/// Daily batch that turns due recurring rules into concrete transactions.
pub struct RecurringProcessor;

impl RecurringProcessor {
    /// Loads all candidate rules and materializes the due ones for `today`.
    ///
    /// A failure of the listing query aborts the run; per-rule persistence
    /// errors are logged and skipped so one bad rule cannot starve the rest.
    /// The rule's `last_materialized` marker is only advanced after its
    /// transaction was stored, so a failed rule is re-evaluated on the next
    /// eligible run.
    pub fn run(store: &dyn LedgerStore, today: NaiveDate) -> Result<RecurrenceOutcome, JobError> {
        tracing::info!(%today, "processing recurring rules");
        let rules = store
            .active_rules(today)
            .map_err(|err| JobError::BatchAborted(err.to_string()))?;

        let mut outcome = RecurrenceOutcome::default();
        for rule in rules {
            if !should_materialize(&rule, today) {
                continue;
            }
            let transaction = rule.materialize(today);
            if let Err(err) = store.insert_transaction(transaction.clone()) {
                tracing::warn!(rule = %rule.id, %err, "failed to persist materialized transaction");
                outcome.failed += 1;
                continue;
            }
            if let Err(err) = store.set_last_materialized(rule.id, today) {
                // The transaction is already stored; the stale marker means the
                // rule will be re-evaluated next run.
                tracing::warn!(rule = %rule.id, %err, "failed to advance last-materialized marker");
                outcome.failed += 1;
            }
            outcome.processed += 1;
            outcome.materialized.push(transaction);
        }

        tracing::info!(
            processed = outcome.processed,
            failed = outcome.failed,
            "recurring run complete"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_rule(day_of_month: u32, start: NaiveDate) -> RecurringRule {
        RecurringRule::new(
            Uuid::new_v4(),
            120.0,
            "Utilities",
            "Electricity",
            TransactionKind::Expense,
            day_of_month,
            start,
        )
    }

    #[test]
    fn inactive_rule_never_materializes() {
        let mut rule = monthly_rule(15, date(2024, 1, 1));
        rule.active = false;
        assert!(!should_materialize(&rule, date(2024, 3, 15)));
    }

    #[test]
    fn rule_is_dormant_before_start_date() {
        let rule = monthly_rule(15, date(2024, 6, 1));
        assert!(!should_materialize(&rule, date(2024, 3, 15)));
    }

    #[test]
    fn only_monthly_frequency_is_evaluated() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Yearly] {
            let rule = monthly_rule(15, date(2024, 1, 1)).with_frequency(frequency);
            assert!(
                !should_materialize(&rule, date(2024, 3, 15)),
                "{frequency} rules must not materialize"
            );
        }
    }

    #[test]
    fn day_of_month_must_match() {
        let rule = monthly_rule(15, date(2024, 1, 1));
        assert!(!should_materialize(&rule, date(2024, 3, 14)));
        assert!(should_materialize(&rule, date(2024, 3, 15)));
    }

    #[test]
    fn same_month_marker_blocks_rerun() {
        let mut rule = monthly_rule(15, date(2024, 1, 1));
        rule.last_materialized = Some(date(2024, 3, 15));
        assert!(!should_materialize(&rule, date(2024, 3, 15)));
        assert!(should_materialize(&rule, date(2024, 4, 15)));
    }

    #[test]
    fn month_comparison_ignores_year() {
        // Characterizes the month-of-year-only check: December of last year
        // still blocks December of this year.
        let mut rule = monthly_rule(15, date(2023, 1, 1));
        rule.last_materialized = Some(date(2023, 12, 15));
        assert!(!should_materialize(&rule, date(2024, 12, 15)));
        assert!(should_materialize(&rule, date(2024, 11, 15)));
    }
}
