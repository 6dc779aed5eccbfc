//! Budget-alert deduplication and the daily alert sweep.
//!
//! Per (user, budget, month) the state holds the highest percentage already
//! notified. Two tiers exist: the per-user threshold (default 80%) and the
//! 100% "exceeded" tier, so at most two alerts fire per key per month no
//! matter how often the sweep runs or how far spend climbs past 100%.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::MonthToken;
use crate::errors::JobError;
use crate::jobs::spend::compute_spent;
use crate::notify::Notifier;
use crate::store::LedgerStore;

/// Dedup key: one entry per budget per month per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub user_id: Uuid,
    pub budget_id: Uuid,
    pub month: MonthToken,
}

/// Store of the highest percentage already notified per key.
///
/// Injected so the default in-memory map can be swapped for a durable store
/// without touching the sweep. `clear` drops every key; it backs the monthly
/// reset and has no partial form.
pub trait AlertLedger: Send {
    /// Highest percentage notified for `key`; 0 when nothing was sent yet.
    fn last_sent(&self, key: &AlertKey) -> f64;
    fn record(&mut self, key: AlertKey, percentage: f64);
    fn clear(&mut self);
}

/// Default process-lifetime state map. Lost on restart, which means alerts
/// can re-fire mid-month after a crash; a known limitation of the in-memory
/// form.
#[derive(Debug, Default)]
pub struct InMemoryAlertLedger {
    sent: HashMap<AlertKey, f64>,
}

impl InMemoryAlertLedger {
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

impl AlertLedger for InMemoryAlertLedger {
    fn last_sent(&self, key: &AlertKey) -> f64 {
        self.sent.get(key).copied().unwrap_or(0.0)
    }

    fn record(&mut self, key: AlertKey, percentage: f64) {
        self.sent.insert(key, percentage);
    }

    fn clear(&mut self) {
        self.sent.clear();
    }
}

/// Result of one daily alert sweep.
#[derive(Debug, Default)]
pub struct AlertOutcome {
    /// Budgets evaluated this run.
    pub checked: usize,
    /// Tier transitions that fired a notification attempt.
    pub notified: usize,
    /// Deliveries or lookups that failed and were skipped.
    pub failed: usize,
}

/// Daily pipeline: aggregate spend, run the dedup transition, notify.
pub struct BudgetAlertSweep;

impl BudgetAlertSweep {
    /// Sweeps every alert-enabled user's budgets for the month of `today`.
    ///
    /// A failure of the user listing aborts the run; every narrower failure
    /// is logged and the sweep moves on. Dedup state advances when a
    /// notification is attempted, not when it is delivered, so a failed
    /// email for a tier is not retried that month.
    pub fn run(
        store: &dyn LedgerStore,
        notifier: &dyn Notifier,
        alerts: &mut dyn AlertLedger,
        today: NaiveDate,
    ) -> Result<AlertOutcome, JobError> {
        let month = MonthToken::from_date(today);
        tracing::info!(%month, "running budget alert sweep");
        let users = store
            .alert_enabled_users()
            .map_err(|err| JobError::BatchAborted(err.to_string()))?;

        let mut outcome = AlertOutcome::default();
        for user in users {
            let budgets = match store.budgets_for_month(user.id, month) {
                Ok(budgets) => budgets,
                Err(err) => {
                    tracing::warn!(user = %user.id, %err, "failed to list budgets");
                    outcome.failed += 1;
                    continue;
                }
            };
            for budget in budgets {
                outcome.checked += 1;
                if budget.limit <= 0.0 {
                    tracing::warn!(budget = %budget.id, "skipping budget with non-positive limit");
                    continue;
                }
                let spent = match compute_spent(store, user.id, &budget.category, month) {
                    Ok(spent) => spent,
                    Err(err) => {
                        tracing::warn!(budget = %budget.id, %err, "failed to aggregate spend");
                        outcome.failed += 1;
                        continue;
                    }
                };
                let percentage = spent / budget.limit * 100.0;
                let threshold = user.notification_preferences.budget_threshold;
                let key = AlertKey {
                    user_id: user.id,
                    budget_id: budget.id,
                    month,
                };
                let last_sent = alerts.last_sent(&key);

                let fire = if percentage >= threshold && last_sent < threshold {
                    true
                } else {
                    percentage >= 100.0 && last_sent < 100.0
                };
                if !fire {
                    continue;
                }
                outcome.notified += 1;
                if let Err(err) = notifier.send_budget_alert(&user, &budget, spent, percentage) {
                    tracing::warn!(budget = %budget.id, %err, "budget alert delivery failed");
                    outcome.failed += 1;
                }
                // The alert counts as attempted either way; the tier is not
                // retried this month.
                alerts.record(key, percentage);
            }
        }

        tracing::info!(
            checked = outcome.checked,
            notified = outcome.notified,
            failed = outcome.failed,
            "budget alert sweep complete"
        );
        Ok(outcome)
    }
}

/// Monthly reset: drops every dedup key so the new month starts clean.
pub fn reset_alert_state(alerts: &mut dyn AlertLedger) {
    alerts.clear();
    tracing::info!("cleared budget alert dedup state");
}
