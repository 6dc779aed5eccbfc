//! Notification seam for budget alerts.
//!
//! Delivery is non-fatal by contract: callers log a failed send and move on,
//! and the error reason is explicit rather than a swallowed boolean.

use crate::domain::{Budget, User};
use crate::errors::NotifyError;

/// Sends formatted budget-alert notifications.
pub trait Notifier: Send + Sync {
    fn send_budget_alert(
        &self,
        user: &User,
        budget: &Budget,
        spent: f64,
        percentage: f64,
    ) -> Result<(), NotifyError>;
}

/// Subject line for a budget alert, shared by notifier implementations.
pub fn alert_subject(budget: &Budget, percentage: f64) -> String {
    format!(
        "Budget Alert: {} - {:.1}% Used",
        budget.category, percentage
    )
}

/// Notifier that records alerts in the log stream and always succeeds.
/// Stands in wherever a real mail transport is not wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_budget_alert(
        &self,
        user: &User,
        budget: &Budget,
        spent: f64,
        percentage: f64,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            to = %user.email,
            subject = %alert_subject(budget, percentage),
            spent,
            limit = budget.limit,
            "budget alert"
        );
        Ok(())
    }
}

/// Notifier used when no transport is configured; every send fails with
/// [`NotifyError::NotConfigured`] so the sweep logs and continues.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send_budget_alert(
        &self,
        _user: &User,
        _budget: &Budget,
        _spent: f64,
        _percentage: f64,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonthToken;
    use uuid::Uuid;

    #[test]
    fn subject_includes_category_and_rounded_percentage() {
        let budget = Budget::new(
            Uuid::new_v4(),
            "Food",
            200.0,
            MonthToken::new(2024, 6).unwrap(),
        );
        assert_eq!(
            alert_subject(&budget, 85.25),
            "Budget Alert: Food - 85.2% Used"
        );
    }

    #[test]
    fn noop_notifier_reports_missing_configuration() {
        let budget = Budget::new(
            Uuid::new_v4(),
            "Food",
            200.0,
            MonthToken::new(2024, 6).unwrap(),
        );
        let user = User::new("a@example.com", "A");
        let err = NoopNotifier
            .send_budget_alert(&user, &budget, 170.0, 85.0)
            .expect_err("no transport configured");
        assert!(matches!(err, NotifyError::NotConfigured));
    }
}
