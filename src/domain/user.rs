use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account holder, reduced to what the alert pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            notification_preferences: NotificationPreferences::default(),
        }
    }
}

/// Per-user notification flags. Read-only input to the alert pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "NotificationPreferences::default_budget_alerts")]
    pub budget_alerts: bool,
    #[serde(default)]
    pub weekly_reports: bool,
    #[serde(default)]
    pub monthly_reports: bool,
    /// Percentage of a budget limit at which the first alert fires.
    #[serde(default = "NotificationPreferences::default_budget_threshold")]
    pub budget_threshold: f64,
}

impl NotificationPreferences {
    fn default_budget_alerts() -> bool {
        true
    }

    fn default_budget_threshold() -> f64 {
        80.0
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            budget_alerts: Self::default_budget_alerts(),
            weekly_reports: false,
            monthly_reports: false,
            budget_threshold: Self::default_budget_threshold(),
        }
    }
}
