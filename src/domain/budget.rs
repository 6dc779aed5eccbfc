use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MonthToken;

/// A spending guardrail for one category in one calendar month.
///
/// Nothing enforces uniqueness of (user, category, month); duplicate rows are
/// each evaluated independently, keyed by their own id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub limit: f64,
    pub month: MonthToken,
}

impl Budget {
    pub fn new(user_id: Uuid, category: impl Into<String>, limit: f64, month: MonthToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category: category.into(),
            limit,
            month,
        }
    }
}
