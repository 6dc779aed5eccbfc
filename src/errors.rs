use thiserror::Error;
use uuid::Uuid;

/// Error type that captures persistence failures surfaced by a [`crate::store::LedgerStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Recurring rule not found: {0}")]
    RuleNotFound(Uuid),
    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Error type for notification delivery attempts.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier not configured")]
    NotConfigured,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Top-level error for a background job run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    /// The listing query that seeds a batch failed, so the whole run was abandoned.
    #[error("batch aborted: {0}")]
    BatchAborted(String),
}
