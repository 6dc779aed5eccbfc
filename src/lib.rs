//! Fintrack Core implements the background-job engine of a personal finance
//! tracker: recurring-transaction materialization, month-to-date budget
//! aggregation, and threshold-alert deduplication, together with the store
//! and notifier seams and the fixed daily/monthly scheduler that drives them.

pub mod config;
pub mod domain;
pub mod errors;
pub mod jobs;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod time;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("fintrack_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Fintrack Core tracing initialized.");
    });
}
