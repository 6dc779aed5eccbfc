//! The background jobs: daily recurring-transaction materialization and the
//! daily budget-alert sweep with its monthly dedup reset.

pub mod alerts;
pub mod recurrence;
pub mod spend;

pub use alerts::*;
pub use recurrence::*;
pub use spend::*;
