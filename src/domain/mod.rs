//! Pure domain models (Transaction, RecurringRule, Budget, User, MonthToken).
//! No I/O, no storage. Only data types and core enums.

pub mod budget;
pub mod common;
pub mod recurring;
pub mod transaction;
pub mod user;

pub use budget::*;
pub use common::*;
pub use recurring::*;
pub use transaction::*;
pub use user::*;
