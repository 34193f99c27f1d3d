//! fintra-domain
//!
//! Pure domain models (User, Transaction, Budget, payloads, derived
//! read models). No I/O, no services, no storage. Only data types.

pub mod budget;
pub mod common;
pub mod report;
pub mod transaction;
pub mod user;

pub use budget::*;
pub use common::*;
pub use report::*;
pub use transaction::*;
pub use user::*;
