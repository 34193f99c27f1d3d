//! fintra-core
//!
//! Business logic and services for Fintra.
//! Depends on fintra-domain. No HTTP, no terminal I/O, no direct file
//! storage interactions beyond the store traits defined here.

pub mod budget_service;
pub mod error;
pub mod store;
pub mod summary_service;
pub mod time;
pub mod tracker;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use error::{CoreError, CoreResult};
pub use store::{LedgerStore, MemoryLedgerStore, MemoryUserStore, UserStore};
pub use summary_service::SummaryService;
pub use time::{month_start, shift_months, Clock, FixedClock, SystemClock};
pub use tracker::Tracker;
pub use transaction_service::TransactionService;
