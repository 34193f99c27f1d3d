//! Fintra
//!
//! Core of a personal finance tracker: per-user transactions and
//! category budgets with enforced consistency rules, derived monthly
//! budget spending, and trailing-window financial summaries. HTTP
//! routes, page rendering, and insight prompt generation are callers of
//! this crate, not part of it.

pub use fintra_config::{Config, ConfigError, ConfigManager};
pub use fintra_core::{
    month_start, shift_months, BudgetService, Clock, CoreError, CoreResult, FixedClock,
    LedgerStore, MemoryLedgerStore, MemoryUserStore, SummaryService, SystemClock, Tracker,
    TransactionService, UserStore,
};
pub use fintra_domain::{
    Budget, BudgetDraft, BudgetPatch, BudgetSnapshot, BudgetUsage, FinancialAnalysis,
    FinancialSummary, Transaction, TransactionDraft, TransactionKind, TransactionPatch, User,
    INCOME_CATEGORY,
};
pub use fintra_storage_json::JsonLedgerStore;

/// Builds a [`Tracker`] backed by JSON storage at the configured data
/// directory.
pub fn tracker_from_config(
    config: &Config,
    users: Box<dyn UserStore>,
) -> CoreResult<Tracker> {
    let store = JsonLedgerStore::new(config.resolve_data_dir())?;
    Ok(Tracker::new(Box::new(store), users))
}
