//! Facade coordinating validation, aggregation, and the persistence
//! backend. This is the surface API-route collaborators call.

use chrono::NaiveDate;
use fintra_domain::{
    Budget, BudgetDraft, BudgetPatch, BudgetSnapshot, FinancialAnalysis, FinancialSummary,
    Transaction, TransactionDraft, TransactionPatch,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::budget_service::BudgetService;
use crate::error::{CoreError, CoreResult};
use crate::store::{LedgerStore, UserStore};
use crate::summary_service::SummaryService;
use crate::time::{Clock, SystemClock};
use crate::transaction_service::TransactionService;

/// Coordinates ledger reads and writes for authenticated users.
///
/// Owns the injected stores and clock; every operation re-validates the
/// payload and recomputes derived values, so no state is cached between
/// calls.
pub struct Tracker {
    store: Box<dyn LedgerStore>,
    users: Box<dyn UserStore>,
    clock: Box<dyn Clock>,
}

impl Tracker {
    pub fn new(store: Box<dyn LedgerStore>, users: Box<dyn UserStore>) -> Self {
        Self::with_clock(store, users, Box::new(SystemClock))
    }

    pub fn with_clock(
        store: Box<dyn LedgerStore>,
        users: Box<dyn UserStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            users,
            clock,
        }
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Today's date per the injected clock; the `as_of` bound for every
    /// derived read.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn transactions(&self, user_id: Uuid) -> CoreResult<Vec<Transaction>> {
        self.ensure_user(user_id)?;
        self.store.list_transactions(user_id)
    }

    pub fn transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<Transaction> {
        self.ensure_user(user_id)?;
        self.store
            .transaction(user_id, id)?
            .ok_or(CoreError::TransactionNotFound(id))
    }

    pub fn create_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> CoreResult<Transaction> {
        self.ensure_user(user_id)?;
        let categories = self.budget_categories(user_id)?;
        let transaction = TransactionService::validate_new(user_id, draft, &categories)
            .map_err(|err| Self::log_rejection(user_id, "transaction create", err))?;
        self.store.insert_transaction(transaction.clone())?;
        debug!(%user_id, transaction_id = %transaction.id, "transaction created");
        Ok(transaction)
    }

    pub fn update_transaction(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: TransactionPatch,
    ) -> CoreResult<Transaction> {
        let existing = self.transaction(user_id, id)?;
        let categories = self.budget_categories(user_id)?;
        let updated = TransactionService::validate_update(&existing, patch, &categories)
            .map_err(|err| Self::log_rejection(user_id, "transaction update", err))?;
        if !self.store.replace_transaction(updated.clone())? {
            return Err(CoreError::TransactionNotFound(id));
        }
        debug!(%user_id, transaction_id = %id, "transaction updated");
        Ok(updated)
    }

    pub fn delete_transaction(&self, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        self.ensure_user(user_id)?;
        if !self.store.delete_transaction(user_id, id)? {
            return Err(CoreError::TransactionNotFound(id));
        }
        debug!(%user_id, transaction_id = %id, "transaction deleted");
        Ok(())
    }

    /// Lists the user's budgets with spending recomputed for the current
    /// month.
    pub fn budgets(&self, user_id: Uuid) -> CoreResult<Vec<BudgetSnapshot>> {
        self.ensure_user(user_id)?;
        let budgets = self.store.list_budgets(user_id)?;
        let transactions = self.store.list_transactions(user_id)?;
        Ok(BudgetService::snapshots(
            &budgets,
            &transactions,
            self.clock.today(),
        ))
    }

    pub fn budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<BudgetSnapshot> {
        self.ensure_user(user_id)?;
        let budget = self
            .store
            .budget(user_id, id)?
            .ok_or(CoreError::BudgetNotFound(id))?;
        self.snapshot(budget)
    }

    pub fn create_budget(&self, user_id: Uuid, draft: BudgetDraft) -> CoreResult<BudgetSnapshot> {
        self.ensure_user(user_id)?;
        let siblings = self.store.list_budgets(user_id)?;
        let budget = BudgetService::validate_new(user_id, draft, &siblings)
            .map_err(|err| Self::log_rejection(user_id, "budget create", err))?;
        self.store.insert_budget(budget.clone())?;
        debug!(%user_id, budget_id = %budget.id, category = %budget.category, "budget created");
        self.snapshot(budget)
    }

    pub fn update_budget(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: BudgetPatch,
    ) -> CoreResult<BudgetSnapshot> {
        self.ensure_user(user_id)?;
        let existing = self
            .store
            .budget(user_id, id)?
            .ok_or(CoreError::BudgetNotFound(id))?;
        let siblings = self.store.list_budgets(user_id)?;
        let updated = BudgetService::validate_update(&existing, patch, &siblings)
            .map_err(|err| Self::log_rejection(user_id, "budget update", err))?;
        if !self.store.replace_budget(updated.clone())? {
            return Err(CoreError::BudgetNotFound(id));
        }
        debug!(%user_id, budget_id = %id, "budget updated");
        self.snapshot(updated)
    }

    /// Deletes a budget. Transactions referencing its category are left
    /// untouched; the orphaned references stay valid for reads.
    pub fn delete_budget(&self, user_id: Uuid, id: Uuid) -> CoreResult<()> {
        self.ensure_user(user_id)?;
        if !self.store.delete_budget(user_id, id)? {
            return Err(CoreError::BudgetNotFound(id));
        }
        debug!(%user_id, budget_id = %id, "budget deleted");
        Ok(())
    }

    /// Current-month spending for one category, recomputed on demand.
    pub fn spent(&self, user_id: Uuid, category: &str) -> CoreResult<f64> {
        self.ensure_user(user_id)?;
        let transactions = self.store.list_transactions(user_id)?;
        Ok(BudgetService::spent_in_month(
            category,
            &transactions,
            self.clock.today(),
        ))
    }

    pub fn summary(&self, user_id: Uuid, window_months: u32) -> CoreResult<FinancialSummary> {
        self.ensure_user(user_id)?;
        let transactions = self.store.list_transactions(user_id)?;
        Ok(SummaryService::summarize(
            &transactions,
            window_months,
            self.clock.today(),
        ))
    }

    pub fn analysis(&self, user_id: Uuid, window_months: u32) -> CoreResult<FinancialAnalysis> {
        self.ensure_user(user_id)?;
        let transactions = self.store.list_transactions(user_id)?;
        let budgets = self.store.list_budgets(user_id)?;
        let today = self.clock.today();
        let snapshots = BudgetService::snapshots(&budgets, &transactions, today);
        Ok(SummaryService::analyze(
            &transactions,
            &snapshots,
            window_months,
            today,
        ))
    }

    fn snapshot(&self, budget: Budget) -> CoreResult<BudgetSnapshot> {
        let transactions = self.store.list_transactions(budget.user_id)?;
        let spent =
            BudgetService::spent_in_month(&budget.category, &transactions, self.clock.today());
        Ok(BudgetSnapshot::from_budget(budget, spent))
    }

    fn budget_categories(&self, user_id: Uuid) -> CoreResult<Vec<String>> {
        Ok(self
            .store
            .list_budgets(user_id)?
            .into_iter()
            .map(|budget| budget.category)
            .collect())
    }

    fn ensure_user(&self, user_id: Uuid) -> CoreResult<()> {
        if self.users.user(user_id)?.is_none() {
            return Err(CoreError::UserNotFound(user_id));
        }
        Ok(())
    }

    fn log_rejection(user_id: Uuid, operation: &str, err: CoreError) -> CoreError {
        warn!(%user_id, %err, "rejected {operation} payload");
        err
    }
}
