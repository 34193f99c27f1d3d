//! Budget validation and derived monthly spending.

use chrono::NaiveDate;
use fintra_domain::{
    Budget, BudgetDraft, BudgetPatch, BudgetSnapshot, BudgetUsage, Transaction, INCOME_CATEGORY,
};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::time::month_start;

/// Stateless budgeting rules and aggregation over transaction snapshots.
///
/// Spending is never stored: [`BudgetService::snapshots`] recomputes it
/// from the transaction set on every read.
pub struct BudgetService;

impl BudgetService {
    /// Validates a new budget against the user's existing set.
    pub fn validate_new(
        user_id: Uuid,
        draft: BudgetDraft,
        existing: &[Budget],
    ) -> CoreResult<Budget> {
        let category = Self::validate_category(&draft.category, existing, None)?;
        Self::validate_limit(draft.limit)?;
        let icon = Self::required(&draft.icon, "icon")?;
        let color = Self::required(&draft.color, "color")?;
        Ok(Budget::new(user_id, category, draft.limit, icon, color))
    }

    /// Applies a partial update, re-checking the reserved-category and
    /// uniqueness rules whenever the category changes.
    pub fn validate_update(
        existing: &Budget,
        patch: BudgetPatch,
        siblings: &[Budget],
    ) -> CoreResult<Budget> {
        let mut updated = existing.clone();
        if let Some(category) = patch.category {
            updated.category = Self::validate_category(&category, siblings, Some(existing.id))?;
        }
        if let Some(limit) = patch.limit {
            Self::validate_limit(limit)?;
            updated.limit = limit;
        }
        if let Some(icon) = patch.icon {
            updated.icon = Self::required(&icon, "icon")?;
        }
        if let Some(color) = patch.color {
            updated.color = Self::required(&color, "color")?;
        }
        Ok(updated)
    }

    /// Sums the current month's expense activity for `category`.
    ///
    /// Matches expense transactions with the exact category whose date
    /// falls in `[first_day_of_month(as_of), as_of]`, both inclusive,
    /// and returns the sum of their absolute amounts. Pure over its
    /// inputs; `as_of` is injected so reads stay deterministic in tests.
    pub fn spent_in_month(category: &str, transactions: &[Transaction], as_of: NaiveDate) -> f64 {
        let window_start = month_start(as_of);
        transactions
            .iter()
            .filter(|txn| txn.is_expense() && txn.category == category)
            .filter(|txn| txn.date >= window_start && txn.date <= as_of)
            .map(Transaction::magnitude)
            .sum()
    }

    /// Derived read model: every budget with its recomputed monthly
    /// spending.
    pub fn snapshots(
        budgets: &[Budget],
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Vec<BudgetSnapshot> {
        budgets
            .iter()
            .map(|budget| {
                let spent = Self::spent_in_month(&budget.category, transactions, as_of);
                BudgetSnapshot::from_budget(budget.clone(), spent)
            })
            .collect()
    }

    /// Per-budget usage rows for the insights layer.
    pub fn usage(snapshots: &[BudgetSnapshot]) -> Vec<BudgetUsage> {
        snapshots.iter().map(BudgetUsage::from).collect()
    }

    fn validate_category(
        candidate: &str,
        siblings: &[Budget],
        exclude: Option<Uuid>,
    ) -> CoreResult<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("category is required"));
        }
        if trimmed == INCOME_CATEGORY {
            return Err(CoreError::validation("cannot use reserved category"));
        }
        let normalized = trimmed.to_ascii_lowercase();
        let duplicate = siblings.iter().any(|budget| {
            budget.category.trim().to_ascii_lowercase() == normalized
                && exclude != Some(budget.id)
        });
        if duplicate {
            return Err(CoreError::validation(format!(
                "budget category `{}` already exists",
                trimmed
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate_limit(limit: f64) -> CoreResult<()> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(CoreError::validation("limit must be positive"));
        }
        Ok(())
    }

    fn required(value: &str, field: &str) -> CoreResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation(format!("{} is required", field)));
        }
        Ok(trimmed.to_string())
    }
}
