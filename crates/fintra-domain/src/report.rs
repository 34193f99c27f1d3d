//! Derived read models served to dashboard and insight callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::budget::Budget;

/// A budget together with its recomputed monthly spending.
///
/// This is the shape budget reads return; `spent` is derived from the
/// user's transactions at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSnapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub limit: f64,
    pub icon: String,
    pub color: String,
    pub spent: f64,
}

impl BudgetSnapshot {
    pub fn from_budget(budget: Budget, spent: f64) -> Self {
        Self {
            id: budget.id,
            user_id: budget.user_id,
            category: budget.category,
            limit: budget.limit,
            icon: budget.icon,
            color: budget.color,
            spent,
        }
    }

    /// Spending as a percentage of the limit; zero when the limit is not
    /// positive.
    pub fn percent_used(&self) -> f64 {
        if self.limit > 0.0 {
            (self.spent / self.limit) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }
}

/// Per-budget usage row consumed by the insights layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetUsage {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub percent_used: f64,
    pub over_budget: bool,
}

impl From<&BudgetSnapshot> for BudgetUsage {
    fn from(snapshot: &BudgetSnapshot) -> Self {
        Self {
            category: snapshot.category.clone(),
            limit: snapshot.limit,
            spent: snapshot.spent,
            percent_used: snapshot.percent_used(),
            over_budget: snapshot.is_over_budget(),
        }
    }
}

/// Monthly averages and category breakdown over a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub savings_rate: f64,
    pub category_spending: HashMap<String, f64>,
    pub total_transactions: usize,
}

/// Everything the insight generator needs: the trailing summary plus the
/// current state of every budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialAnalysis {
    pub summary: FinancialSummary,
    pub budget_usage: Vec<BudgetUsage>,
}
