//! Trailing-window financial summaries and insight inputs.

use std::collections::HashMap;

use chrono::NaiveDate;
use fintra_domain::{BudgetSnapshot, FinancialAnalysis, FinancialSummary, Transaction};

use crate::budget_service::BudgetService;
use crate::time::shift_months;

/// Derives monthly averages and category breakdowns from a transaction
/// collection.
///
/// Pure and deterministic given `(transactions, window_months, now)`.
pub struct SummaryService;

impl SummaryService {
    /// Summarizes the trailing `window_months` calendar months ending at
    /// `now`. A zero window is treated as one month; a summary has no
    /// error paths.
    pub fn summarize(
        transactions: &[Transaction],
        window_months: u32,
        now: NaiveDate,
    ) -> FinancialSummary {
        let months = window_months.max(1);
        let window_start = shift_months(now, -(months as i32));
        let recent: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| txn.date >= window_start)
            .collect();

        let income_total: f64 = recent
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.amount)
            .sum();
        let expense_total: f64 = recent
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.magnitude())
            .sum();

        let mut category_spending: HashMap<String, f64> = HashMap::new();
        for txn in recent.iter().filter(|txn| txn.is_expense()) {
            *category_spending.entry(txn.category.clone()).or_insert(0.0) += txn.magnitude();
        }

        let monthly_income = income_total / months as f64;
        let monthly_expenses = expense_total / months as f64;
        // Short-circuits the zero-income case instead of dividing.
        let savings_rate = if monthly_income > 0.0 {
            (monthly_income - monthly_expenses) / monthly_income * 100.0
        } else {
            0.0
        };

        FinancialSummary {
            monthly_income,
            monthly_expenses,
            savings_rate,
            category_spending,
            total_transactions: recent.len(),
        }
    }

    /// Combines the trailing summary with per-budget usage rows. This is
    /// the numeric input the insight generator consumes.
    pub fn analyze(
        transactions: &[Transaction],
        snapshots: &[BudgetSnapshot],
        window_months: u32,
        now: NaiveDate,
    ) -> FinancialAnalysis {
        FinancialAnalysis {
            summary: Self::summarize(transactions, window_months, now),
            budget_usage: BudgetService::usage(snapshots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintra_domain::TransactionKind;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, category: &str, magnitude: f64, on: NaiveDate) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            "Entry",
            category,
            kind.signed(magnitude),
            on,
            kind,
        )
    }

    #[test]
    fn summarize_averages_over_the_window() {
        let now = date(2025, 6, 15);
        let txns = vec![
            txn(TransactionKind::Income, "Income", 3000.0, date(2025, 6, 1)),
            txn(TransactionKind::Income, "Income", 3000.0, date(2025, 5, 1)),
            txn(TransactionKind::Expense, "Food", 600.0, date(2025, 6, 5)),
            txn(TransactionKind::Expense, "Food", 300.0, date(2025, 4, 20)),
            // Outside the trailing window.
            txn(TransactionKind::Expense, "Food", 999.0, date(2025, 1, 10)),
        ];
        let summary = SummaryService::summarize(&txns, 3, now);
        assert_eq!(summary.monthly_income, 2000.0);
        assert_eq!(summary.monthly_expenses, 300.0);
        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.category_spending["Food"], 900.0);
        assert!((summary.savings_rate - 85.0).abs() < 1e-9);
    }

    #[test]
    fn zero_income_short_circuits_savings_rate() {
        let now = date(2025, 6, 15);
        let txns = vec![txn(TransactionKind::Expense, "Food", 120.0, date(2025, 6, 2))];
        let summary = SummaryService::summarize(&txns, 3, now);
        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.savings_rate.is_finite());
    }

    #[test]
    fn empty_set_produces_empty_summary() {
        let summary = SummaryService::summarize(&[], 3, date(2025, 6, 15));
        assert_eq!(summary.monthly_income, 0.0);
        assert_eq!(summary.monthly_expenses, 0.0);
        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.total_transactions, 0);
        assert!(summary.category_spending.is_empty());
    }

    #[test]
    fn zero_window_is_clamped_to_one_month() {
        let now = date(2025, 6, 15);
        let txns = vec![txn(TransactionKind::Income, "Income", 500.0, date(2025, 6, 1))];
        let summary = SummaryService::summarize(&txns, 0, now);
        assert_eq!(summary.monthly_income, 500.0);
    }

    #[test]
    fn window_start_preserves_day_of_month() {
        let now = date(2025, 6, 15);
        let inside = txn(TransactionKind::Expense, "Food", 10.0, date(2025, 3, 15));
        let outside = txn(TransactionKind::Expense, "Food", 10.0, date(2025, 3, 14));
        let summary = SummaryService::summarize(&[inside, outside], 3, now);
        assert_eq!(summary.total_transactions, 1);
    }

    #[test]
    fn summarize_is_deterministic() {
        let now = date(2025, 6, 15);
        let txns = vec![
            txn(TransactionKind::Income, "Income", 100.0, date(2025, 6, 1)),
            txn(TransactionKind::Expense, "Food", 40.0, date(2025, 6, 2)),
        ];
        assert_eq!(
            SummaryService::summarize(&txns, 3, now),
            SummaryService::summarize(&txns, 3, now)
        );
    }
}
