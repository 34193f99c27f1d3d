//! Validation and normalization rules for transaction mutations.

use fintra_domain::{
    Transaction, TransactionDraft, TransactionKind, TransactionPatch, INCOME_CATEGORY,
};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

const MAX_NAME_LEN: usize = 100;
const MAX_NOTES_LEN: usize = 500;

/// Enforces the category and sign invariants on every transaction
/// create and update.
///
/// Callers supply unsigned magnitudes; the stored sign is derived from
/// the effective kind. Income transactions always land in the reserved
/// [`INCOME_CATEGORY`]; expense categories must name one of the caller's
/// budget categories. Pure: returns the normalized transaction or an
/// error, nothing else.
pub struct TransactionService;

impl TransactionService {
    /// Validates a creation payload against the user's budget categories
    /// and returns the normalized transaction.
    pub fn validate_new(
        user_id: Uuid,
        draft: TransactionDraft,
        budget_categories: &[String],
    ) -> CoreResult<Transaction> {
        let name = Self::validate_name(&draft.name)?;
        let notes = Self::validate_notes(draft.notes)?;
        let magnitude = Self::validate_amount(draft.amount)?;
        let category = Self::resolve_category(draft.kind, &draft.category, budget_categories)?;

        Ok(Transaction {
            id: Uuid::new_v4(),
            user_id,
            name,
            category,
            amount: draft.kind.signed(magnitude),
            date: draft.date,
            kind: draft.kind,
            notes,
        })
    }

    /// Applies a partial update, re-deriving category and amount sign
    /// from the *new* effective kind.
    ///
    /// Whenever the patch touches `kind` or `category`, the effective
    /// category is re-validated; patches that leave both alone tolerate
    /// a category orphaned by budget deletion.
    pub fn validate_update(
        existing: &Transaction,
        patch: TransactionPatch,
        budget_categories: &[String],
    ) -> CoreResult<Transaction> {
        let effective_kind = patch.kind.unwrap_or(existing.kind);
        let mut updated = existing.clone();

        if let Some(name) = patch.name {
            updated.name = Self::validate_name(&name)?;
        }
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(notes) = patch.notes {
            updated.notes = Self::validate_notes(Some(notes))?;
        }

        if patch.kind.is_some() || patch.category.is_some() {
            let candidate = patch
                .category
                .as_deref()
                .unwrap_or(existing.category.as_str());
            updated.category = Self::resolve_category(effective_kind, candidate, budget_categories)?;
        }

        updated.amount = match patch.amount {
            Some(magnitude) => effective_kind.signed(Self::validate_amount(magnitude)?),
            None if patch.kind.is_some() => effective_kind.signed(existing.amount),
            None => existing.amount,
        };
        updated.kind = effective_kind;

        Ok(updated)
    }

    fn resolve_category(
        kind: TransactionKind,
        candidate: &str,
        budget_categories: &[String],
    ) -> CoreResult<String> {
        match kind {
            // Income ignores whatever the caller supplied.
            TransactionKind::Income => Ok(INCOME_CATEGORY.to_string()),
            TransactionKind::Expense => {
                let candidate = candidate.trim();
                if candidate.is_empty() {
                    return Err(CoreError::validation("category is required"));
                }
                if budget_categories.iter().any(|c| c == candidate) {
                    Ok(candidate.to_string())
                } else {
                    Err(CoreError::validation(
                        "category must match an existing budget category",
                    ))
                }
            }
        }
    }

    fn validate_name(name: &str) -> CoreResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("name is required"));
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(CoreError::validation(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate_notes(notes: Option<String>) -> CoreResult<Option<String>> {
        match notes {
            None => Ok(None),
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.chars().count() > MAX_NOTES_LEN {
                    return Err(CoreError::validation(format!(
                        "notes must be at most {} characters",
                        MAX_NOTES_LEN
                    )));
                }
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
        }
    }

    fn validate_amount(amount: f64) -> CoreResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::validation("amount must be positive"));
        }
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn draft(kind: TransactionKind, category: &str, amount: f64) -> TransactionDraft {
        TransactionDraft {
            name: "Sample".into(),
            category: category.into(),
            amount,
            date: sample_date(),
            kind,
            notes: None,
        }
    }

    fn food_budget() -> Vec<String> {
        vec!["Food".to_string(), "Transport".to_string()]
    }

    #[test]
    fn expense_amount_is_stored_negative() {
        let txn =
            TransactionService::validate_new(Uuid::new_v4(), draft(TransactionKind::Expense, "Food", 50.0), &food_budget())
                .expect("valid expense");
        assert_eq!(txn.amount, -50.0);
        assert_eq!(txn.category, "Food");
        assert!(txn.is_expense());
    }

    #[test]
    fn income_forces_reserved_category() {
        let txn = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Income, "Food", 1200.0),
            &food_budget(),
        )
        .expect("income always accepted");
        assert_eq!(txn.category, INCOME_CATEGORY);
        assert_eq!(txn.amount, 1200.0);
    }

    #[test]
    fn expense_with_unknown_category_is_rejected() {
        let err = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Expense, "Gadgets", 50.0),
            &food_budget(),
        )
        .expect_err("unknown category must fail");
        assert!(
            matches!(err, CoreError::Validation(ref message) if message.contains("existing budget category")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = TransactionService::validate_new(
                Uuid::new_v4(),
                draft(TransactionKind::Expense, "Food", bad),
                &food_budget(),
            )
            .expect_err("amount must be positive");
            assert!(err.is_validation(), "unexpected error: {err:?}");
        }
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        let mut payload = draft(TransactionKind::Expense, "Food", 12.0);
        payload.name = "  Corner shop  ".into();
        let txn = TransactionService::validate_new(Uuid::new_v4(), payload, &food_budget()).unwrap();
        assert_eq!(txn.name, "Corner shop");

        let mut too_long = draft(TransactionKind::Expense, "Food", 12.0);
        too_long.name = "x".repeat(101);
        let err = TransactionService::validate_new(Uuid::new_v4(), too_long, &food_budget())
            .expect_err("long name must fail");
        assert!(err.is_validation());
    }

    #[test]
    fn flipping_to_income_without_category_rederives_both_fields() {
        let existing = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Expense, "Food", 80.0),
            &food_budget(),
        )
        .unwrap();

        let patch = TransactionPatch {
            kind: Some(TransactionKind::Income),
            ..TransactionPatch::default()
        };
        let updated =
            TransactionService::validate_update(&existing, patch, &food_budget()).expect("flip to income");
        assert_eq!(updated.category, INCOME_CATEGORY);
        assert_eq!(updated.amount, 80.0);
        assert!(updated.is_income());
    }

    #[test]
    fn flipping_to_expense_with_stale_category_is_rejected() {
        let existing = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Income, "ignored", 500.0),
            &food_budget(),
        )
        .unwrap();

        let patch = TransactionPatch {
            kind: Some(TransactionKind::Expense),
            ..TransactionPatch::default()
        };
        let err = TransactionService::validate_update(&existing, patch, &food_budget())
            .expect_err("Income is not a budget category");
        assert!(err.is_validation(), "unexpected error: {err:?}");
    }

    #[test]
    fn supplied_magnitude_wins_over_resigned_amount() {
        let existing = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Expense, "Food", 80.0),
            &food_budget(),
        )
        .unwrap();

        let patch = TransactionPatch {
            kind: Some(TransactionKind::Income),
            amount: Some(25.0),
            ..TransactionPatch::default()
        };
        let updated = TransactionService::validate_update(&existing, patch, &food_budget()).unwrap();
        assert_eq!(updated.amount, 25.0);
    }

    #[test]
    fn untouched_orphaned_category_is_tolerated() {
        let existing = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Expense, "Food", 30.0),
            &food_budget(),
        )
        .unwrap();

        // Budget has since been deleted; only the name changes.
        let patch = TransactionPatch {
            name: Some("Renamed".into()),
            ..TransactionPatch::default()
        };
        let updated = TransactionService::validate_update(&existing, patch, &[])
            .expect("orphaned category tolerated when untouched");
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn category_change_is_validated_against_budgets() {
        let existing = TransactionService::validate_new(
            Uuid::new_v4(),
            draft(TransactionKind::Expense, "Food", 30.0),
            &food_budget(),
        )
        .unwrap();

        let ok = TransactionPatch {
            category: Some("Transport".into()),
            ..TransactionPatch::default()
        };
        let updated = TransactionService::validate_update(&existing, ok, &food_budget()).unwrap();
        assert_eq!(updated.category, "Transport");
        assert_eq!(updated.amount, -30.0);

        let bad = TransactionPatch {
            category: Some("Gadgets".into()),
            ..TransactionPatch::default()
        };
        let err = TransactionService::validate_update(&existing, bad, &food_budget())
            .expect_err("unknown category must fail");
        assert!(err.is_validation());
    }
}
