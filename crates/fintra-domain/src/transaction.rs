//! Domain models for signed monetary transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A single signed monetary record owned by one user.
///
/// `amount` carries sign: negative for expenses, positive for income.
/// The pairing of sign and [`TransactionKind`] is enforced by the
/// validation layer before a transaction is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            category: category.into(),
            amount,
            date,
            kind,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Returns the unsigned magnitude of the amount.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Transaction {
    fn name(&self) -> &str {
        &self.name
    }
}

impl OwnedByUser for Transaction {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} [{}] {:.2}", self.name, self.kind, self.amount)
    }
}

/// Distinguishes money coming in from money going out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Applies this kind's sign convention to an unsigned magnitude:
    /// expenses are stored negative, income positive.
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            TransactionKind::Income => magnitude.abs(),
            TransactionKind::Expense => -magnitude.abs(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// Unvalidated payload for creating a transaction.
///
/// `amount` is an unsigned magnitude; the validation layer derives the
/// stored sign from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a transaction. Omitted fields keep the stored
/// value, except where the effective kind forces a re-derivation of
/// category and amount sign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
