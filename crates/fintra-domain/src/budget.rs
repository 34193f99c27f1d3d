//! Domain models for per-category monthly spending limits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A per-user monthly spending limit for one expense category.
///
/// There is no `spent` field: spending is a projection over the user's
/// transactions, recomputed on every read and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub limit: f64,
    pub icon: String,
    pub color: String,
}

impl Budget {
    pub fn new(
        user_id: Uuid,
        category: impl Into<String>,
        limit: f64,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category: category.into(),
            limit,
            icon: icon.into(),
            color: color.into(),
        }
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Budget {
    fn name(&self) -> &str {
        &self.category
    }
}

impl OwnedByUser for Budget {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!("{} (limit {:.2})", self.category, self.limit)
    }
}

/// Unvalidated payload for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: f64,
    pub icon: String,
    pub color: String,
}

/// Partial update for a budget. Omitted fields keep the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
