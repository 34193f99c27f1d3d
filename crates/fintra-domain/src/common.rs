//! Shared traits and constants for ledger entities.

use uuid::Uuid;

/// Category name reserved for income transactions. Budgets may never use
/// it, and income transactions always carry it.
pub const INCOME_CATEGORY: &str = "Income";

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Associates an entity with the user that exclusively owns it.
pub trait OwnedByUser {
    fn user_id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
