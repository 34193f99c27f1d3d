use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the core and storage layers.
///
/// `Validation` failures are always reported to the caller, never
/// retried, and never fatal to the process.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
