//! Gateway error types.

use pennywise_shared::types::BudgetId;
use thiserror::Error;

/// Errors surfaced by the record gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The budget no longer exists.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// The record store cannot serve reads right now.
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// Any other storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FetchError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Message suitable for a dismissible notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BudgetNotFound(_) => "This budget no longer exists.".to_string(),
            Self::Unavailable(_) | Self::Storage(_) => {
                "Couldn't load expenses. Showing the last loaded figures.".to_string()
            }
        }
    }
}
