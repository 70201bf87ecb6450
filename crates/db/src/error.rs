//! Store error types.

use pennywise_core::gateway::FetchError;
use thiserror::Error;

/// Errors returned by [`MemoryStore`](crate::MemoryStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Record ID.
        id: String,
    },

    /// A record references an owner (budget, card, source, category) that
    /// does not exist.
    #[error("{entity} referenced by record not found: {id}")]
    OwnerNotFound {
        /// Kind of owner.
        entity: &'static str,
        /// Owner ID.
        id: String,
    },

    /// The store is switched off.
    #[error("Record store unavailable")]
    Unavailable,

    /// A writer panicked while holding the store lock.
    #[error("Record store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn owner_not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::OwnerNotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for FetchError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Unavailable => Self::Unavailable(message),
            _ => Self::Storage(message),
        }
    }
}
