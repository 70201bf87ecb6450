//! In-memory record store.
//!
//! All tables live behind one [`RwLock`], so every write (including a cascading
//! delete that touches several tables) commits atomically: readers see either
//! the graph before the write or the graph after it. A [`RecordChange`] is
//! broadcast after each commit, once the lock is released.

mod budgets;
mod categories;
mod expenses;
mod owners;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use pennywise_core::gateway::RecordChange;
use pennywise_core::records::{
    Budget, Card, CategoryAssignment, ExpenseCategory, Income, IncomeSource, PlannedExpense,
    UnplannedExpense,
};
use pennywise_shared::types::{
    BudgetId, CardId, CategoryId, IncomeId, IncomeSourceId, PlannedExpenseId, UnplannedExpenseId,
};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::StoreError;

/// Capacity of the change broadcast channel.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) budgets: BTreeMap<BudgetId, Budget>,
    pub(crate) cards: BTreeMap<CardId, Card>,
    pub(crate) income_sources: BTreeMap<IncomeSourceId, IncomeSource>,
    pub(crate) categories: BTreeMap<CategoryId, ExpenseCategory>,
    pub(crate) planned: BTreeMap<PlannedExpenseId, PlannedExpense>,
    pub(crate) variable: BTreeMap<UnplannedExpenseId, UnplannedExpense>,
    pub(crate) incomes: BTreeMap<IncomeId, Income>,
}

impl Tables {
    /// Replaces the caller's copy of a category with the stored one.
    ///
    /// Only the category ID is trusted; name and color always come from the
    /// category table.
    fn resolve_category(
        &self,
        category: CategoryAssignment,
    ) -> Result<CategoryAssignment, StoreError> {
        match category.id() {
            Some(id) => self
                .categories
                .get(&id)
                .cloned()
                .map(CategoryAssignment::Categorized)
                .ok_or_else(|| StoreError::owner_not_found("category", id)),
            None => Ok(CategoryAssignment::Uncategorized),
        }
    }
}

/// Thread-safe in-memory store of every Pennywise record.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    changes: broadcast::Sender<RecordChange>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            tables: RwLock::new(Tables::default()),
            changes,
            available: AtomicBool::new(true),
        }
    }

    /// Switches the store on or off. While off, every read and write fails
    /// with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        debug!(available, "record store availability changed");
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns true if the store is serving requests.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        if !self.is_available() {
            return Err(StoreError::Unavailable);
        }
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        if !self.is_available() {
            return Err(StoreError::Unavailable);
        }
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Broadcasts committed changes. Must be called after the write lock is
    /// released.
    pub(crate) fn publish(&self, changes: impl IntoIterator<Item = RecordChange>) {
        for change in changes {
            // No receivers is not an error.
            let _ = self.changes.send(change);
        }
    }

    pub(crate) fn subscribe_changes(&self) -> broadcast::Receiver<RecordChange> {
        self.changes.subscribe()
    }
}
