//! Budget records and the budget cascade.

use pennywise_core::gateway::{ChangeAction, RecordChange};
use pennywise_core::records::Budget;
use pennywise_shared::types::BudgetId;
use tracing::info;

use super::{MemoryStore, Tables};
use crate::error::StoreError;

fn check_owners(tables: &Tables, budget: &Budget) -> Result<(), StoreError> {
    if let Some(card) = budget.card_ids.iter().find(|id| !tables.cards.contains_key(id)) {
        return Err(StoreError::owner_not_found("card", card));
    }
    if let Some(source) = budget
        .income_source_ids
        .iter()
        .find(|id| !tables.income_sources.contains_key(id))
    {
        return Err(StoreError::owner_not_found("income source", source));
    }
    Ok(())
}

impl MemoryStore {
    /// Stores a new budget.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if a linked card or income source is missing.
    pub fn insert_budget(&self, budget: Budget) -> Result<(), StoreError> {
        let id = budget.id;
        {
            let mut tables = self.write()?;
            check_owners(&tables, &budget)?;
            tables.budgets.insert(id, budget);
        }
        self.publish([RecordChange::Budget {
            id,
            action: ChangeAction::Created,
        }]);
        Ok(())
    }

    /// Replaces a stored budget (name, dates, linked cards and sources).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist, or `OwnerNotFound` if
    /// a linked card or income source is missing.
    pub fn update_budget(&self, budget: Budget) -> Result<(), StoreError> {
        let id = budget.id;
        {
            let mut tables = self.write()?;
            if !tables.budgets.contains_key(&id) {
                return Err(StoreError::not_found("budget", id));
            }
            check_owners(&tables, &budget)?;
            tables.budgets.insert(id, budget);
        }
        self.publish([RecordChange::Budget {
            id,
            action: ChangeAction::Updated,
        }]);
        Ok(())
    }

    /// Reads a budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist.
    pub fn budget(&self, id: BudgetId) -> Result<Budget, StoreError> {
        self.read()?
            .budgets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("budget", id))
    }

    /// All budgets, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn budgets(&self) -> Result<Vec<Budget>, StoreError> {
        Ok(self.read()?.budgets.values().cloned().collect())
    }

    /// Deletes a budget together with its planned expenses.
    ///
    /// Children and parent are removed under one write lock. Returns the
    /// number of planned expenses removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget does not exist.
    pub fn delete_budget(&self, id: BudgetId) -> Result<usize, StoreError> {
        let removed = {
            let mut tables = self.write()?;
            if !tables.budgets.contains_key(&id) {
                return Err(StoreError::not_found("budget", id));
            }
            let before = tables.planned.len();
            tables.planned.retain(|_, expense| expense.budget_id != id);
            tables.budgets.remove(&id);
            before - tables.planned.len()
        };
        info!(budget_id = %id, planned_removed = removed, "deleted budget");

        let mut changes = Vec::with_capacity(2);
        if removed > 0 {
            changes.push(RecordChange::PlannedExpense {
                budget_id: id,
                action: ChangeAction::Deleted,
            });
        }
        changes.push(RecordChange::Budget {
            id,
            action: ChangeAction::Deleted,
        });
        self.publish(changes);
        Ok(removed)
    }
}
