//! Planned expenses, variable expenses and incomes.

use chrono::NaiveDateTime;
use pennywise_core::gateway::{ChangeAction, RecordChange};
use pennywise_core::records::{Income, PlannedExpense, UnplannedExpense};
use pennywise_shared::types::{BudgetId, IncomeId, PlannedExpenseId, UnplannedExpenseId};

use super::MemoryStore;
use crate::error::StoreError;

const fn upsert_action(existed: bool) -> ChangeAction {
    if existed {
        ChangeAction::Updated
    } else {
        ChangeAction::Created
    }
}

impl MemoryStore {
    /// Stores or replaces a planned expense.
    ///
    /// Moving an expense to another budget notifies both budgets. The stored
    /// category replaces whatever name and color the caller supplied.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the budget or category is missing.
    pub fn upsert_planned_expense(&self, mut expense: PlannedExpense) -> Result<(), StoreError> {
        let budget_id = expense.budget_id;
        let previous = {
            let mut tables = self.write()?;
            if !tables.budgets.contains_key(&budget_id) {
                return Err(StoreError::owner_not_found("budget", budget_id));
            }
            expense.category = tables.resolve_category(expense.category)?;
            tables.planned.insert(expense.id, expense)
        };

        let mut changes = vec![RecordChange::PlannedExpense {
            budget_id,
            action: upsert_action(previous.is_some()),
        }];
        if let Some(old) = previous.filter(|old| old.budget_id != budget_id) {
            changes.push(RecordChange::PlannedExpense {
                budget_id: old.budget_id,
                action: ChangeAction::Deleted,
            });
        }
        self.publish(changes);
        Ok(())
    }

    /// Reads a planned expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub fn planned_expense(&self, id: PlannedExpenseId) -> Result<PlannedExpense, StoreError> {
        self.read()?
            .planned
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("planned expense", id))
    }

    /// Copies a global preset into `budget_id` as a new, unspent expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the preset does not exist or is not a global
    /// preset, or `OwnerNotFound` if the target budget is missing.
    pub fn instantiate_preset(
        &self,
        preset_id: PlannedExpenseId,
        budget_id: BudgetId,
        transaction_date: NaiveDateTime,
    ) -> Result<PlannedExpense, StoreError> {
        let preset = self.planned_expense(preset_id)?;
        if !preset.is_global_preset {
            return Err(StoreError::not_found("global preset", preset_id));
        }
        let expense = preset.instantiate_for(budget_id, transaction_date);
        self.upsert_planned_expense(expense.clone())?;
        Ok(expense)
    }

    /// Deletes a planned expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub fn delete_planned_expense(&self, id: PlannedExpenseId) -> Result<(), StoreError> {
        let removed = self
            .write()?
            .planned
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("planned expense", id))?;
        self.publish([RecordChange::PlannedExpense {
            budget_id: removed.budget_id,
            action: ChangeAction::Deleted,
        }]);
        Ok(())
    }

    /// Stores or replaces a variable expense, resolving its category against
    /// the category table.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the card or category is missing.
    pub fn upsert_variable_expense(&self, mut expense: UnplannedExpense) -> Result<(), StoreError> {
        let card_id = expense.card_id;
        let previous = {
            let mut tables = self.write()?;
            if !tables.cards.contains_key(&card_id) {
                return Err(StoreError::owner_not_found("card", card_id));
            }
            expense.category = tables.resolve_category(expense.category)?;
            tables.variable.insert(expense.id, expense)
        };

        let mut changes = vec![RecordChange::VariableExpense {
            card_id,
            action: upsert_action(previous.is_some()),
        }];
        if let Some(old) = previous.filter(|old| old.card_id != card_id) {
            changes.push(RecordChange::VariableExpense {
                card_id: old.card_id,
                action: ChangeAction::Deleted,
            });
        }
        self.publish(changes);
        Ok(())
    }

    /// Deletes a variable expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist.
    pub fn delete_variable_expense(&self, id: UnplannedExpenseId) -> Result<(), StoreError> {
        let removed = self
            .write()?
            .variable
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("variable expense", id))?;
        self.publish([RecordChange::VariableExpense {
            card_id: removed.card_id,
            action: ChangeAction::Deleted,
        }]);
        Ok(())
    }

    /// Stores or replaces an income.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the income source is missing.
    pub fn upsert_income(&self, income: Income) -> Result<(), StoreError> {
        let source_id = income.source_id;
        let previous = {
            let mut tables = self.write()?;
            if !tables.income_sources.contains_key(&source_id) {
                return Err(StoreError::owner_not_found("income source", source_id));
            }
            tables.incomes.insert(income.id, income)
        };

        let mut changes = vec![RecordChange::Income {
            source_id,
            action: upsert_action(previous.is_some()),
        }];
        if let Some(old) = previous.filter(|old| old.source_id != source_id) {
            changes.push(RecordChange::Income {
                source_id: old.source_id,
                action: ChangeAction::Deleted,
            });
        }
        self.publish(changes);
        Ok(())
    }

    /// Deletes an income.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the income does not exist.
    pub fn delete_income(&self, id: IncomeId) -> Result<(), StoreError> {
        let removed = self
            .write()?
            .incomes
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("income", id))?;
        self.publish([RecordChange::Income {
            source_id: removed.source_id,
            action: ChangeAction::Deleted,
        }]);
        Ok(())
    }
}
