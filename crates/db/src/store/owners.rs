//! Cards and income sources, the owners of variable expenses and incomes.

use pennywise_core::gateway::{ChangeAction, RecordChange};
use pennywise_core::records::{Card, IncomeSource};
use pennywise_shared::types::{CardId, IncomeSourceId};
use tracing::info;

use super::MemoryStore;
use crate::error::StoreError;

impl MemoryStore {
    /// Stores or replaces a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn upsert_card(&self, card: Card) -> Result<(), StoreError> {
        let id = card.id;
        let existed = self.write()?.cards.insert(id, card).is_some();
        self.publish([RecordChange::Card {
            id,
            action: if existed {
                ChangeAction::Updated
            } else {
                ChangeAction::Created
            },
        }]);
        Ok(())
    }

    /// All cards, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn cards(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.read()?.cards.values().cloned().collect())
    }

    /// Deletes a card with its variable expenses and unlinks it from every
    /// budget. Returns the number of expenses removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the card does not exist.
    pub fn delete_card(&self, id: CardId) -> Result<usize, StoreError> {
        let (removed, budgets) = {
            let mut tables = self.write()?;
            if tables.cards.remove(&id).is_none() {
                return Err(StoreError::not_found("card", id));
            }
            let before = tables.variable.len();
            tables.variable.retain(|_, expense| expense.card_id != id);
            let mut budgets = Vec::new();
            for budget in tables.budgets.values_mut() {
                if budget.card_ids.contains(&id) {
                    budget.card_ids.retain(|card| *card != id);
                    budgets.push(budget.id);
                }
            }
            (before - tables.variable.len(), budgets)
        };
        info!(card_id = %id, variable_removed = removed, "deleted card");

        self.publish(
            budgets
                .into_iter()
                .map(|budget| RecordChange::Budget {
                    id: budget,
                    action: ChangeAction::Updated,
                })
                .chain([RecordChange::Card {
                    id,
                    action: ChangeAction::Deleted,
                }]),
        );
        Ok(removed)
    }

    /// Stores or replaces an income source.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn upsert_income_source(&self, source: IncomeSource) -> Result<(), StoreError> {
        self.write()?.income_sources.insert(source.id, source);
        Ok(())
    }

    /// Deletes an income source with its incomes and unlinks it from every
    /// budget. Returns the number of incomes removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the source does not exist.
    pub fn delete_income_source(&self, id: IncomeSourceId) -> Result<usize, StoreError> {
        let (removed, budgets) = {
            let mut tables = self.write()?;
            if tables.income_sources.remove(&id).is_none() {
                return Err(StoreError::not_found("income source", id));
            }
            let before = tables.incomes.len();
            tables.incomes.retain(|_, income| income.source_id != id);
            let mut budgets = Vec::new();
            for budget in tables.budgets.values_mut() {
                if budget.income_source_ids.contains(&id) {
                    budget.income_source_ids.retain(|source| *source != id);
                    budgets.push(budget.id);
                }
            }
            (before - tables.incomes.len(), budgets)
        };
        info!(source_id = %id, incomes_removed = removed, "deleted income source");

        self.publish(
            budgets
                .into_iter()
                .map(|budget| RecordChange::Budget {
                    id: budget,
                    action: ChangeAction::Updated,
                })
                .chain([RecordChange::Income {
                    source_id: id,
                    action: ChangeAction::Deleted,
                }]),
        );
        Ok(removed)
    }
}
