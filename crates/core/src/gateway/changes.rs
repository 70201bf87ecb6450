//! Change notifications published by the persistence collaborator.

use pennywise_shared::types::{BudgetId, CardId, CategoryId, IncomeSourceId};
use serde::{Deserialize, Serialize};

use crate::records::Budget;

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Record was inserted.
    Created,
    /// Record was modified.
    Updated,
    /// Record was removed.
    Deleted,
}

/// A committed write, described by the owner it affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum RecordChange {
    /// A budget was written.
    Budget {
        /// Budget ID.
        id: BudgetId,
        /// Action.
        action: ChangeAction,
    },
    /// A planned expense owned by `budget_id` was written.
    PlannedExpense {
        /// Owning budget.
        budget_id: BudgetId,
        /// Action.
        action: ChangeAction,
    },
    /// A variable expense charged to `card_id` was written.
    VariableExpense {
        /// Owning card.
        card_id: CardId,
        /// Action.
        action: ChangeAction,
    },
    /// An income from `source_id` was written.
    Income {
        /// Owning income source.
        source_id: IncomeSourceId,
        /// Action.
        action: ChangeAction,
    },
    /// A card was written.
    Card {
        /// Card ID.
        id: CardId,
        /// Action.
        action: ChangeAction,
    },
    /// A category was written.
    Category {
        /// Category ID.
        id: CategoryId,
        /// Action.
        action: ChangeAction,
    },
}

impl RecordChange {
    /// Returns true if this change can alter what `budget` displays.
    #[must_use]
    pub fn affects(&self, budget: &Budget) -> bool {
        match *self {
            Self::Budget { id, .. } | Self::PlannedExpense { budget_id: id, .. } => {
                id == budget.id
            }
            Self::VariableExpense { card_id, .. } | Self::Card { id: card_id, .. } => {
                budget.card_ids.contains(&card_id)
            }
            Self::Income { source_id, .. } => budget.income_source_ids.contains(&source_id),
            Self::Category { .. } => true,
        }
    }

    /// Returns the budget ID if this change deleted a budget.
    #[must_use]
    pub fn deleted_budget(&self) -> Option<BudgetId> {
        match *self {
            Self::Budget {
                id,
                action: ChangeAction::Deleted,
            } => Some(id),
            _ => None,
        }
    }
}
