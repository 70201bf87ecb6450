//! Record query gateway: the read contract the engine needs from storage.
//!
//! The persistence collaborator implements [`RecordGateway`] for point-in-time
//! reads and [`ChangeFeed`] to announce committed writes. Neither trait
//! mutates anything.

pub mod changes;
pub mod error;
pub mod scope;

use async_trait::async_trait;
use pennywise_shared::types::BudgetId;
use tokio::sync::broadcast;

use crate::calendar::DateWindow;
use crate::records::{Budget, Income, PlannedExpense, UnplannedExpense};

pub use changes::{ChangeAction, RecordChange};
pub use error::FetchError;
pub use scope::CardScope;

/// Point-in-time reads of budget records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Reads a budget by ID.
    async fn fetch_budget(&self, budget_id: BudgetId) -> Result<Budget, FetchError>;

    /// Planned expenses owned by `budget_id` dated within `window`.
    async fn fetch_planned_expenses(
        &self,
        budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<PlannedExpense>, FetchError>;

    /// Variable expenses charged to any card in `cards` dated within `window`.
    ///
    /// An empty scope must yield an empty result.
    async fn fetch_variable_expenses(
        &self,
        cards: &CardScope,
        window: DateWindow,
    ) -> Result<Vec<UnplannedExpense>, FetchError>;

    /// Incomes from the budget's income sources dated within `window`.
    async fn fetch_incomes(
        &self,
        budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<Income>, FetchError>;
}

/// Broadcast of committed writes.
pub trait ChangeFeed: Send + Sync {
    /// Subscribes to changes committed from now on.
    fn subscribe(&self) -> broadcast::Receiver<RecordChange>;
}
