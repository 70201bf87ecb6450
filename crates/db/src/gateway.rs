//! Record gateway and change feed backed by [`MemoryStore`].

use async_trait::async_trait;
use pennywise_core::calendar::DateWindow;
use pennywise_core::gateway::{CardScope, ChangeFeed, FetchError, RecordChange, RecordGateway};
use pennywise_core::records::{Budget, Income, PlannedExpense, UnplannedExpense};
use pennywise_shared::types::BudgetId;
use tokio::sync::broadcast;
use tracing::debug;

use crate::store::MemoryStore;

#[async_trait]
impl RecordGateway for MemoryStore {
    async fn fetch_budget(&self, budget_id: BudgetId) -> Result<Budget, FetchError> {
        self.read()?
            .budgets
            .get(&budget_id)
            .cloned()
            .ok_or(FetchError::BudgetNotFound(budget_id))
    }

    async fn fetch_planned_expenses(
        &self,
        budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<PlannedExpense>, FetchError> {
        let tables = self.read()?;
        let expenses: Vec<_> = tables
            .planned
            .values()
            .filter(|e| e.budget_id == budget_id && window.contains(e.transaction_date))
            .cloned()
            .collect();
        debug!(budget_id = %budget_id, count = expenses.len(), "fetched planned expenses");
        Ok(expenses)
    }

    async fn fetch_variable_expenses(
        &self,
        cards: &CardScope,
        window: DateWindow,
    ) -> Result<Vec<UnplannedExpense>, FetchError> {
        if cards.is_empty() {
            return Ok(Vec::new());
        }
        let tables = self.read()?;
        let expenses: Vec<_> = tables
            .variable
            .values()
            .filter(|e| cards.matches(e.card_id) && window.contains(e.transaction_date))
            .cloned()
            .collect();
        debug!(cards = cards.len(), count = expenses.len(), "fetched variable expenses");
        Ok(expenses)
    }

    async fn fetch_incomes(
        &self,
        budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<Income>, FetchError> {
        let tables = self.read()?;
        let Some(budget) = tables.budgets.get(&budget_id) else {
            return Err(FetchError::BudgetNotFound(budget_id));
        };
        let incomes: Vec<_> = tables
            .incomes
            .values()
            .filter(|i| budget.income_source_ids.contains(&i.source_id) && window.contains(i.date))
            .cloned()
            .collect();
        debug!(budget_id = %budget_id, count = incomes.len(), "fetched incomes");
        Ok(incomes)
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<RecordChange> {
        self.subscribe_changes()
    }
}
