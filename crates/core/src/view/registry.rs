//! One controller per budget.
//!
//! Every caller asking for the same budget gets the same
//! [`BudgetViewController`], so all views of a budget share one state and one
//! snapshot stream. Creation is atomic: concurrent first requests for a budget
//! construct a single controller.

use std::sync::Arc;

use moka::sync::Cache;
use pennywise_shared::types::BudgetId;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::controller::BudgetViewController;
use super::preferences::ViewPreferences;
use crate::gateway::{FetchError, RecordChange, RecordGateway};
use crate::records::Budget;

/// Registry of live budget view controllers.
#[derive(Clone)]
pub struct ViewRegistry {
    controllers: Cache<BudgetId, Arc<BudgetViewController>>,
    gateway: Arc<dyn RecordGateway>,
    preferences: Arc<dyn ViewPreferences>,
}

impl ViewRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(gateway: Arc<dyn RecordGateway>, preferences: Arc<dyn ViewPreferences>) -> Self {
        Self {
            controllers: Cache::builder().build(),
            gateway,
            preferences,
        }
    }

    /// Returns the controller for `budget`, creating it on first request.
    ///
    /// A controller that already exists keeps its state; `budget` is only
    /// used to seed a new one.
    #[must_use]
    pub fn controller_for(&self, budget: &Budget) -> Arc<BudgetViewController> {
        self.controllers.get_with(budget.id, || {
            info!(budget_id = %budget.id, "creating budget view controller");
            Arc::new(BudgetViewController::new(
                budget.clone(),
                Arc::clone(&self.gateway),
                self.preferences.as_ref(),
            ))
        })
    }

    /// Reads the budget and returns its controller.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the budget cannot be read.
    pub async fn open(&self, budget_id: BudgetId) -> Result<Arc<BudgetViewController>, FetchError> {
        if let Some(controller) = self.controllers.get(&budget_id) {
            return Ok(controller);
        }
        let budget = self.gateway.fetch_budget(budget_id).await?;
        Ok(self.controller_for(&budget))
    }

    /// Returns the controller for `budget_id` if one exists.
    #[must_use]
    pub fn get(&self, budget_id: BudgetId) -> Option<Arc<BudgetViewController>> {
        self.controllers.get(&budget_id)
    }

    /// Returns true if a controller exists for `budget_id`.
    #[must_use]
    pub fn contains(&self, budget_id: BudgetId) -> bool {
        self.controllers.contains_key(&budget_id)
    }

    /// Drops the registry's handle on a budget's controller.
    pub fn evict(&self, budget_id: BudgetId) -> Option<Arc<BudgetViewController>> {
        let removed = self.controllers.remove(&budget_id);
        if removed.is_some() {
            info!(budget_id = %budget_id, "evicted budget view controller");
        }
        removed
    }

    /// Evicts controllers whose budget is deleted.
    ///
    /// The task ends when the channel closes. A lagged receiver cannot tell
    /// which budgets went away, so it leaves the registry as is.
    pub fn watch_deletions(
        self: &Arc<Self>,
        mut changes: broadcast::Receiver<RecordChange>,
    ) -> JoinHandle<()> {
        let registry = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        let Some(registry) = registry.upgrade() else {
                            break;
                        };
                        if let Some(budget_id) = change.deleted_budget() {
                            registry.evict(budget_id);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "deletion watch lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("controllers", &self.controllers.entry_count())
            .finish_non_exhaustive()
    }
}
