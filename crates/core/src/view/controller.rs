//! Per-budget view-state controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use pennywise_shared::types::{BudgetId, Segment, SortMode};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::preferences::ViewPreferences;
use super::state::{FetchTicket, FetchedPeriod, RefreshOutcome, ViewIntent, ViewSnapshot, ViewState};
use crate::calendar::DateWindow;
use crate::gateway::{CardScope, FetchError, RecordChange, RecordGateway};
use crate::records::Budget;
use crate::summary::PeriodRecords;

/// Stateful session for one budget.
///
/// The controller is the only writer of its [`ViewState`]. State is changed
/// under a short lock that is never held across an `.await`; gateway reads
/// run unlocked and their results are applied only if no newer intent was
/// issued in the meantime.
pub struct BudgetViewController {
    budget_id: BudgetId,
    gateway: Arc<dyn RecordGateway>,
    state: Mutex<ViewState>,
    snapshots: watch::Sender<ViewSnapshot>,
}

impl BudgetViewController {
    /// Creates a controller for `budget`, reading the view defaults once.
    pub fn new(
        budget: Budget,
        gateway: Arc<dyn RecordGateway>,
        preferences: &dyn ViewPreferences,
    ) -> Self {
        let budget_id = budget.id;
        let state = ViewState::new(
            budget,
            preferences.default_segment(),
            preferences.default_sort(),
        );
        let (snapshots, _) = watch::channel(state.snapshot());

        Self {
            budget_id,
            gateway,
            state: Mutex::new(state),
            snapshots,
        }
    }

    /// The budget this controller presents.
    #[must_use]
    pub const fn budget_id(&self) -> BudgetId {
        self.budget_id
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshots published from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.subscribe()
    }

    /// First load. A no-op once the view has loaded.
    pub async fn load(&self) -> RefreshOutcome {
        self.dispatch(ViewIntent::Load).await
    }

    /// Re-fetches and re-aggregates with the current settings.
    pub async fn refresh_rows(&self) -> RefreshOutcome {
        self.dispatch(ViewIntent::Refresh).await
    }

    /// Selects the planned or variable segment.
    pub async fn select_segment(&self, segment: Segment) -> RefreshOutcome {
        self.dispatch(ViewIntent::SelectSegment(segment)).await
    }

    /// Changes the row ordering.
    pub async fn set_sort(&self, sort: SortMode) -> RefreshOutcome {
        self.dispatch(ViewIntent::SetSort(sort)).await
    }

    /// Filters visible rows by description or category name.
    pub async fn set_search(&self, text: &str) -> RefreshOutcome {
        self.dispatch(ViewIntent::SetSearch(text.to_string())).await
    }

    /// Overrides the active window. Bounds are clamped to whole days.
    pub async fn set_date_window(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RefreshOutcome {
        self.dispatch(ViewIntent::SetDateWindow(DateWindow::normalize(start, end)))
            .await
    }

    /// Restores the window to the budget's own start and end dates.
    pub async fn reset_date_window_to_budget(&self) -> RefreshOutcome {
        self.dispatch(ViewIntent::ResetDateWindow).await
    }

    /// Applies an intent, fetches if needed and publishes the outcome.
    ///
    /// Never fails: fetch errors move the view into the error phase.
    pub async fn dispatch(&self, intent: ViewIntent) -> RefreshOutcome {
        let ticket = {
            let mut state = self.lock_state();
            let ticket = state.reduce(intent.clone());
            if ticket.is_some() {
                self.snapshots.send_replace(state.snapshot());
            }
            ticket
        };
        let Some(ticket) = ticket else {
            debug!(budget_id = %self.budget_id, ?intent, "intent needs no fetch");
            return RefreshOutcome::Skipped;
        };
        debug!(
            budget_id = %self.budget_id,
            generation = ticket.generation,
            ?intent,
            "fetching budget records"
        );

        let result = self.fetch(&ticket).await;
        if let Err(err) = &result {
            warn!(budget_id = %self.budget_id, error = %err, "failed to fetch budget records");
        }

        let mut state = self.lock_state();
        let outcome = state.apply(ticket.generation, result);
        match outcome {
            RefreshOutcome::Superseded => debug!(
                budget_id = %self.budget_id,
                generation = ticket.generation,
                "discarding stale fetch result"
            ),
            _ => {
                self.snapshots.send_replace(state.snapshot());
            }
        }
        outcome
    }

    /// Schedules a refresh on the next scheduler tick.
    ///
    /// Use after a write so the refresh never runs inside the write's own
    /// completion.
    pub fn schedule_refresh(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            controller.refresh_rows().await
        })
    }

    /// Refreshes whenever a change affecting this budget is broadcast.
    ///
    /// The task holds only a weak reference and ends when the controller is
    /// dropped, the budget is deleted or the channel closes. Changes arriving
    /// before the first load are ignored.
    pub fn watch_changes(
        self: &Arc<Self>,
        mut changes: broadcast::Receiver<RecordChange>,
    ) -> JoinHandle<()> {
        let controller = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                let change = match changes.recv().await {
                    Ok(change) => Some(change),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "change feed lagged, refreshing");
                        None
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                if change.and_then(|c| c.deleted_budget()) == Some(controller.budget_id) {
                    debug!(
                        budget_id = %controller.budget_id,
                        "budget deleted, stopping change watch"
                    );
                    break;
                }
                if controller.should_refresh_for(change.as_ref()) {
                    controller.refresh_rows().await;
                }
            }
        })
    }

    fn should_refresh_for(&self, change: Option<&RecordChange>) -> bool {
        let state = self.lock_state();
        state.did_load() && change.is_none_or(|c| c.affects(state.budget()))
    }

    async fn fetch(&self, ticket: &FetchTicket) -> Result<FetchedPeriod, FetchError> {
        let budget = self.gateway.fetch_budget(ticket.budget_id).await?;
        let window = ticket.window_override.unwrap_or_else(|| budget.window());
        let cards: CardScope = budget.card_ids.iter().collect();

        let (planned, variable, incomes) = tokio::try_join!(
            self.gateway.fetch_planned_expenses(budget.id, window),
            self.gateway.fetch_variable_expenses(&cards, window),
            self.gateway.fetch_incomes(budget.id, window),
        )?;

        Ok(FetchedPeriod {
            budget,
            window,
            records: PeriodRecords {
                planned,
                variable,
                incomes,
            },
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BudgetViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetViewController")
            .field("budget_id", &self.budget_id)
            .finish_non_exhaustive()
    }
}
