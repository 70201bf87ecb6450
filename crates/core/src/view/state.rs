//! View state machine: intents, transitions and published snapshots.
//!
//! [`ViewState`] is a plain value with no I/O. The controller feeds it
//! intents, performs the fetch the transition asks for, and hands the result
//! back through [`ViewState::apply`]. Every transition that needs data bumps
//! the generation counter; a result tagged with an older generation is
//! discarded.

use std::sync::Arc;

use pennywise_shared::types::{BudgetId, Segment, SortMode};
use serde::Serialize;

use crate::calendar::DateWindow;
use crate::gateway::FetchError;
use crate::records::{Budget, ExpenseRow};
use crate::sorting::{RowFilter, SortPolicy};
use crate::summary::{BudgetSummary, PeriodRecords, SummaryService};

/// Lifecycle phase of a budget view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ViewPhase {
    /// Nothing has been requested yet.
    Uninitialized,
    /// A fetch is in flight.
    Loading,
    /// Summary and rows reflect the latest completed fetch.
    Ready,
    /// The latest fetch failed; previous summary and rows are kept.
    Error {
        /// User-facing message.
        message: String,
    },
}

/// A request to change what the view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent {
    /// First load. Ignored once the view has loaded.
    Load,
    /// Re-fetch with the current settings.
    Refresh,
    /// Switch between planned and variable expenses.
    SelectSegment(Segment),
    /// Change the row ordering.
    SetSort(SortMode),
    /// Change the row search text (blank clears it).
    SetSearch(String),
    /// Narrow or move the active window away from the budget's own dates.
    SetDateWindow(DateWindow),
    /// Drop any window override and follow the budget's dates again.
    ResetDateWindow,
}

/// Everything a fetch needs, captured when the fetch is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Generation the result must match to be applied.
    pub generation: u64,
    /// Budget to read.
    pub budget_id: BudgetId,
    /// Window override, `None` to follow the budget's dates.
    pub window_override: Option<DateWindow>,
}

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPeriod {
    /// Budget as currently stored.
    pub budget: Budget,
    /// Window the records were read for.
    pub window: DateWindow,
    /// Records in the window.
    pub records: PeriodRecords,
}

/// What happened to a dispatched intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetch completed and its result is now published.
    Applied,
    /// The fetch failed; the view is in the error phase.
    Failed,
    /// A newer intent was issued while fetching; the result was dropped.
    Superseded,
    /// Nothing to do (e.g. `Load` after the first load).
    Skipped,
}

/// Immutable view of the state handed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Budget being shown.
    pub budget_id: BudgetId,
    /// Lifecycle phase.
    pub phase: ViewPhase,
    /// Selected segment.
    pub segment: Segment,
    /// Row ordering.
    pub sort: SortMode,
    /// Row search text, normalized to lowercase.
    pub search: Option<String>,
    /// Active window.
    pub window: DateWindow,
    /// Whether the window differs from the budget's own dates.
    pub window_overridden: bool,
    /// Latest good summary.
    pub summary: Option<Arc<BudgetSummary>>,
    /// Latest good visible rows.
    pub rows: Arc<Vec<ExpenseRow>>,
    /// Message of the latest failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Generation of the latest issued fetch.
    pub generation: u64,
}

impl ViewSnapshot {
    /// Returns true if the view is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == ViewPhase::Ready
    }
}

/// Mutable state of one budget view. Owned by its controller.
#[derive(Debug, Clone)]
pub struct ViewState {
    budget: Budget,
    segment: Segment,
    sort: SortMode,
    filter: RowFilter,
    window_override: Option<DateWindow>,
    phase: ViewPhase,
    summary: Option<Arc<BudgetSummary>>,
    rows: Arc<Vec<ExpenseRow>>,
    last_error: Option<String>,
    generation: u64,
    did_load: bool,
}

impl ViewState {
    /// Creates the uninitialized state for `budget`.
    #[must_use]
    pub fn new(budget: Budget, segment: Segment, sort: SortMode) -> Self {
        Self {
            budget,
            segment,
            sort,
            filter: RowFilter::new(),
            window_override: None,
            phase: ViewPhase::Uninitialized,
            summary: None,
            rows: Arc::new(Vec::new()),
            last_error: None,
            generation: 0,
            did_load: false,
        }
    }

    /// The budget as of the latest applied fetch.
    #[must_use]
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Whether the first load has been issued.
    #[must_use]
    pub fn did_load(&self) -> bool {
        self.did_load
    }

    /// The window currently in effect.
    #[must_use]
    pub fn active_window(&self) -> DateWindow {
        self.window_override.unwrap_or_else(|| self.budget.window())
    }

    /// Applies an intent. Returns the fetch to perform, if any.
    pub fn reduce(&mut self, intent: ViewIntent) -> Option<FetchTicket> {
        match intent {
            ViewIntent::Load => {
                if self.did_load {
                    return None;
                }
            }
            ViewIntent::Refresh => {}
            ViewIntent::SelectSegment(segment) => self.segment = segment,
            ViewIntent::SetSort(sort) => self.sort = sort,
            ViewIntent::SetSearch(text) => self.filter = RowFilter::with_search(&text),
            ViewIntent::SetDateWindow(window) => {
                self.window_override = (window != self.budget.window()).then_some(window);
            }
            ViewIntent::ResetDateWindow => self.window_override = None,
        }

        self.did_load = true;
        self.generation += 1;
        self.phase = ViewPhase::Loading;
        Some(FetchTicket {
            generation: self.generation,
            budget_id: self.budget.id,
            window_override: self.window_override,
        })
    }

    /// Applies a fetch result issued under `generation`.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<FetchedPeriod, FetchError>,
    ) -> RefreshOutcome {
        if generation != self.generation {
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(fetched) => {
                let summary = SummaryService::summarize(
                    &fetched.budget,
                    fetched.window,
                    &fetched.records,
                    self.segment,
                );
                let rows = SortPolicy::visible_rows(
                    &fetched.records.scoped_to(&fetched.budget, fetched.window),
                    self.segment,
                    self.sort,
                    &self.filter,
                );
                self.budget = fetched.budget;
                self.summary = Some(Arc::new(summary));
                self.rows = Arc::new(rows);
                self.last_error = None;
                self.phase = ViewPhase::Ready;
                RefreshOutcome::Applied
            }
            Err(err) => {
                let message = err.user_message();
                self.last_error = Some(message.clone());
                self.phase = ViewPhase::Error { message };
                RefreshOutcome::Failed
            }
        }
    }

    /// Captures the state for observers.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            budget_id: self.budget.id,
            phase: self.phase.clone(),
            segment: self.segment,
            sort: self.sort,
            search: self.filter.search().map(str::to_string),
            window: self.active_window(),
            window_overridden: self.window_override.is_some(),
            summary: self.summary.clone(),
            rows: Arc::clone(&self.rows),
            last_error: self.last_error.clone(),
            generation: self.generation,
        }
    }
}
