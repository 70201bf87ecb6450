//! Budget view-state controllers and their registry.
//!
//! A [`BudgetViewController`] owns the presentation state of one budget
//! (segment, sort, search, window, last summary and rows). Callers submit
//! [`ViewIntent`]s; the controller applies the transition, fetches through the
//! [`RecordGateway`](crate::gateway::RecordGateway), recomputes the summary
//! and publishes a [`ViewSnapshot`] on a watch channel.
//!
//! [`ViewRegistry`] hands out exactly one controller per budget.

pub mod controller;
pub mod preferences;
pub mod registry;
pub mod state;

#[cfg(test)]
mod tests;

pub use controller::BudgetViewController;
pub use preferences::ViewPreferences;
pub use registry::ViewRegistry;
pub use state::{
    FetchTicket, FetchedPeriod, RefreshOutcome, ViewIntent, ViewPhase, ViewSnapshot, ViewState,
};
