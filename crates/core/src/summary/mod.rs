//! Aggregation of budget records into summary figures.

pub mod service;
pub mod types;


pub use service::SummaryService;
pub use types::{BudgetSummary, CategoryBreakdown, PeriodRecords};
