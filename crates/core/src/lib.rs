//! Budget period aggregation and view-state engine for Pennywise.
//!
//! This crate holds the engine with ZERO storage dependencies. Storage is
//! reached only through the [`gateway::RecordGateway`] contract.
//!
//! # Modules
//!
//! - `calendar` - Period boundaries and whole-day date windows
//! - `records` - Budget, expense and income records as the engine sees them
//! - `gateway` - Read contract, card scopes and change notifications
//! - `summary` - Totals, savings and category breakdowns for a window
//! - `sorting` - Row ordering and search filtering
//! - `view` - Per-budget view-state controllers and their registry

pub mod calendar;
pub mod gateway;
pub mod records;
pub mod sorting;
pub mod summary;
pub mod view;

#[cfg(test)]
mod fixtures;
