//! In-memory record store for Pennywise.
//!
//! This crate provides:
//! - [`MemoryStore`], the persistence collaborator holding budgets, cards,
//!   income sources, categories, expenses and incomes
//! - The [`RecordGateway`](pennywise_core::gateway::RecordGateway) and
//!   [`ChangeFeed`](pennywise_core::gateway::ChangeFeed) implementations the
//!   engine reads through
//! - Cascading deletes, each committed under a single write lock

pub mod error;
pub mod gateway;
pub mod store;

pub use error::StoreError;
pub use store::MemoryStore;
