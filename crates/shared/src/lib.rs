//! Shared types and configuration for Pennywise.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - View enums (segment, sort mode, week start) shared by config and core
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
