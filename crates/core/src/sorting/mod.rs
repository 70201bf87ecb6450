//! Post-fetch ordering and filtering of expense rows.

pub mod policy;


pub use policy::{RowFilter, SortPolicy, UNTITLED_PLACEHOLDER};
