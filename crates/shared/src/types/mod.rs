//! Common types used across the application.

pub mod id;
pub mod view;


pub use id::*;
pub use view::{ParseViewEnumError, Segment, SortMode, WeekStart};
