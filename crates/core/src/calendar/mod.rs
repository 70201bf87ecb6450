//! Calendar authority: period ranges and inclusive date windows.
//!
//! Every date computation in the engine goes through [`Calendar`] and
//! [`DateWindow`] so that weekly boundaries and whole-day clamping are decided
//! in one place.

pub mod period;
pub mod window;


pub use period::{Calendar, DateRange, PeriodKind};
pub use window::DateWindow;
