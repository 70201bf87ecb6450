//! Date window normalizer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::period::DateRange;

/// A closed, inclusive window of instants clamped to whole days.
///
/// `start` is midnight of its day and `end` is the last representable instant
/// of its day, so a single-day window still covers all 24 hours. The
/// invariant `start <= end` holds for every constructed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateWindow {
    /// Normalizes an arbitrary pair of instants into a whole-day window.
    ///
    /// Inverted bounds are swapped rather than producing an empty window.
    #[must_use]
    pub fn normalize(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end < start {
            tracing::debug!(%start, %end, "swapping inverted date window bounds");
            return Self::from_dates(end.date(), start.date());
        }
        Self::from_dates(start.date(), end.date())
    }

    /// Builds a window covering the given days (inclusive, order-insensitive).
    #[must_use]
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        let range = DateRange::new(start, end);
        Self {
            start: range.start.and_time(NaiveTime::MIN),
            end: range.end.and_time(end_of_day()),
        }
    }

    /// Builds a window covering a calendar range.
    #[must_use]
    pub fn from_range(range: DateRange) -> Self {
        Self::from_dates(range.start, range.end)
    }

    /// Midnight of the first day.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Last instant of the final day.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// The calendar days this window spans.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start.date(), self.end.date())
    }

    /// Returns true if `instant` lies within the window (both ends inclusive).
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Label for display, e.g. "Jan 1, 2025 - Jan 31, 2025".
    #[must_use]
    pub fn label(&self) -> String {
        self.range().label()
    }
}

impl From<DateRange> for DateWindow {
    fn from(range: DateRange) -> Self {
        Self::from_range(range)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}
