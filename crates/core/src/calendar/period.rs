//! Period calculator.

use chrono::{Datelike, Days, Months, NaiveDate};
use pennywise_shared::types::WeekStart;
use serde::{Deserialize, Serialize};

/// Length of a biweekly block in days.
const BIWEEK_DAYS: i64 = 14;

/// Display format used in period labels (e.g. "Jan 5, 2025").
const LABEL_FORMAT: &str = "%b %-d, %Y";

/// Kind of calendar period a budget spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodKind {
    /// Seven days starting on the configured week start.
    Weekly,
    /// Fourteen days, tiled from a fixed week-start epoch.
    Biweekly,
    /// Calendar month.
    Monthly,
    /// Calendar quarter.
    Quarterly,
    /// Calendar year.
    Yearly,
    /// Explicit range chosen by the user.
    Custom {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range from two days, swapping them if given out of order.
    #[must_use]
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns true if the given day falls within this range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends.
    #[must_use]
    pub fn len_days(&self) -> u64 {
        u64::try_from((self.end - self.start).num_days()).map_or(1, |days| days + 1)
    }

    /// Human readable label, e.g. "Jan 1, 2025 - Jan 31, 2025".
    #[must_use]
    pub fn label(&self) -> String {
        if self.start == self.end {
            return self.start.format(LABEL_FORMAT).to_string();
        }
        format!(
            "{} - {}",
            self.start.format(LABEL_FORMAT),
            self.end.format(LABEL_FORMAT)
        )
    }
}

/// Single calendar authority for period arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calendar {
    week_start: WeekStart,
}

impl Calendar {
    /// Creates a calendar with the given first day of the week.
    #[must_use]
    pub const fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// Returns the configured first day of the week.
    #[must_use]
    pub const fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Returns the period of the given kind containing `reference`.
    ///
    /// Total: every representable date yields a valid range. Custom periods
    /// ignore the reference date and return their own (ordered) bounds.
    #[must_use]
    pub fn period_containing(&self, reference: NaiveDate, kind: PeriodKind) -> DateRange {
        match kind {
            PeriodKind::Weekly => {
                let start = self.start_of_week(reference);
                DateRange::new(start, add_days(start, 6))
            }
            PeriodKind::Biweekly => {
                let anchor = self.biweekly_anchor();
                let week = self.start_of_week(reference);
                let block = (week - anchor).num_days().div_euclid(BIWEEK_DAYS);
                let start = shift_days(anchor, block * BIWEEK_DAYS);
                DateRange::new(start, shift_days(start, BIWEEK_DAYS - 1))
            }
            PeriodKind::Monthly => {
                let start = first_of_month(reference);
                DateRange::new(start, last_before(start.checked_add_months(Months::new(1))))
            }
            PeriodKind::Quarterly => {
                let month_start = first_of_month(reference);
                let start = month_start
                    .checked_sub_months(Months::new(reference.month0() % 3))
                    .unwrap_or(month_start);
                DateRange::new(start, last_before(start.checked_add_months(Months::new(3))))
            }
            PeriodKind::Yearly => {
                let start = reference
                    .checked_sub_days(Days::new(u64::from(reference.ordinal0())))
                    .unwrap_or(reference);
                DateRange::new(start, last_before(start.checked_add_months(Months::new(12))))
            }
            PeriodKind::Custom { start, end } => DateRange::new(start, end),
        }
    }

    /// Returns the period immediately after `current`.
    #[must_use]
    pub fn next_period(&self, current: DateRange, kind: PeriodKind) -> DateRange {
        match kind {
            PeriodKind::Custom { .. } => {
                let start = add_days(current.end, 1);
                DateRange::new(start, add_days(start, current.len_days() - 1))
            }
            _ => self.period_containing(add_days(current.end, 1), kind),
        }
    }

    /// Returns the period immediately before `current`.
    #[must_use]
    pub fn previous_period(&self, current: DateRange, kind: PeriodKind) -> DateRange {
        match kind {
            PeriodKind::Custom { .. } => {
                let end = sub_days(current.start, 1);
                DateRange::new(sub_days(end, current.len_days() - 1), end)
            }
            _ => self.period_containing(sub_days(current.start, 1), kind),
        }
    }

    /// First day of the week containing `date`.
    #[must_use]
    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let offset = match self.week_start {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        sub_days(date, u64::from(offset))
    }

    /// A fixed week-start day that biweekly blocks are tiled from.
    fn biweekly_anchor(&self) -> NaiveDate {
        // 1970-01-05 was a Monday, 1970-01-04 a Sunday.
        let day = match self.week_start {
            WeekStart::Monday => 5,
            WeekStart::Sunday => 4,
        };
        NaiveDate::from_ymd_opt(1970, 1, day).unwrap_or(NaiveDate::MIN)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    sub_days(date, u64::from(date.day0()))
}

/// Day before `next`, or the last representable day when `next` overflowed.
fn last_before(next: Option<NaiveDate>) -> NaiveDate {
    next.map_or(NaiveDate::MAX, |next| sub_days(next, 1))
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        add_days(date, days.unsigned_abs())
    } else {
        sub_days(date, days.unsigned_abs())
    }
}
