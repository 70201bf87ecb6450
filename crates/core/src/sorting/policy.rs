//! Sort and filter policy.

use std::cmp::Ordering;

use pennywise_shared::types::{Segment, SortMode};

use crate::records::ExpenseRow;
use crate::summary::PeriodRecords;

/// Sort key used for rows with an empty description.
pub const UNTITLED_PLACEHOLDER: &str = "untitled";

/// Narrows the visible rows without touching summary totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    search: Option<String>,
}

impl RowFilter {
    /// A filter that keeps every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps rows whose description or category name contains `text`
    /// (case-insensitive). Blank text clears the search.
    #[must_use]
    pub fn with_search(text: &str) -> Self {
        let trimmed = text.trim();
        Self {
            search: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    /// The normalized search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns true if `row` is visible under this filter.
    #[must_use]
    pub fn matches(&self, row: &ExpenseRow) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        row.description().to_lowercase().contains(needle.as_str())
            || row.category().name().to_lowercase().contains(needle.as_str())
    }
}

/// Stateless comparator selection over the five sort modes.
pub struct SortPolicy;

impl SortPolicy {
    /// Builds the visible rows for `segment`: filter, then stable sort.
    #[must_use]
    pub fn visible_rows(
        records: &PeriodRecords,
        segment: Segment,
        mode: SortMode,
        filter: &RowFilter,
    ) -> Vec<ExpenseRow> {
        let mut rows: Vec<ExpenseRow> = match segment {
            Segment::Planned => records
                .planned
                .iter()
                .cloned()
                .map(ExpenseRow::Planned)
                .collect(),
            Segment::Variable => records
                .variable
                .iter()
                .cloned()
                .map(ExpenseRow::Variable)
                .collect(),
        };
        rows.retain(|row| filter.matches(row));
        Self::sort_rows(&mut rows, mode);
        rows
    }

    /// Sorts rows in place. Stable: rows with equal keys keep their order.
    pub fn sort_rows(rows: &mut [ExpenseRow], mode: SortMode) {
        rows.sort_by(|a, b| Self::compare(a, b, mode));
    }

    /// Total order used by `mode`.
    ///
    /// Amount and date modes fall back to the alphabetical order on ties.
    #[must_use]
    pub fn compare(a: &ExpenseRow, b: &ExpenseRow, mode: SortMode) -> Ordering {
        let alphabetical =
            || Self::title_key(a.description()).cmp(&Self::title_key(b.description()));
        match mode {
            SortMode::Alphabetical => alphabetical(),
            SortMode::AmountAscending => a.amount().cmp(&b.amount()).then_with(alphabetical),
            SortMode::AmountDescending => b.amount().cmp(&a.amount()).then_with(alphabetical),
            SortMode::DateAscending => a
                .transaction_date()
                .cmp(&b.transaction_date())
                .then_with(alphabetical),
            SortMode::DateDescending => b
                .transaction_date()
                .cmp(&a.transaction_date())
                .then_with(alphabetical),
        }
    }

    /// Case-insensitive alphabetical key, with a fixed key for blank titles.
    #[must_use]
    pub fn title_key(description: &str) -> String {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            UNTITLED_PLACEHOLDER.to_string()
        } else {
            trimmed.to_lowercase()
        }
    }
}
