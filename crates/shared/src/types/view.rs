//! View enums shared between configuration and the view-state engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a view enum cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseViewEnumError {
    kind: &'static str,
    value: String,
}

/// Which expense list the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Planned expenses tracked against the budget.
    #[default]
    Planned,
    /// Variable expenses tracked against the budget's cards.
    Variable,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

impl FromStr for Segment {
    type Err = ParseViewEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "variable" | "unplanned" => Ok(Self::Variable),
            _ => Err(ParseViewEnumError {
                kind: "segment",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering applied to the visible expense rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Case-insensitive description, A to Z.
    Alphabetical,
    /// Smallest amount first.
    AmountAscending,
    /// Largest amount first.
    AmountDescending,
    /// Oldest transaction first.
    DateAscending,
    /// Newest transaction first.
    #[default]
    DateDescending,
}

impl SortMode {
    /// All sort modes, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Alphabetical,
        Self::AmountAscending,
        Self::AmountDescending,
        Self::DateAscending,
        Self::DateDescending,
    ];
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alphabetical => "alphabetical",
            Self::AmountAscending => "amount_ascending",
            Self::AmountDescending => "amount_descending",
            Self::DateAscending => "date_ascending",
            Self::DateDescending => "date_descending",
        };
        f.write_str(name)
    }
}

impl FromStr for SortMode {
    type Err = ParseViewEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseViewEnumError {
                kind: "sort mode",
                value: s.to_string(),
            })
    }
}

/// First day of the calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// ISO weeks (Monday through Sunday).
    #[default]
    Monday,
    /// Sunday through Saturday.
    Sunday,
}

impl FromStr for WeekStart {
    type Err = ParseViewEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(ParseViewEnumError {
                kind: "week start",
                value: s.to_string(),
            }),
        }
    }
}
