// --- File: crates/terminwahl_monitor/src/range.rs ---
//! Preferred date ranges and date parsing.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MonitorError;

static GERMAN_DATE: Lazy<Regex> = Lazy::new(|| compile(r"^\d{2}\.\d{2}\.\d{4}$"));
static ISO_DATE: Lazy<Regex> = Lazy::new(|| compile(r"^\d{4}-\d{2}-\d{2}$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid date pattern {pattern}: {e}"))
}

/// How soon an appointment has to be for a loud notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredRange {
    Week,
    TwoWeeks,
    Month,
    #[default]
    Any,
}

impl PreferredRange {
    /// Length of the window in days; `None` for `Any`.
    pub fn span_days(self) -> Option<i64> {
        match self {
            PreferredRange::Week => Some(7),
            PreferredRange::TwoWeeks => Some(14),
            // Longest month
            PreferredRange::Month => Some(31),
            PreferredRange::Any => None,
        }
    }

    /// Like `from_str`, but unknown names fall back to `Any`.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|e| {
            warn!("{}, accepting all dates", e);
            PreferredRange::Any
        })
    }
}

impl FromStr for PreferredRange {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "week" => Ok(PreferredRange::Week),
            "two_weeks" => Ok(PreferredRange::TwoWeeks),
            "month" => Ok(PreferredRange::Month),
            "any" => Ok(PreferredRange::Any),
            other => Err(MonitorError::InvalidRange(other.to_string())),
        }
    }
}

impl fmt::Display for PreferredRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreferredRange::Week => "week",
            PreferredRange::TwoWeeks => "two_weeks",
            PreferredRange::Month => "month",
            PreferredRange::Any => "any",
        };
        f.write_str(name)
    }
}

/// Parses `DD.MM.YYYY` or `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let format = if GERMAN_DATE.is_match(value) {
        "%d.%m.%Y"
    } else if ISO_DATE.is_match(value) {
        "%Y-%m-%d"
    } else {
        warn!("Unknown date format: {}", value);
        return None;
    };
    NaiveDate::parse_from_str(value, format)
        .map_err(|e| warn!("Invalid date {}: {}", value, e))
        .ok()
}

/// True when there is nothing to filter, or some date lies in
/// `[today, today + span]`.
pub fn dates_in_range(dates: &[NaiveDate], range: PreferredRange, today: NaiveDate) -> bool {
    let Some(span) = range.span_days() else {
        return true;
    };
    if dates.is_empty() {
        return true;
    }
    let end = today + Duration::days(span);
    let hit = dates.iter().any(|date| (today..=end).contains(date));
    debug!("Dates {:?} within {} of {}: {}", dates, range, today, hit);
    hit
}
