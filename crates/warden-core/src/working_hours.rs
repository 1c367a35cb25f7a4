//! Working-hours policy: flag logins outside a configured time-of-day window

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::{DEFAULT_WORKING_HOURS_END, DEFAULT_WORKING_HOURS_START};

/// Working-hours configuration, boundaries in `HH:MM` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingHoursConfig {
    pub start: String,
    pub end: String,
}

impl Default for WorkingHoursConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_WORKING_HOURS_START.to_owned(),
            end: DEFAULT_WORKING_HOURS_END.to_owned(),
        }
    }
}

/// Time-of-day window during which logins proceed without an extra MFA
/// challenge.
///
/// The window may span midnight (e.g. 22:00–06:00 for a night shift). Both
/// boundaries are part of the allowed region in either case. Immutable after
/// construction, so shared concurrent reads need no synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHoursPolicy {
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingHoursPolicy {
    /// Build a policy from `HH:MM` boundary strings.
    ///
    /// Fails with [`ValidationError::TimeOfDay`] if either string is not a
    /// well-formed time of day.
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let start = parse_time_of_day(start)?;
        let end = parse_time_of_day(end)?;
        debug!("working hours policy configured: {} - {}", start, end);
        Ok(Self { start, end })
    }

    /// Build a policy from configuration
    pub fn with_config(config: &WorkingHoursConfig) -> Result<Self> {
        Self::new(&config.start, &config.end)
    }

    /// Start of the allowed window
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the allowed window
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether the allowed window wraps past midnight
    pub fn spans_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Check whether `timestamp` falls outside the allowed window.
    ///
    /// Only the time-of-day component is considered; the date is discarded.
    /// Returns `true` when the login should be flagged for MFA.
    pub fn is_outside_working_hours(&self, timestamp: DateTime<Utc>) -> bool {
        let time = timestamp.time();
        debug!(
            "checking login time {} against allowed window {} - {}",
            time, self.start, self.end
        );

        let outside = if self.start <= self.end {
            // Allowed region is [start, end]; both bounds inside.
            time < self.start || time > self.end
        } else {
            // Window spans midnight: allowed region is [start, 24:00) plus
            // [00:00, end], so the disallowed gap is the open interval
            // between end and start.
            self.end < time && time < self.start
        };

        if outside {
            info!("login at {} outside working hours, MFA required", time);
        }
        outside
    }
}

fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ValidationError::TimeOfDay(raw.to_owned()))
}
