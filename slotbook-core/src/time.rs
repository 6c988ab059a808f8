//! Agent-local wall-clock times.
//!
//! Slot boundaries are plain "HH:MM" values with no timezone attached.
//! The API sometimes sends "HH:MM:SS"; seconds are dropped on parse.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SlotbookError;

/// A time of day with minute precision, in `[00:00, 24:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Default start for a freshly synthesized slot.
    pub const NINE_AM: ClockTime = match NaiveTime::from_hms_opt(9, 0, 0) {
        Some(t) => ClockTime(t),
        None => panic!("09:00 is a valid time"),
    };

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ClockTime)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.0.num_seconds_from_midnight() / 60
    }

    /// Add minutes, returning `None` if the result would reach or pass midnight.
    pub fn checked_add_minutes(&self, minutes: u32) -> Option<Self> {
        let (time, overflow) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        if overflow != 0 || minutes >= 24 * 60 {
            return None;
        }
        // Landing exactly on midnight wraps to 00:00 with overflow set, so it is
        // already excluded above.
        Some(ClockTime(time))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map_err(|_| SlotbookError::InvalidTime(s.to_string()))?;

        // Truncate HH:MM:SS to HH:MM
        let truncated = parsed
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .ok_or_else(|| SlotbookError::InvalidTime(s.to_string()))?;

        Ok(ClockTime(truncated))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
