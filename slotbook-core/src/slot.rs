//! Slot types shared by the weekly schedule and the extra-slot store.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::time::ClockTime;
use crate::weekday::Weekday;

/// Identifier assigned by the schedule API.
///
/// The API is inconsistent about sending ids as numbers or numeric strings,
/// so both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PersistedId(pub u64);

impl fmt::Display for PersistedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for PersistedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(PersistedId(n)),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map(PersistedId)
                .map_err(|_| serde::de::Error::custom(format!("invalid id '{s}'"))),
        }
    }
}

/// Local identifier for a slot that has not been saved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub Uuid);

impl DraftId {
    pub fn new() -> Self {
        DraftId(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a slot exists on the server or only locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    Persisted(PersistedId),
    Draft(DraftId),
}

impl SlotId {
    pub fn draft() -> Self {
        SlotId::Draft(DraftId::new())
    }

    pub fn persisted(&self) -> Option<PersistedId> {
        match self {
            SlotId::Persisted(id) => Some(*id),
            SlotId::Draft(_) => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, SlotId::Draft(_))
    }
}

/// A bookable time range within one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    pub fn persisted(id: u64, start: ClockTime, end: ClockTime) -> Self {
        TimeSlot {
            id: SlotId::Persisted(PersistedId(id)),
            start,
            end,
        }
    }

    pub fn draft(start: ClockTime, end: ClockTime) -> Self {
        TimeSlot {
            id: SlotId::draft(),
            start,
            end,
        }
    }

    /// Same `(start, end)` range, ignoring ids.
    pub fn same_range(&self, other: &TimeSlot) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// One weekday of the recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub weekday: Weekday,
    pub is_enabled: bool,
    pub time_slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn disabled(weekday: Weekday) -> Self {
        DaySchedule {
            weekday,
            is_enabled: false,
            time_slots: Vec::new(),
        }
    }

    /// Latest end among the day's slots (not necessarily the last slot's end).
    pub fn latest_end(&self) -> Option<ClockTime> {
        self.time_slots.iter().map(|s| s.end).max()
    }

    pub fn has_range(&self, start: ClockTime, end: ClockTime) -> bool {
        self.time_slots
            .iter()
            .any(|s| s.start == start && s.end == end)
    }
}

/// A one-off availability slot on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSlot {
    pub id: SlotId,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExtraSlot {
    /// View as a plain time slot, for validation alongside weekly slots.
    pub fn as_time_slot(&self) -> TimeSlot {
        TimeSlot {
            id: self.id,
            start: self.start_time,
            end: self.end_time,
        }
    }
}
