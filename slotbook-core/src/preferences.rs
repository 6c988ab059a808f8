//! Booking preferences. Owned by the preferences service; read-only here.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MEETING_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_BUFFER_TIME_MINUTES: u32 = 15;

fn default_meeting_duration() -> u32 {
    DEFAULT_MEETING_DURATION_MINUTES
}

fn default_buffer_time() -> u32 {
    DEFAULT_BUFFER_TIME_MINUTES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPreferences {
    #[serde(default = "default_meeting_duration")]
    pub meeting_duration_minutes: u32,

    /// Minimum gap between the end of one slot and the start of the next.
    #[serde(default = "default_buffer_time")]
    pub buffer_time_minutes: u32,

    #[serde(default)]
    pub daily_booking_limit: Option<u32>,

    #[serde(default)]
    pub lead_time_minutes: u32,

    #[serde(default)]
    pub auto_cancel_after_minutes: Option<u32>,

    #[serde(default)]
    pub cancel_reschedule_buffer_minutes: u32,

    #[serde(default)]
    pub availability_types: BTreeSet<String>,

    /// Decides which dates count as past. Slot times are never converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Tz>,
}

impl Default for BookingPreferences {
    fn default() -> Self {
        BookingPreferences {
            meeting_duration_minutes: DEFAULT_MEETING_DURATION_MINUTES,
            buffer_time_minutes: DEFAULT_BUFFER_TIME_MINUTES,
            daily_booking_limit: None,
            lead_time_minutes: 0,
            auto_cancel_after_minutes: None,
            cancel_reschedule_buffer_minutes: 0,
            availability_types: BTreeSet::new(),
            timezone: None,
        }
    }
}

impl BookingPreferences {
    pub fn with_durations(meeting_duration_minutes: u32, buffer_time_minutes: u32) -> Self {
        BookingPreferences {
            meeting_duration_minutes,
            buffer_time_minutes,
            ..Default::default()
        }
    }
}
