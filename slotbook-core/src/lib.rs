//! Core of slotbook, an availability scheduler for booking agents.
//!
//! An agent publishes a recurring weekly schedule of bookable slots plus
//! one-off extra slots on specific dates. This crate provides:
//! - `schedule` and `extra` to normalize what the schedule API returns
//! - `calendar` to project it onto a month grid
//! - `editor`, `validate` and `diff` to edit, check and save changes
//! - `remote` for the schedule API and `session` tying it all together

pub mod calendar;
pub mod config;
pub mod diff;
pub mod editor;
pub mod error;
pub mod extra;
pub mod preferences;
pub mod remote;
pub mod schedule;
pub mod session;
pub mod slot;
pub mod time;
pub mod validate;
pub mod weekday;

pub use calendar::{CalendarCell, MonthGrid, YearMonth, project_month};
pub use config::SlotbookConfig;
pub use editor::{EditWarning, ExtraSlotEditor, ScheduleEditor, SlotField, WeekSchedule};
pub use error::{SlotbookError, SlotbookResult};
pub use extra::ExtraSlotIndex;
pub use preferences::BookingPreferences;
pub use remote::{HttpScheduleClient, ScheduleClient};
pub use schedule::{AggregatedSchedule, WeeklySlots, aggregate};
pub use session::{Clock, FixedClock, ScheduleSession, SystemClock};
pub use slot::{DaySchedule, ExtraSlot, PersistedId, SlotId, TimeSlot};
pub use time::ClockTime;
pub use validate::{Violation, ViolationKind};
pub use weekday::Weekday;
