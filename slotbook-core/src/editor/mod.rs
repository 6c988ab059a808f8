//! In-memory editing of an agent's schedule.
//!
//! Edits are synchronous and never fail: an edit that can't be applied is a
//! no-op and comes back as an [`EditWarning`]. Neighbouring slots are never
//! shifted automatically; each slot is edited independently.

mod extra;
mod week;

use std::fmt;

pub use extra::ExtraSlotEditor;
pub use week::WeekSchedule;

use crate::preferences::BookingPreferences;
use crate::slot::{DaySchedule, PersistedId, SlotId, TimeSlot};
use crate::time::ClockTime;
use crate::validate::{Scope, Violation, ViolationKind, validate_week};
use crate::weekday::Weekday;

/// Which end of a slot to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Start,
    End,
}

/// Why an edit was not (fully) applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditWarning {
    /// The day already has a slot with this exact range.
    DuplicateSlot {
        scope: Scope,
        start: ClockTime,
        end: ClockTime,
    },
    /// The new slot would end at or after midnight.
    MidnightOverflow { scope: Scope, start: ClockTime },
    SlotNotFound { scope: Scope, index: usize },
}

impl EditWarning {
    pub fn kind(&self) -> Option<ViolationKind> {
        match self {
            EditWarning::DuplicateSlot { .. } => Some(ViolationKind::DuplicateSlot),
            EditWarning::MidnightOverflow { .. } => Some(ViolationKind::MidnightOverflow),
            EditWarning::SlotNotFound { .. } => None,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().map_or("SLOT_NOT_FOUND", |k| k.code())
    }
}

impl fmt::Display for EditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditWarning::DuplicateSlot { scope, start, end } => {
                write!(f, "{scope}: a {start}-{end} slot already exists")
            }
            EditWarning::MidnightOverflow { scope, start } => {
                write!(f, "{scope}: a slot starting at {start} would run past midnight")
            }
            EditWarning::SlotNotFound { scope, index } => {
                write!(f, "{scope}: no slot {}", index + 1)
            }
        }
    }
}

/// Compute the next slot after `latest_end` (or at 09:00 when there is none).
pub(crate) fn next_slot_range(
    scope: Scope,
    latest_end: Option<ClockTime>,
    prefs: &BookingPreferences,
) -> Result<(ClockTime, ClockTime), EditWarning> {
    let start = match latest_end {
        Some(end) => end
            .checked_add_minutes(prefs.buffer_time_minutes)
            .ok_or(EditWarning::MidnightOverflow { scope, start: end })?,
        None => ClockTime::NINE_AM,
    };
    let end = start
        .checked_add_minutes(prefs.meeting_duration_minutes)
        .ok_or(EditWarning::MidnightOverflow { scope, start })?;
    Ok((start, end))
}

/// Mutable weekly schedule plus the persisted ids to delete on the next save.
#[derive(Debug, Clone)]
pub struct ScheduleEditor {
    week: WeekSchedule,
    deleted_slot_ids: Vec<PersistedId>,
    prefs: BookingPreferences,
}

impl ScheduleEditor {
    pub fn new(week: WeekSchedule, prefs: BookingPreferences) -> Self {
        ScheduleEditor {
            week,
            deleted_slot_ids: Vec::new(),
            prefs,
        }
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        self.week.day(day)
    }

    /// Persisted ids to send in `deletedSlots`, in the order they were removed.
    pub fn deleted_slot_ids(&self) -> &[PersistedId] {
        &self.deleted_slot_ids
    }

    pub fn preferences(&self) -> &BookingPreferences {
        &self.prefs
    }

    /// All violations for the week. Empty means the schedule may be saved.
    pub fn validate(&self) -> Vec<Violation> {
        validate_week(self.week.days(), &self.prefs)
    }

    /// Enable or disable a day.
    ///
    /// Disabling moves the ids of the day's persisted slots into the deletion
    /// list. The slots stay in place (as drafts) so the user still sees them.
    /// Enabling an empty day creates a 09:00 slot of the meeting duration.
    /// Re-enabling never takes ids back out of the deletion list.
    pub fn toggle_day(&mut self, day: Weekday, enabled: bool) -> Option<EditWarning> {
        let schedule = self.week.day_mut(day);

        if schedule.is_enabled == enabled {
            return None;
        }

        if !enabled {
            schedule.is_enabled = false;
            for slot in &mut schedule.time_slots {
                if let Some(id) = slot.id.persisted() {
                    if !self.deleted_slot_ids.contains(&id) {
                        self.deleted_slot_ids.push(id);
                    }
                    slot.id = SlotId::draft();
                }
            }
            tracing::debug!(day = %day, deleted = self.deleted_slot_ids.len(), "day disabled");
            return None;
        }

        schedule.is_enabled = true;
        tracing::debug!(day = %day, "day enabled");

        if !schedule.time_slots.is_empty() {
            return None;
        }

        match next_slot_range(Scope::Day(day), None, &self.prefs) {
            Ok((start, end)) => {
                schedule.time_slots.push(TimeSlot::draft(start, end));
                None
            }
            // Day stays enabled and empty; the validator reports it.
            Err(warning) => Some(warning),
        }
    }

    /// Set the start or end of one slot. Other slots are left untouched.
    pub fn set_slot_field(
        &mut self,
        day: Weekday,
        index: usize,
        field: SlotField,
        value: ClockTime,
    ) -> Option<EditWarning> {
        let Some(slot) = self.week.day_mut(day).time_slots.get_mut(index) else {
            return Some(EditWarning::SlotNotFound {
                scope: Scope::Day(day),
                index,
            });
        };

        match field {
            SlotField::Start => slot.start = value,
            SlotField::End => slot.end = value,
        }
        tracing::debug!(day = %day, index, ?field, value = %value, "slot edited");
        None
    }

    /// Append a draft slot after the day's latest end plus the buffer.
    ///
    /// Adding a slot to a disabled day enables it.
    pub fn add_slot(&mut self, day: Weekday) -> Option<EditWarning> {
        let scope = Scope::Day(day);
        let schedule = self.week.day_mut(day);

        let (start, end) = match next_slot_range(scope, schedule.latest_end(), &self.prefs) {
            Ok(range) => range,
            Err(warning) => return Some(warning),
        };

        if schedule.has_range(start, end) {
            return Some(EditWarning::DuplicateSlot { scope, start, end });
        }

        schedule.time_slots.push(TimeSlot::draft(start, end));
        schedule.is_enabled = true;
        tracing::debug!(day = %day, start = %start, end = %end, "slot added");
        None
    }

    /// Remove one slot. Removing the last slot disables the day.
    pub fn remove_slot(&mut self, day: Weekday, index: usize) -> Option<EditWarning> {
        let schedule = self.week.day_mut(day);
        if index >= schedule.time_slots.len() {
            return Some(EditWarning::SlotNotFound {
                scope: Scope::Day(day),
                index,
            });
        }

        let removed = schedule.time_slots.remove(index);
        if schedule.time_slots.is_empty() {
            schedule.is_enabled = false;
        }

        if let Some(id) = removed.id.persisted() {
            if !self.deleted_slot_ids.contains(&id) {
                self.deleted_slot_ids.push(id);
            }
        }
        tracing::debug!(day = %day, index, slot = %removed, "slot removed");
        None
    }

    /// Forget the deletion list once the server has applied it.
    pub(crate) fn clear_deleted(&mut self) {
        self.deleted_slot_ids.clear();
    }
}
