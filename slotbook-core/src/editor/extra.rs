use chrono::NaiveDate;

use crate::diff::ExtraSlotChanges;
use crate::preferences::BookingPreferences;
use crate::slot::{ExtraSlot, PersistedId, SlotId};
use crate::time::ClockTime;
use crate::validate::{Scope, Violation, validate_extra_slots};

use super::{EditWarning, SlotField, next_slot_range};

/// Editor for the extra slots of a single date.
///
/// Keeps the last saved slots next to the edited ones; the difference
/// between the two is what a save sends.
#[derive(Debug, Clone)]
pub struct ExtraSlotEditor {
    date: NaiveDate,
    saved: Vec<ExtraSlot>,
    slots: Vec<ExtraSlot>,
    prefs: BookingPreferences,
}

impl ExtraSlotEditor {
    pub fn new(date: NaiveDate, saved: &[ExtraSlot], prefs: BookingPreferences) -> Self {
        ExtraSlotEditor {
            date,
            saved: saved.to_vec(),
            slots: saved.to_vec(),
            prefs,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slots(&self) -> &[ExtraSlot] {
        &self.slots
    }

    fn scope(&self) -> Scope {
        Scope::Date(self.date)
    }

    /// Append a draft slot after the latest end plus the buffer, or at 09:00.
    pub fn add_slot(&mut self, reason: Option<String>) -> Option<EditWarning> {
        let latest_end = self.slots.iter().map(|s| s.end_time).max();
        let (start, end) = match next_slot_range(self.scope(), latest_end, &self.prefs) {
            Ok(range) => range,
            Err(warning) => return Some(warning),
        };
        self.push(start, end, reason)
    }

    /// Append a draft slot with an explicit range.
    pub fn add_slot_at(
        &mut self,
        start: ClockTime,
        end: ClockTime,
        reason: Option<String>,
    ) -> Option<EditWarning> {
        self.push(start, end, reason)
    }

    fn push(
        &mut self,
        start: ClockTime,
        end: ClockTime,
        reason: Option<String>,
    ) -> Option<EditWarning> {
        if self
            .slots
            .iter()
            .any(|s| s.start_time == start && s.end_time == end)
        {
            return Some(EditWarning::DuplicateSlot {
                scope: self.scope(),
                start,
                end,
            });
        }

        self.slots.push(ExtraSlot {
            id: SlotId::draft(),
            date: self.date,
            start_time: start,
            end_time: end,
            reason: reason.filter(|r| !r.trim().is_empty()),
        });
        tracing::debug!(date = %self.date, start = %start, end = %end, "extra slot added");
        None
    }

    pub fn set_slot_field(
        &mut self,
        index: usize,
        field: SlotField,
        value: ClockTime,
    ) -> Option<EditWarning> {
        let scope = self.scope();
        let Some(slot) = self.slots.get_mut(index) else {
            return Some(EditWarning::SlotNotFound { scope, index });
        };
        match field {
            SlotField::Start => slot.start_time = value,
            SlotField::End => slot.end_time = value,
        }
        None
    }

    pub fn set_reason(&mut self, index: usize, reason: Option<String>) -> Option<EditWarning> {
        let scope = self.scope();
        let Some(slot) = self.slots.get_mut(index) else {
            return Some(EditWarning::SlotNotFound { scope, index });
        };
        slot.reason = reason.filter(|r| !r.trim().is_empty());
        None
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<EditWarning> {
        if index >= self.slots.len() {
            return Some(EditWarning::SlotNotFound {
                scope: self.scope(),
                index,
            });
        }
        let removed = self.slots.remove(index);
        tracing::debug!(date = %self.date, id = ?removed.id, "extra slot removed");
        None
    }

    pub fn validate(&self) -> Vec<Violation> {
        validate_extra_slots(self.date, &self.slots, &self.prefs)
    }

    /// What a save has to send: ids to remove and slots to add.
    pub fn changes(&self) -> ExtraSlotChanges {
        ExtraSlotChanges::between(self.date, &self.saved, &self.slots)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Record that the server removed these ids, so a retry doesn't send
    /// them again.
    pub(crate) fn mark_removed(&mut self, ids: &[PersistedId]) {
        self.saved
            .retain(|s| s.id.persisted().is_none_or(|id| !ids.contains(&id)));
    }
}
