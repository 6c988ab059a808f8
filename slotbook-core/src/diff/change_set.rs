//! Weekly schedule change detection and save payload construction.

use std::collections::BTreeMap;

use crate::diff::{DiffKind, SlotDiff};
use crate::editor::WeekSchedule;
use crate::remote::protocol::{SaveSchedule, ScheduleEntry};
use crate::slot::{PersistedId, SlotId, TimeSlot};
use crate::weekday::Weekday;

/// Whether `current` differs from the last saved `saved` state.
///
/// Pending deletions, a changed enabled flag, any draft slot, a changed slot
/// count, or a persisted slot whose range moved all count as changes.
pub fn has_unsaved_changes(
    current: &WeekSchedule,
    saved: &WeekSchedule,
    deleted: &[PersistedId],
) -> bool {
    if !deleted.is_empty() {
        return true;
    }

    Weekday::ALL.into_iter().any(|day| {
        let now = current.day(day);
        let before = saved.day(day);

        now.is_enabled != before.is_enabled
            || now.time_slots.len() != before.time_slots.len()
            || now.time_slots.iter().any(|slot| match slot.id {
                SlotId::Draft(_) => true,
                SlotId::Persisted(id) => find_slot(&before.time_slots, id)
                    .is_none_or(|old| !old.same_range(slot)),
            })
    })
}

/// Build the save request.
///
/// Enabled days are taken Monday first, each sorted by start, and numbered
/// with consecutive ordinals from 0. Disabled days contribute nothing. Draft
/// slots go out without an id so the server creates them.
pub fn build_payload(current: &WeekSchedule, deleted: &[PersistedId]) -> SaveSchedule {
    let entries = current.enabled_days().flat_map(|day| {
        let mut slots: Vec<&TimeSlot> = day.time_slots.iter().collect();
        slots.sort_by_key(|s| (s.start, s.end));
        slots.into_iter().map(|slot| ScheduleEntry {
            id: slot.id.persisted(),
            day: day.weekday,
            start_time: slot.start,
            end_time: slot.end,
        })
    });

    let schedule: BTreeMap<usize, ScheduleEntry> = entries.enumerate().collect();

    let mut deleted_slots = Vec::with_capacity(deleted.len());
    for id in deleted {
        if !deleted_slots.contains(id) {
            deleted_slots.push(*id);
        }
    }

    SaveSchedule {
        schedule,
        deleted_slots,
    }
}

/// Everything a save of the weekly schedule would change.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    pub payload: SaveSchedule,
    /// Slot-level changes, ordered by day then start.
    pub diffs: Vec<SlotDiff>,
}

impl ChangeSet {
    pub fn between(current: &WeekSchedule, saved: &WeekSchedule, deleted: &[PersistedId]) -> Self {
        let mut diffs = Vec::new();

        for day in current.enabled_days() {
            let before = saved.day(day.weekday);
            for slot in &day.time_slots {
                let old = slot
                    .id
                    .persisted()
                    .and_then(|id| find_slot(&before.time_slots, id));
                let diff = match old {
                    // Inactive slot on a re-enabled day: sent with its id and
                    // reactivated in place, even when the range is unchanged
                    Some(old) if !before.is_enabled => Some(SlotDiff {
                        kind: DiffKind::Update,
                        day: day.weekday,
                        old: Some(old.clone()),
                        new: Some(slot.clone()),
                    }),
                    old => SlotDiff::get_diff(day.weekday, old.cloned(), Some(slot.clone())),
                };
                diffs.extend(diff);
            }
        }

        for id in deleted {
            let removed = saved
                .days()
                .find_map(|day| find_slot(&day.time_slots, *id).map(|slot| (day.weekday, slot)));
            if let Some((day, slot)) = removed {
                if let Some(diff) = SlotDiff::get_diff(day, Some(slot.clone()), None) {
                    diffs.push(diff);
                }
            }
        }

        diffs.sort_by_key(|d| (d.day, d.slot().map(|s| (s.start, s.end))));

        ChangeSet {
            payload: build_payload(current, deleted),
            diffs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// (created, updated, deleted)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut created = 0;
        let mut updated = 0;
        let mut deleted = 0;

        for diff in &self.diffs {
            match diff.kind {
                DiffKind::Create => created += 1,
                DiffKind::Update => updated += 1,
                DiffKind::Delete => deleted += 1,
            }
        }

        (created, updated, deleted)
    }
}

fn find_slot(slots: &[TimeSlot], id: PersistedId) -> Option<&TimeSlot> {
    slots.iter().find(|s| s.id == SlotId::Persisted(id))
}
