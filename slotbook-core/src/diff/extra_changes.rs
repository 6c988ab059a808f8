use chrono::NaiveDate;

use crate::remote::protocol::{AddExtraSlots, NewExtraSlot, RemoveExtraSlots};
use crate::slot::{ExtraSlot, PersistedId, SlotId};

/// Requests needed to bring one date's extra slots in line with the editor.
///
/// There is no update call for extra slots, so an edited persisted slot is
/// removed and added again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraSlotChanges {
    pub date: NaiveDate,
    pub to_remove: Vec<PersistedId>,
    pub to_add: Vec<ExtraSlot>,
}

impl ExtraSlotChanges {
    pub fn between(date: NaiveDate, saved: &[ExtraSlot], current: &[ExtraSlot]) -> Self {
        let unchanged = |slot: &ExtraSlot, other: &ExtraSlot| {
            slot.start_time == other.start_time
                && slot.end_time == other.end_time
                && slot.reason == other.reason
        };

        let to_remove = saved
            .iter()
            .filter_map(|old| {
                let id = old.id.persisted()?;
                let kept = current
                    .iter()
                    .any(|slot| slot.id == SlotId::Persisted(id) && unchanged(slot, old));
                (!kept).then_some(id)
            })
            .collect();

        let to_add = current
            .iter()
            .filter(|slot| match slot.id {
                SlotId::Draft(_) => true,
                SlotId::Persisted(id) => !saved
                    .iter()
                    .any(|old| old.id == SlotId::Persisted(id) && unchanged(slot, old)),
            })
            .cloned()
            .collect();

        ExtraSlotChanges {
            date,
            to_remove,
            to_add,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }

    pub fn remove_request(&self) -> Option<RemoveExtraSlots> {
        if self.to_remove.is_empty() {
            return None;
        }
        Some(RemoveExtraSlots {
            remove_extra_time_slot_ids: self.to_remove.clone(),
        })
    }

    pub fn add_request(&self) -> Option<AddExtraSlots> {
        if self.to_add.is_empty() {
            return None;
        }
        let mut slots: Vec<NewExtraSlot> = self
            .to_add
            .iter()
            .map(|slot| NewExtraSlot {
                start_time: slot.start_time,
                end_time: slot.end_time,
                reason: slot.reason.clone(),
            })
            .collect();
        slots.sort_by_key(|s| (s.start_time, s.end_time));

        Some(AddExtraSlots {
            extra_time_slots: slots,
            date: self.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn slot(id: SlotId, start: &str, end: &str) -> ExtraSlot {
        ExtraSlot {
            id,
            date: date(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            reason: None,
        }
    }

    fn persisted(id: u64) -> SlotId {
        SlotId::Persisted(PersistedId(id))
    }

    #[test]
    fn test_no_changes() {
        let saved = vec![slot(persisted(1), "09:00", "10:00")];
        let changes = ExtraSlotChanges::between(date(), &saved, &saved);
        assert!(changes.is_empty());
        assert_eq!(changes.remove_request(), None);
        assert_eq!(changes.add_request(), None);
    }

    #[test]
    fn test_edited_persisted_slot_is_remove_plus_add() {
        let saved = vec![slot(persisted(1), "09:00", "10:00")];
        let current = vec![slot(persisted(1), "09:00", "11:00")];

        let changes = ExtraSlotChanges::between(date(), &saved, &current);
        assert_eq!(changes.to_remove, vec![PersistedId(1)]);

        let add = changes.add_request().unwrap();
        assert_eq!(add.date, date());
        assert_eq!(add.extra_time_slots.len(), 1);
        assert_eq!(add.extra_time_slots[0].end_time.to_string(), "11:00");
    }

    #[test]
    fn test_removed_and_new_slots() {
        let saved = vec![
            slot(persisted(1), "09:00", "10:00"),
            slot(persisted(2), "14:00", "15:00"),
        ];
        let current = vec![
            slot(persisted(2), "14:00", "15:00"),
            slot(SlotId::draft(), "16:00", "17:00"),
        ];

        let changes = ExtraSlotChanges::between(date(), &saved, &current);
        assert_eq!(
            changes.remove_request().unwrap().remove_extra_time_slot_ids,
            vec![PersistedId(1)]
        );
        assert_eq!(changes.to_add.len(), 1);
        assert!(changes.to_add[0].id.is_draft());
    }

    #[test]
    fn test_reason_change_counts() {
        let saved = vec![slot(persisted(1), "09:00", "10:00")];
        let mut current = saved.clone();
        current[0].reason = Some("Holiday cover".into());

        let changes = ExtraSlotChanges::between(date(), &saved, &current);
        assert_eq!(changes.to_remove.len(), 1);
        assert_eq!(changes.to_add.len(), 1);
    }
}
