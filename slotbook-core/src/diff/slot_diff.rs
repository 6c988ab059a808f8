use std::fmt;

use serde::Serialize;

use crate::diff::DiffKind;
use crate::slot::TimeSlot;
use crate::weekday::Weekday;

/// One slot-level change in the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDiff {
    pub kind: DiffKind,
    pub day: Weekday,
    pub old: Option<TimeSlot>,
    pub new: Option<TimeSlot>,
}

impl fmt::Display for SlotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.old, &self.new) {
            (Some(old), Some(new)) => write!(f, "{} {}: {old} -> {new}", self.kind, self.day),
            (Some(slot), None) | (None, Some(slot)) => {
                write!(f, "{} {}: {slot}", self.kind, self.day)
            }
            (None, None) => write!(f, "{} {}", self.kind, self.day),
        }
    }
}

impl SlotDiff {
    /// Compare two versions of a slot. `None` when nothing changed.
    ///
    /// Only the range counts as a change; ids are not compared.
    pub fn get_diff(
        day: Weekday,
        old: Option<TimeSlot>,
        new: Option<TimeSlot>,
    ) -> Option<SlotDiff> {
        let kind = match (&old, &new) {
            (None, Some(_)) => DiffKind::Create,
            (Some(_), None) => DiffKind::Delete,
            (Some(o), Some(n)) if o.same_range(n) => return None,
            (Some(_), Some(_)) => DiffKind::Update,
            (None, None) => return None,
        };
        Some(SlotDiff { kind, day, old, new })
    }

    /// The slot as it will be after the save, or the removed one for deletes.
    pub fn slot(&self) -> Option<&TimeSlot> {
        self.new.as_ref().or(self.old.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u64, start: &str, end: &str) -> TimeSlot {
        TimeSlot::persisted(id, start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn test_same_range_is_no_diff() {
        let diff = SlotDiff::get_diff(
            Weekday::Monday,
            Some(slot(1, "09:00", "10:00")),
            Some(slot(1, "09:00", "10:00")),
        );
        assert!(diff.is_none());
    }

    #[test]
    fn test_update_displays_both_ranges() {
        let diff = SlotDiff::get_diff(
            Weekday::Monday,
            Some(slot(1, "09:00", "10:00")),
            Some(slot(1, "09:30", "10:30")),
        )
        .unwrap();
        assert_eq!(diff.kind, DiffKind::Update);
        assert_eq!(diff.to_string(), "~ Monday: 09:00-10:00 -> 09:30-10:30");
    }

    #[test]
    fn test_delete_keeps_old_slot() {
        let old = slot(4, "13:00", "14:00");
        let diff = SlotDiff::get_diff(Weekday::Friday, Some(old), None).unwrap();
        assert_eq!(diff.kind, DiffKind::Delete);
        assert_eq!(diff.slot().map(|s| s.to_string()).as_deref(), Some("13:00-14:00"));
    }
}
