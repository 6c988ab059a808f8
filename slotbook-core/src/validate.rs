//! Pre-save validation of slot sets.
//!
//! Every check runs and every violation is reported; nothing stops at the
//! first problem. A non-empty result blocks saving.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::preferences::BookingPreferences;
use crate::slot::{DaySchedule, ExtraSlot, TimeSlot};
use crate::weekday::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    EmptyEnabledDay,
    OverlappingSlots,
    InvalidDuration,
    DuplicateSlot,
    MidnightOverflow,
}

impl ViolationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::EmptyEnabledDay => "EMPTY_ENABLED_DAY",
            ViolationKind::OverlappingSlots => "OVERLAPPING_SLOTS",
            ViolationKind::InvalidDuration => "INVALID_DURATION",
            ViolationKind::DuplicateSlot => "DUPLICATE_SLOT",
            ViolationKind::MidnightOverflow => "MIDNIGHT_OVERFLOW",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What a violation is attached to: a weekday of the recurring schedule or a
/// date with extra slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Day(Weekday),
    Date(NaiveDate),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Day(day) => write!(f, "{day}"),
            Scope::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub scope: Scope,
    /// Index into the slot list as the user sees it, if slot-specific.
    pub slot_index: Option<usize>,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot_index {
            Some(i) => write!(f, "{} slot {}: {}", self.scope, i + 1, self.message),
            None => write!(f, "{}: {}", self.scope, self.message),
        }
    }
}

/// Validate one weekday.
///
/// Disabled days are not saved, so only enabled days get the overlap and
/// duration checks.
pub fn validate_day(day: &DaySchedule, prefs: &BookingPreferences) -> Vec<Violation> {
    let scope = Scope::Day(day.weekday);
    let mut violations = Vec::new();

    if !day.is_enabled {
        return violations;
    }

    if day.time_slots.is_empty() {
        violations.push(Violation {
            scope,
            slot_index: None,
            kind: ViolationKind::EmptyEnabledDay,
            message: "day is enabled but has no time slots".to_string(),
        });
    }

    check_slots(scope, &day.time_slots, prefs.buffer_time_minutes, &mut violations);
    violations
}

/// Validate a whole week, Monday first. Violations of all days are returned together.
pub fn validate_week<'a>(
    days: impl IntoIterator<Item = &'a DaySchedule>,
    prefs: &BookingPreferences,
) -> Vec<Violation> {
    let mut days: Vec<&DaySchedule> = days.into_iter().collect();
    days.sort_by_key(|d| d.weekday);
    days.into_iter()
        .flat_map(|day| validate_day(day, prefs))
        .collect()
}

/// Validate the extra slots of one date.
pub fn validate_extra_slots(
    date: NaiveDate,
    slots: &[ExtraSlot],
    prefs: &BookingPreferences,
) -> Vec<Violation> {
    let slots: Vec<TimeSlot> = slots.iter().map(ExtraSlot::as_time_slot).collect();
    let mut violations = Vec::new();
    check_slots(Scope::Date(date), &slots, prefs.buffer_time_minutes, &mut violations);
    violations
}

fn check_slots(scope: Scope, slots: &[TimeSlot], buffer: u32, out: &mut Vec<Violation>) {
    // Overlap with buffer. Compare each slot against the latest-ending slot
    // before it in start order, so a long slot enclosing several short ones
    // is still caught.
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by_key(|&i| (slots[i].start, slots[i].end));

    let mut latest: Option<usize> = None;
    for &i in &order {
        if let Some(prev) = latest {
            let prev_end = slots[prev].end.minutes();
            let start = slots[i].start.minutes();
            if prev_end.saturating_add(buffer) > start {
                out.push(Violation {
                    scope,
                    slot_index: Some(i),
                    kind: ViolationKind::OverlappingSlots,
                    message: overlap_message(&slots[prev], &slots[i], buffer),
                });
            }
        }
        if latest.is_none_or(|prev| slots[i].end > slots[prev].end) {
            latest = Some(i);
        }
    }

    for (i, slot) in slots.iter().enumerate() {
        if slot.end <= slot.start {
            out.push(Violation {
                scope,
                slot_index: Some(i),
                kind: ViolationKind::InvalidDuration,
                message: format!("{slot} must end after it starts"),
            });
        }
    }
}

fn overlap_message(earlier: &TimeSlot, later: &TimeSlot, buffer: u32) -> String {
    if earlier.end > later.start {
        format!("{later} overlaps {earlier}")
    } else {
        let gap = later.start.minutes() - earlier.end.minutes();
        format!("{later} starts {gap} min after {earlier} ends; at least {buffer} min required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::draft(start.parse().unwrap(), end.parse().unwrap())
    }

    fn monday(slots: Vec<TimeSlot>) -> DaySchedule {
        DaySchedule {
            weekday: Weekday::Monday,
            is_enabled: true,
            time_slots: slots,
        }
    }

    fn prefs(buffer: u32) -> BookingPreferences {
        BookingPreferences::with_durations(30, buffer)
    }

    #[test]
    fn test_gap_shorter_than_buffer_overlaps() {
        let day = monday(vec![slot("09:00", "10:00"), slot("10:10", "11:00")]);
        let violations = validate_day(&day, &prefs(15));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::OverlappingSlots);
        assert_eq!(violations[0].slot_index, Some(1));
    }

    #[test]
    fn test_gap_equal_to_buffer_is_valid() {
        let day = monday(vec![slot("09:00", "10:00"), slot("10:15", "11:00")]);
        assert!(validate_day(&day, &prefs(15)).is_empty());
    }

    #[test]
    fn test_unsorted_input_is_sorted_before_checking() {
        let day = monday(vec![slot("10:10", "11:00"), slot("09:00", "10:00")]);
        let violations = validate_day(&day, &prefs(15));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].slot_index, Some(0));
    }

    #[test]
    fn test_enclosing_slot_catches_non_adjacent_overlap() {
        let day = monday(vec![
            slot("09:00", "17:00"),
            slot("10:00", "11:00"),
            slot("12:00", "13:00"),
        ]);
        let violations = validate_day(&day, &prefs(0));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_huge_buffer_saturates() {
        let day = monday(vec![slot("09:00", "10:00"), slot("23:00", "23:30")]);
        let violations = validate_day(&day, &prefs(u32::MAX));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::OverlappingSlots);
    }

    #[test]
    fn test_enabled_empty_day() {
        let day = monday(vec![]);
        let violations = validate_day(&day, &prefs(15));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind.code(), "EMPTY_ENABLED_DAY");
    }

    #[test]
    fn test_disabled_day_is_not_checked() {
        let mut day = monday(vec![slot("09:00", "10:00"), slot("09:30", "10:30")]);
        day.is_enabled = false;
        assert!(validate_day(&day, &prefs(15)).is_empty());
    }

    #[test]
    fn test_all_violations_accumulate_in_order() {
        let day = monday(vec![slot("10:05", "10:00"), slot("09:00", "10:00")]);
        let violations = validate_day(&day, &prefs(15));

        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![ViolationKind::OverlappingSlots, ViolationKind::InvalidDuration]
        );
        assert_eq!(
            violations[1].to_string(),
            "Monday slot 1: 10:05-10:00 must end after it starts"
        );
    }

    #[test]
    fn test_week_reports_every_day() {
        let mut tuesday = monday(vec![]);
        tuesday.weekday = Weekday::Tuesday;
        let mon = monday(vec![slot("09:00", "10:00"), slot("10:05", "11:00")]);

        let violations = validate_week([&tuesday, &mon], &prefs(15));
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].scope, Scope::Day(Weekday::Monday));
        assert_eq!(violations[1].scope, Scope::Day(Weekday::Tuesday));
    }

    #[test]
    fn test_extra_slots_use_same_rules() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let extra = |start: &str, end: &str| ExtraSlot {
            id: crate::slot::SlotId::draft(),
            date,
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            reason: None,
        };

        let slots = [extra("14:00", "15:00"), extra("15:05", "16:00")];
        let violations = validate_extra_slots(date, &slots, &prefs(15));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].scope, Scope::Date(date));
    }
}
