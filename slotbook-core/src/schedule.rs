//! Aggregation of raw weekly records into per-weekday slot lists.

use std::collections::BTreeMap;

use crate::error::SlotbookResult;
use crate::remote::protocol::ScheduleRecord;
use crate::slot::{SlotId, TimeSlot};
use crate::time::ClockTime;
use crate::weekday::Weekday;

/// Slots per weekday. Every weekday is present, possibly with an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySlots(BTreeMap<Weekday, Vec<TimeSlot>>);

impl WeeklySlots {
    pub fn empty() -> Self {
        WeeklySlots(Weekday::ALL.into_iter().map(|d| (d, Vec::new())).collect())
    }

    /// Replace one day's slots. The list is sorted by start.
    pub fn with_day(mut self, day: Weekday, mut slots: Vec<TimeSlot>) -> Self {
        slots.sort_by_key(|s| (s.start, s.end));
        self.0.insert(day, slots);
        self
    }

    pub fn for_day(&self, day: Weekday) -> &[TimeSlot] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[TimeSlot])> {
        self.0.iter().map(|(day, slots)| (*day, slots.as_slice()))
    }

    pub fn total_slots(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Insert keeping the day sorted by start, dropping exact range duplicates.
    /// Returns false if the range was already present.
    fn insert(&mut self, day: Weekday, slot: TimeSlot) -> bool {
        let slots = self.0.entry(day).or_default();
        if slots.iter().any(|s| s.same_range(&slot)) {
            return false;
        }
        // Stable: a slot with an equal start lands after existing ones
        let pos = slots.partition_point(|s| (s.start, s.end) <= (slot.start, slot.end));
        slots.insert(pos, slot);
        true
    }
}

impl Default for WeeklySlots {
    fn default() -> Self {
        Self::empty()
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregatedSchedule {
    pub active: WeeklySlots,
    /// Inactive records, kept so disabled days can be restored on re-enable.
    pub inactive: WeeklySlots,
    /// Records that were dropped because their day or times did not parse.
    pub skipped: usize,
}

/// Normalize raw weekly records.
///
/// Records are split by `is_active`, times are truncated to HH:MM, each day is
/// sorted by start, and records with an identical `(start, end)` on the same
/// day collapse to the first one encountered. Unparseable records are
/// skipped and counted.
pub fn aggregate(records: &[ScheduleRecord]) -> AggregatedSchedule {
    let mut aggregated = AggregatedSchedule::default();

    for record in records {
        let Some((day, slot)) = normalize_record(record) else {
            aggregated.skipped += 1;
            continue;
        };

        let target = if record.is_active {
            &mut aggregated.active
        } else {
            &mut aggregated.inactive
        };

        if !target.insert(day, slot) {
            tracing::debug!(id = %record.id, day = %day, "dropping duplicate schedule record");
        }
    }

    aggregated
}

fn normalize_record(record: &ScheduleRecord) -> Option<(Weekday, TimeSlot)> {
    match parse_record(record) {
        Ok((day, start, end)) => Some((
            day,
            TimeSlot {
                id: SlotId::Persisted(record.id),
                start,
                end,
            },
        )),
        Err(e) => {
            tracing::warn!(id = %record.id, error = %e, "skipping unreadable schedule record");
            None
        }
    }
}

fn parse_record(record: &ScheduleRecord) -> SlotbookResult<(Weekday, ClockTime, ClockTime)> {
    let day = record.day_of_week.parse()?;
    let start = record.start_time.parse()?;
    let end = record.end_time.parse()?;
    Ok((day, start, end))
}
