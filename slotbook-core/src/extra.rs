//! Date-keyed index of one-off extra slots.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{SlotbookError, SlotbookResult};
use crate::remote::protocol::ExtraSlotRecord;
use crate::slot::{ExtraSlot, SlotId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraSlotIndex {
    by_date: BTreeMap<NaiveDate, Vec<ExtraSlot>>,
}

impl ExtraSlotIndex {
    pub fn new(slots: impl IntoIterator<Item = ExtraSlot>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<ExtraSlot>> = BTreeMap::new();
        for slot in slots {
            by_date.entry(slot.date).or_default().push(slot);
        }
        for bucket in by_date.values_mut() {
            bucket.sort_by_key(|s| (s.start_time, s.end_time));
        }
        ExtraSlotIndex { by_date }
    }

    /// Build from API records, skipping (and logging) any that don't parse.
    pub fn from_records(records: &[ExtraSlotRecord]) -> Self {
        let slots = records.iter().filter_map(|record| match parse_record(record) {
            Ok(slot) => Some(slot),
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "skipping unreadable extra slot");
                None
            }
        });
        Self::new(slots)
    }

    pub fn for_date(&self, date: NaiveDate) -> &[ExtraSlot] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_any(&self, date: NaiveDate) -> bool {
        !self.for_date(date).is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    /// Compact label for a calendar cell.
    ///
    /// One slot renders as `"09:00–10:00"`. Several slots render as the
    /// envelope from the earliest start to the latest end, not as a list.
    pub fn display_range(&self, date: NaiveDate) -> Option<String> {
        let slots = self.for_date(date);
        let earliest = slots.iter().map(|s| s.start_time).min()?;
        let latest = slots.iter().map(|s| s.end_time).max()?;
        Some(format!("{earliest}–{latest}"))
    }

    /// Replace one date's slots, e.g. after a successful save of that date.
    pub fn replace_date(&mut self, date: NaiveDate, mut slots: Vec<ExtraSlot>) {
        if slots.is_empty() {
            self.by_date.remove(&date);
            return;
        }
        slots.sort_by_key(|s| (s.start_time, s.end_time));
        self.by_date.insert(date, slots);
    }
}

fn parse_record(record: &ExtraSlotRecord) -> SlotbookResult<ExtraSlot> {
    let date = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
        .map_err(|_| SlotbookError::InvalidDate(record.date.clone()))?;

    Ok(ExtraSlot {
        id: SlotId::Persisted(record.id),
        date,
        start_time: record.start_time.parse()?,
        end_time: record.end_time.parse()?,
        reason: record.reason.clone().filter(|r| !r.trim().is_empty()),
    })
}
