use serde::{Deserialize, Serialize};

use crate::schedule::AggregatedSchedule;
use crate::slot::DaySchedule;
use crate::weekday::Weekday;

/// All seven days of the recurring schedule, Monday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    days: [DaySchedule; 7],
}

impl WeekSchedule {
    /// Every day disabled and empty.
    pub fn new() -> Self {
        WeekSchedule {
            days: Weekday::ALL.map(DaySchedule::disabled),
        }
    }

    /// Seed from loaded records.
    ///
    /// A day with active slots is enabled with those slots. A day without
    /// any is disabled but keeps its inactive slots, so enabling it again
    /// brings them back.
    pub fn from_aggregate(aggregated: &AggregatedSchedule) -> Self {
        let days = Weekday::ALL.map(|day| {
            let active = aggregated.active.for_day(day);
            if active.is_empty() {
                DaySchedule {
                    weekday: day,
                    is_enabled: false,
                    time_slots: aggregated.inactive.for_day(day).to_vec(),
                }
            } else {
                DaySchedule {
                    weekday: day,
                    is_enabled: true,
                    time_slots: active.to_vec(),
                }
            }
        });
        WeekSchedule { days }
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[day.column()]
    }

    pub(crate) fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        &mut self.days[day.column()]
    }

    pub fn days(&self) -> impl Iterator<Item = &DaySchedule> {
        self.days.iter()
    }

    pub fn enabled_days(&self) -> impl Iterator<Item = &DaySchedule> {
        self.days.iter().filter(|d| d.is_enabled)
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::protocol::ScheduleRecord;
    use crate::schedule::aggregate;
    use crate::slot::PersistedId;

    fn record(id: u64, day: &str, start: &str, end: &str, active: bool) -> ScheduleRecord {
        ScheduleRecord {
            id: PersistedId(id),
            day_of_week: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_active: active,
        }
    }

    #[test]
    fn test_seeded_from_active_and_inactive_records() {
        let aggregated = aggregate(&[
            record(1, "monday", "09:00:00", "10:00:00", true),
            record(2, "tuesday", "11:00:00", "12:00:00", false),
        ]);
        let week = WeekSchedule::from_aggregate(&aggregated);

        assert!(week.day(Weekday::Monday).is_enabled);
        assert_eq!(week.day(Weekday::Monday).time_slots.len(), 1);

        let tuesday = week.day(Weekday::Tuesday);
        assert!(!tuesday.is_enabled);
        assert_eq!(tuesday.time_slots.len(), 1, "inactive slots kept for re-enable");

        assert_eq!(week.enabled_days().count(), 1);
        assert_eq!(week.days().count(), 7);
    }

    #[test]
    fn test_days_are_monday_first() {
        let week = WeekSchedule::new();
        let order: Vec<Weekday> = week.days().map(|d| d.weekday).collect();
        assert_eq!(order, Weekday::ALL.to_vec());
    }
}
