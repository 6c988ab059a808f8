//! Month grid projection.
//!
//! A month is always laid out as 6 rows of 7 Monday-first columns. Cells
//! before the 1st and after the last day are filled with disabled days from
//! the neighbouring months.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{SlotbookError, SlotbookResult};
use crate::extra::ExtraSlotIndex;
use crate::schedule::WeeklySlots;
use crate::slot::{ExtraSlot, TimeSlot};
use crate::weekday::Weekday;

pub const GRID_COLUMNS: usize = 7;
pub const GRID_CELLS: usize = 6 * GRID_COLUMNS;

/// A calendar month, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> SlotbookResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| YearMonth { year, month })
            .ok_or(SlotbookError::InvalidMonth { month, year })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> SlotbookResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(SlotbookError::InvalidMonth {
            month: self.month,
            year: self.year,
        })
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn days_in_month(&self) -> SlotbookResult<u32> {
        let first = self.first_day()?;
        let next_first = self.next().first_day()?;
        Ok((next_first - first).num_days() as u32)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One cell of the month grid. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    /// Day of month.
    pub date: u32,
    pub month: u32,
    pub year: i32,
    /// False for the padding days of the previous/next month.
    pub is_current_month: bool,
    pub is_past: bool,
    /// Recurring availability indicator: past, padding, or no active weekly slots.
    pub is_disabled: bool,
    pub has_content: bool,
    /// Independent of `is_disabled`: a day without weekly slots can still
    /// carry extra slots.
    pub has_extra_slots: bool,
    pub week_schedules: Vec<TimeSlot>,
    pub extra_slots_for_date: Vec<ExtraSlot>,
}

impl CalendarCell {
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.date)
    }

    /// Extra slots may be added or edited on any current-month day that is not
    /// in the past, whether or not the weekly schedule covers it.
    pub fn can_edit_extra_slots(&self) -> bool {
        self.is_current_month && !self.is_past
    }

    fn padding(date: NaiveDate, today: NaiveDate) -> Self {
        CalendarCell {
            date: date.day(),
            month: date.month(),
            year: date.year(),
            is_current_month: false,
            is_past: date < today,
            is_disabled: true,
            has_content: false,
            has_extra_slots: false,
            week_schedules: Vec::new(),
            extra_slots_for_date: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    /// Cells with recurring availability.
    pub fn enabled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_disabled).count()
    }
}

/// Project the weekly schedule and extra slots onto a month.
///
/// Always returns exactly [`GRID_CELLS`] cells. `today` decides which dates
/// are in the past, so the result is deterministic for a given `today`.
pub fn project_month(
    month: YearMonth,
    weekly: &WeeklySlots,
    extras: &ExtraSlotIndex,
    today: NaiveDate,
) -> SlotbookResult<MonthGrid> {
    let first = month.first_day()?;
    let days_in_month = month.days_in_month()?;
    let offset = Weekday::from(first.weekday()).column();

    let mut cells = Vec::with_capacity(GRID_CELLS);

    // Trailing days of the previous month
    for back in (1..=offset as u64).rev() {
        let date = first
            .checked_sub_days(chrono::Days::new(back))
            .ok_or(SlotbookError::InvalidMonth {
                month: month.month,
                year: month.year,
            })?;
        cells.push(CalendarCell::padding(date, today));
    }

    for day in 0..days_in_month {
        let date = first + chrono::Days::new(u64::from(day));
        let active = weekly.for_day(Weekday::from(date.weekday()));
        let extra = extras.for_date(date);

        let is_past = date < today;
        let is_disabled = is_past || active.is_empty();

        cells.push(CalendarCell {
            date: date.day(),
            month: date.month(),
            year: date.year(),
            is_current_month: true,
            is_past,
            is_disabled,
            has_content: !is_disabled,
            has_extra_slots: !extra.is_empty(),
            week_schedules: active.to_vec(),
            extra_slots_for_date: extra.to_vec(),
        });
    }

    // Leading days of the next month
    let next_first = month.next().first_day()?;
    let remaining = GRID_CELLS - cells.len();
    for ahead in 0..remaining {
        let date = next_first + chrono::Days::new(ahead as u64);
        cells.push(CalendarCell::padding(date, today));
    }

    Ok(MonthGrid { month, cells })
}
