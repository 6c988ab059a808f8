//! Terminal rendering for slotbook-core types.
//!
//! Extension traits that add colored output using owo_colors.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use slotbook_core::{CalendarCell, DaySchedule, ExtraSlot, MonthGrid, Violation, Weekday};

pub trait Render {
    fn render(&self) -> String;
}

/// Width of one grid column, including the separating space.
const CELL_WIDTH: usize = 5;

impl Render for CalendarCell {
    fn render(&self) -> String {
        let date = format!("{:>3}", self.date);
        let date = if !self.is_current_month {
            date.dimmed().to_string()
        } else if self.is_disabled {
            date
        } else {
            date.green().bold().to_string()
        };

        let marker = if self.has_extra_slots {
            "*".yellow().to_string()
        } else {
            " ".to_string()
        };

        format!("{date}{marker} ")
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let title = NaiveDate::from_ymd_opt(self.month.year, self.month.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.month.to_string());

        let width = CELL_WIDTH * Weekday::ALL.len();
        let mut lines = vec![format!("{:^width$}", title).bold().to_string()];

        let header: String = Weekday::ALL
            .iter()
            .map(|d| format!("{:>3}  ", &d.label()[..3]))
            .collect();
        lines.push(header.dimmed().to_string());

        for row in self.rows() {
            let line: String = row.iter().map(Render::render).collect();
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl Render for DaySchedule {
    fn render(&self) -> String {
        let name = format!("{:<10}", self.weekday.label());
        if !self.is_enabled {
            return format!("{} {}", name.dimmed(), "off".dimmed());
        }
        if self.time_slots.is_empty() {
            return format!("{} {}", name, "no slots".red());
        }

        let mut slots: Vec<_> = self.time_slots.iter().collect();
        slots.sort_by_key(|s| (s.start, s.end));
        let slots: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
        format!("{} {}", name.bold(), slots.join(", "))
    }
}

impl Render for ExtraSlot {
    fn render(&self) -> String {
        let date = self.date.format("%a %Y-%m-%d").to_string();
        let range = format!("{}-{}", self.start_time, self.end_time);
        match &self.reason {
            Some(reason) => format!("{} {} {}", date.yellow(), range, reason.dimmed()),
            None => format!("{} {}", date.yellow(), range),
        }
    }
}

impl Render for Violation {
    fn render(&self) -> String {
        format!("{} {}", self.kind.code().red(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_core::{ExtraSlotIndex, TimeSlot, WeeklySlots, YearMonth, project_month};

    fn grid() -> MonthGrid {
        let weekly = WeeklySlots::empty().with_day(
            Weekday::Monday,
            vec![TimeSlot::persisted(1, "09:00".parse().unwrap(), "10:00".parse().unwrap())],
        );
        project_month(
            YearMonth::new(2025, 3).unwrap(),
            &weekly,
            &ExtraSlotIndex::default(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_month_grid_has_title_header_and_six_rows() {
        let rendered = grid().render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("March 2025"));
        assert!(lines[1].contains("Mon") && lines[1].contains("Sun"));
    }

    #[test]
    fn test_disabled_day_renders_off() {
        let day = DaySchedule::disabled(Weekday::Sunday);
        let rendered = day.render();
        assert!(rendered.contains("Sunday"));
        assert!(rendered.contains("off"));
    }

    #[test]
    fn test_enabled_day_lists_sorted_slots() {
        let day = DaySchedule {
            weekday: Weekday::Monday,
            is_enabled: true,
            time_slots: vec![
                TimeSlot::persisted(2, "13:00".parse().unwrap(), "14:00".parse().unwrap()),
                TimeSlot::persisted(1, "09:00".parse().unwrap(), "10:00".parse().unwrap()),
            ],
        };
        assert!(day.render().contains("09:00-10:00, 13:00-14:00"));
    }
}
