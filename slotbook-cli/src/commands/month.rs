use std::path::PathBuf;

use anyhow::Result;
use chrono::Datelike;
use owo_colors::OwoColorize;
use slotbook_core::YearMonth;

use super::open_session;
use crate::render::Render;

pub async fn run(month: Option<u32>, year: Option<i32>, file: Option<PathBuf>) -> Result<()> {
    let mut session = open_session(file)?;
    let today = session.today();
    let target = YearMonth::new(
        year.unwrap_or(today.year()),
        month.unwrap_or(today.month()),
    )?;

    session.load_month(target).await?;
    println!("{}", session.month_grid()?.render());

    let Some(loaded) = session.loaded() else {
        return Ok(());
    };

    let dates: Vec<_> = loaded.extras.dates().collect();
    if !dates.is_empty() {
        println!();
        println!("{}", "Extra slots:".dimmed());
        for date in dates {
            if let Some(range) = loaded.extras.display_range(date) {
                println!("   {} {}", date.format("%a %d").to_string().yellow(), range);
            }
        }
    }

    Ok(())
}
