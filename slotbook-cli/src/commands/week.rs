use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use super::open_session;
use crate::render::Render;

pub async fn run(file: Option<PathBuf>) -> Result<()> {
    let mut session = open_session(file)?;
    session.load_current_month().await?;

    let editor = session.editor()?;
    let prefs = editor.preferences();
    println!(
        "{}",
        format!(
            "Weekly schedule ({} min meetings, {} min buffer)",
            prefs.meeting_duration_minutes, prefs.buffer_time_minutes
        )
        .bold()
    );
    for day in editor.week().days() {
        println!("   {}", day.render());
    }

    let Some(loaded) = session.loaded() else {
        return Ok(());
    };

    println!();
    println!("{}", format!("Extra slots in {}", loaded.month).bold());

    let mut any = false;
    for date in loaded.extras.dates() {
        for slot in loaded.extras.for_date(date) {
            println!("   {}", slot.render());
            any = true;
        }
    }
    if !any {
        println!("   {}", "None".dimmed());
    }

    Ok(())
}
