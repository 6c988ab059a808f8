use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use slotbook_core::validate::validate_extra_slots;

use super::open_session;
use crate::render::Render;

pub async fn run(file: Option<PathBuf>) -> Result<()> {
    let mut session = open_session(file)?;
    session.load_current_month().await?;

    let mut violations = session.editor()?.validate();
    if let Some(loaded) = session.loaded() {
        for date in loaded.extras.dates() {
            violations.extend(validate_extra_slots(
                date,
                loaded.extras.for_date(date),
                session.preferences(),
            ));
        }
    }

    if violations.is_empty() {
        println!("{}", "No problems found".green());
        return Ok(());
    }

    for violation in &violations {
        println!("   {}", violation.render());
    }
    anyhow::bail!("{} problem(s) would block saving", violations.len())
}
