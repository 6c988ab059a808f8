pub mod check;
pub mod month;
pub mod week;

use std::path::PathBuf;

use anyhow::Result;
use slotbook_core::{ScheduleSession, SlotbookConfig, SystemClock};

use crate::source::Source;

/// Load config and set up a session. Nothing is fetched yet.
pub fn open_session(file: Option<PathBuf>) -> Result<ScheduleSession<Source>> {
    let config = SlotbookConfig::load()?;
    tracing::debug!(file = ?file, api = ?config.api_base_url, "opening schedule session");
    let source = Source::new(file, &config)?;
    let clock = SystemClock {
        timezone: config.preferences.timezone,
    };

    Ok(ScheduleSession::new(source, clock, config.preferences))
}
