//! Where the CLI reads schedule data from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use slotbook_core::remote::protocol::{AddExtraSlots, RemoveExtraSlots, SaveSchedule, ScheduleData};
use slotbook_core::{
    HttpScheduleClient, ScheduleClient, SlotbookConfig, SlotbookError, SlotbookResult,
};

/// Either the configured API or a JSON file holding the `data` part of a
/// schedule response.
pub enum Source {
    Http(HttpScheduleClient),
    File(PathBuf),
}

impl Source {
    pub fn new(file: Option<PathBuf>, config: &SlotbookConfig) -> SlotbookResult<Self> {
        match file {
            Some(path) => Ok(Source::File(path)),
            None => Ok(Source::Http(HttpScheduleClient::from_config(config)?)),
        }
    }
}

fn read_file(path: &Path, month: u32, year: i32) -> SlotbookResult<ScheduleData> {
    let contents = std::fs::read_to_string(path)?;
    let mut data: ScheduleData = serde_json::from_str(&contents)?;

    // The API only returns the requested month's extra slots
    let prefix = format!("{year:04}-{month:02}-");
    data.extra_slots.retain(|e| e.date.trim().starts_with(&prefix));
    Ok(data)
}

fn read_only(path: &Path) -> SlotbookError {
    SlotbookError::Rejected(format!("{} is read-only", path.display()))
}

#[async_trait]
impl ScheduleClient for Source {
    async fn fetch_schedule(&self, month: u32, year: i32) -> SlotbookResult<ScheduleData> {
        match self {
            Source::Http(client) => client.fetch_schedule(month, year).await,
            Source::File(path) => read_file(path, month, year),
        }
    }

    async fn save_schedule(&self, request: &SaveSchedule) -> SlotbookResult<()> {
        match self {
            Source::Http(client) => client.save_schedule(request).await,
            Source::File(path) => Err(read_only(path)),
        }
    }

    async fn add_extra_slots(&self, request: &AddExtraSlots) -> SlotbookResult<()> {
        match self {
            Source::Http(client) => client.add_extra_slots(request).await,
            Source::File(path) => Err(read_only(path)),
        }
    }

    async fn remove_extra_slots(&self, request: &RemoveExtraSlots) -> SlotbookResult<()> {
        match self {
            Source::Http(client) => client.remove_extra_slots(request).await,
            Source::File(path) => Err(read_only(path)),
        }
    }
}
