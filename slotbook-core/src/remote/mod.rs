//! Persistence port for an agent's schedule.

pub mod http;
pub mod protocol;

use async_trait::async_trait;

use crate::error::SlotbookResult;
use crate::remote::protocol::{AddExtraSlots, RemoveExtraSlots, SaveSchedule, ScheduleData};

pub use http::HttpScheduleClient;

/// Request/response access to the persisted schedule.
///
/// Calls are not retried. Implementations must be safe to share between
/// sessions of different agents.
#[async_trait]
pub trait ScheduleClient: Send + Sync {
    /// Weekly records plus the extra slots of the given month.
    async fn fetch_schedule(&self, month: u32, year: i32) -> SlotbookResult<ScheduleData>;

    async fn save_schedule(&self, request: &SaveSchedule) -> SlotbookResult<()>;

    async fn add_extra_slots(&self, request: &AddExtraSlots) -> SlotbookResult<()>;

    async fn remove_extra_slots(&self, request: &RemoveExtraSlots) -> SlotbookResult<()>;
}
