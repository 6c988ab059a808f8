use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use slotbook_core::remote::protocol::{
    AddExtraSlots, ExtraSlotRecord, RemoveExtraSlots, SaveSchedule, ScheduleData, ScheduleRecord,
};
use slotbook_core::{PersistedId, ScheduleClient, SlotbookError, SlotbookResult};

#[derive(Default)]
pub struct MockState {
    pub records: Vec<ScheduleRecord>,
    pub extras: Vec<ExtraSlotRecord>,
    pub next_id: u64,
    pub fetches: Vec<(u32, i32)>,
    pub saves: Vec<SaveSchedule>,
    pub adds: Vec<AddExtraSlots>,
    pub removes: Vec<RemoveExtraSlots>,
    pub fail_fetch: bool,
    pub fail_save: Option<String>,
    pub fail_add: Option<String>,
}

/// In-memory schedule API that applies saves the way the server does.
#[derive(Default, Clone)]
pub struct MockScheduleClient {
    pub state: Arc<Mutex<MockState>>,
}

impl MockScheduleClient {
    pub fn new(records: Vec<ScheduleRecord>, extras: Vec<ExtraSlotRecord>) -> Self {
        let client = Self::default();
        {
            let mut state = client.state.lock().unwrap();
            state.records = records;
            state.extras = extras;
            state.next_id = 1000;
        }
        client
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

pub fn record(id: u64, day: &str, start: &str, end: &str, active: bool) -> ScheduleRecord {
    ScheduleRecord {
        id: PersistedId(id),
        day_of_week: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_active: active,
    }
}

pub fn extra(id: u64, date: &str, start: &str, end: &str) -> ExtraSlotRecord {
    ExtraSlotRecord {
        id: PersistedId(id),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        reason: None,
    }
}

#[async_trait]
impl ScheduleClient for MockScheduleClient {
    async fn fetch_schedule(&self, month: u32, year: i32) -> SlotbookResult<ScheduleData> {
        let mut state = self.state.lock().unwrap();
        state.fetches.push((month, year));
        if state.fail_fetch {
            return Err(SlotbookError::Transport("connection reset".into()));
        }

        let prefix = format!("{year:04}-{month:02}-");
        Ok(ScheduleData {
            time_schedules: state.records.clone(),
            extra_slots: state
                .extras
                .iter()
                .filter(|e| e.date.starts_with(&prefix))
                .cloned()
                .collect(),
        })
    }

    async fn save_schedule(&self, request: &SaveSchedule) -> SlotbookResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_save.clone() {
            return Err(SlotbookError::Rejected(message));
        }
        state.saves.push(request.clone());

        state
            .records
            .retain(|r| !request.deleted_slots.contains(&r.id));

        for entry in request.schedule.values() {
            let start = format!("{}:00", entry.start_time);
            let end = format!("{}:00", entry.end_time);
            match entry.id {
                Some(id) => {
                    if let Some(existing) = state.records.iter_mut().find(|r| r.id == id) {
                        existing.start_time = start;
                        existing.end_time = end;
                        existing.is_active = true;
                    }
                }
                None => {
                    state.next_id += 1;
                    let id = state.next_id;
                    state
                        .records
                        .push(record(id, entry.day.as_str(), &start, &end, true));
                }
            }
        }
        Ok(())
    }

    async fn add_extra_slots(&self, request: &AddExtraSlots) -> SlotbookResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_add.clone() {
            return Err(SlotbookError::Rejected(message));
        }
        state.adds.push(request.clone());

        let date = request.date.format("%Y-%m-%d").to_string();
        for slot in &request.extra_time_slots {
            state.next_id += 1;
            let id = state.next_id;
            let mut added = extra(
                id,
                &date,
                &slot.start_time.to_string(),
                &slot.end_time.to_string(),
            );
            added.reason = slot.reason.clone();
            state.extras.push(added);
        }
        Ok(())
    }

    async fn remove_extra_slots(&self, request: &RemoveExtraSlots) -> SlotbookResult<()> {
        let mut state = self.state.lock().unwrap();
        state.removes.push(request.clone());
        state
            .extras
            .retain(|e| !request.remove_extra_time_slot_ids.contains(&e.id));
        Ok(())
    }
}
