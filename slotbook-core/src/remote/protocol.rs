//! JSON shapes exchanged with the schedule API.
//!
//! Each request type implements [`ApiCommand`], which ties it to an endpoint
//! and to the type of the `data` field in the response envelope.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{SlotbookError, SlotbookResult};
use crate::slot::PersistedId;
use crate::time::ClockTime;
use crate::weekday::Weekday;

pub trait ApiCommand: Serialize {
    type Response: DeserializeOwned;
    fn endpoint() -> Endpoint;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    FetchSchedule,
    SaveSchedule,
    AddExtraSlots,
    RemoveExtraSlots,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::FetchSchedule | Endpoint::SaveSchedule => "schedule",
            Endpoint::AddExtraSlots => "extra-slots",
            Endpoint::RemoveExtraSlots => "extra-slots/remove",
        }
    }

    /// Only the fetch is a GET; its params travel in the query string.
    pub fn is_read(&self) -> bool {
        matches!(self, Endpoint::FetchSchedule)
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Every response is wrapped as `{ error, message?, data? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Server-reported failures (e.g. "cannot modify a slot in the past")
    /// become [`SlotbookError::Rejected`] with the message untouched.
    pub fn into_result(self) -> SlotbookResult<Option<T>> {
        if self.error {
            let message = self
                .message
                .unwrap_or_else(|| "Request rejected by server".to_string());
            return Err(SlotbookError::Rejected(message));
        }
        Ok(self.data)
    }
}

// ============================================================================
// Read model
// ============================================================================

/// Fetch the weekly schedule and the extra slots for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSchedule {
    pub month: u32,
    pub year: i32,
}

impl ApiCommand for FetchSchedule {
    type Response = ScheduleData;
    fn endpoint() -> Endpoint {
        Endpoint::FetchSchedule
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleData {
    #[serde(default)]
    pub time_schedules: Vec<ScheduleRecord>,
    #[serde(default)]
    pub extra_slots: Vec<ExtraSlotRecord>,
}

/// A persisted weekly record, exactly as the API sends it.
///
/// Day and times stay raw strings here; they are normalized by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: PersistedId,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(deserialize_with = "deserialize_flag", serialize_with = "serialize_flag")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraSlotRecord {
    pub id: PersistedId,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `is_active` arrives as `0|1`, occasionally as a boolean.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Number(n) => Ok(n == 1),
        RawFlag::Text(s) => Ok(s.trim() == "1" || s.trim().eq_ignore_ascii_case("true")),
    }
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

// ============================================================================
// Write model
// ============================================================================

/// Save the weekly schedule: a flat ordinal map plus ids to delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveSchedule {
    pub schedule: BTreeMap<usize, ScheduleEntry>,
    #[serde(rename = "deletedSlots")]
    pub deleted_slots: Vec<PersistedId>,
}

impl ApiCommand for SaveSchedule {
    type Response = IgnoredAny;
    fn endpoint() -> Endpoint {
        Endpoint::SaveSchedule
    }
}

/// One slot of the save payload. `id: None` is sent as `""`, meaning "create".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(serialize_with = "serialize_entry_id", deserialize_with = "deserialize_entry_id")]
    pub id: Option<PersistedId>,
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

fn serialize_entry_id<S: Serializer>(
    id: &Option<PersistedId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => id.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_entry_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PersistedId>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) if s.is_empty() => Ok(None),
        other => PersistedId::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Add one-off slots on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddExtraSlots {
    #[serde(rename = "extraTimeSlots")]
    pub extra_time_slots: Vec<NewExtraSlot>,
    pub date: NaiveDate,
}

impl ApiCommand for AddExtraSlots {
    type Response = IgnoredAny;
    fn endpoint() -> Endpoint {
        Endpoint::AddExtraSlots
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExtraSlot {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Remove one-off slots by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveExtraSlots {
    #[serde(rename = "removeExtraTimeSlotIds")]
    pub remove_extra_time_slot_ids: Vec<PersistedId>,
}

impl ApiCommand for RemoveExtraSlots {
    type Response = IgnoredAny;
    fn endpoint() -> Endpoint {
        Endpoint::RemoveExtraSlots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_response_shape() {
        let body = json!({
            "error": false,
            "data": {
                "time_schedules": [
                    { "id": 7, "day_of_week": "monday", "start_time": "09:00:00", "end_time": "10:00:00", "is_active": 1 },
                    { "id": "8", "day_of_week": "Tuesday", "start_time": "11:00:00", "end_time": "12:00:00", "is_active": 0 }
                ],
                "extra_slots": [
                    { "id": 3, "date": "2025-03-20", "start_time": "14:00", "end_time": "15:00", "reason": "Open house" }
                ]
            }
        });

        let response: ApiResponse<ScheduleData> = serde_json::from_value(body).unwrap();
        let data = response.into_result().unwrap().unwrap();

        assert_eq!(data.time_schedules.len(), 2);
        assert!(data.time_schedules[0].is_active);
        assert!(!data.time_schedules[1].is_active);
        assert_eq!(data.time_schedules[1].id, PersistedId(8));
        assert_eq!(data.extra_slots[0].reason.as_deref(), Some("Open house"));
    }

    #[test]
    fn test_error_envelope_keeps_message() {
        let body = json!({ "error": true, "message": "cannot modify a slot in the past" });
        let response: ApiResponse<IgnoredAny> = serde_json::from_value(body).unwrap();

        match response.into_result() {
            Err(SlotbookError::Rejected(msg)) => {
                assert_eq!(msg, "cannot modify a slot in the past")
            }
            other => panic!("expected rejection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_save_payload_shape() {
        let mut schedule = BTreeMap::new();
        schedule.insert(
            0,
            ScheduleEntry {
                id: Some(PersistedId(5)),
                day: Weekday::Monday,
                start_time: "09:00".parse().unwrap(),
                end_time: "10:00".parse().unwrap(),
            },
        );
        schedule.insert(
            1,
            ScheduleEntry {
                id: None,
                day: Weekday::Tuesday,
                start_time: "09:00".parse().unwrap(),
                end_time: "09:30".parse().unwrap(),
            },
        );
        let request = SaveSchedule {
            schedule,
            deleted_slots: vec![PersistedId(2)],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "schedule": {
                    "0": { "id": 5, "day": "monday", "start_time": "09:00", "end_time": "10:00" },
                    "1": { "id": "", "day": "tuesday", "start_time": "09:00", "end_time": "09:30" }
                },
                "deletedSlots": [2]
            })
        );

        let back: SaveSchedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_extra_slot_requests_use_api_field_names() {
        let add = AddExtraSlots {
            extra_time_slots: vec![NewExtraSlot {
                start_time: "14:00".parse().unwrap(),
                end_time: "15:00".parse().unwrap(),
                reason: None,
            }],
            date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        };
        let remove = RemoveExtraSlots {
            remove_extra_time_slot_ids: vec![PersistedId(3)],
        };

        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({ "extraTimeSlots": [{ "start_time": "14:00", "end_time": "15:00" }], "date": "2025-03-20" })
        );
        assert_eq!(
            serde_json::to_value(&remove).unwrap(),
            json!({ "removeExtraTimeSlotIds": [3] })
        );
    }
}
