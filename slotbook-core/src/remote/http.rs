//! HTTP implementation of [`ScheduleClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::SlotbookConfig;
use crate::error::{SlotbookError, SlotbookResult};
use crate::remote::ScheduleClient;
use crate::remote::protocol::{
    AddExtraSlots, ApiCommand, ApiResponse, FetchSchedule, RemoveExtraSlots, SaveSchedule,
    ScheduleData,
};

#[derive(Clone, Debug)]
pub struct HttpScheduleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpScheduleClient {
    pub fn new(base_url: &str, timeout: Duration) -> SlotbookResult<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| SlotbookError::Config(format!("Invalid api_base_url '{base_url}': {e}")))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpScheduleClient { http, base_url })
    }

    pub fn from_config(config: &SlotbookConfig) -> SlotbookResult<Self> {
        let base_url = config.api_base_url.as_deref().ok_or_else(|| {
            SlotbookError::Config("api_base_url is not set in the slotbook config".into())
        })?;
        Self::new(base_url, Duration::from_secs(config.request_timeout_secs))
    }

    fn url_for(&self, path: &str) -> SlotbookResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SlotbookError::Config(e.to_string()))
    }

    /// Send a typed command and unwrap the response envelope.
    async fn call<C: ApiCommand>(&self, cmd: &C) -> SlotbookResult<Option<C::Response>> {
        let endpoint = C::endpoint();
        let url = self.url_for(endpoint.path())?;

        let request = if endpoint.is_read() {
            self.http.get(url).query(cmd)
        } else {
            self.http.post(url).json(cmd)
        };

        tracing::debug!(endpoint = endpoint.path(), "sending schedule request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_envelope(endpoint.path(), status, &body)
    }
}

/// Turn a raw response into the envelope's data.
///
/// Business-rule failures come back as an error envelope, sometimes with a
/// non-2xx status. The envelope's message wins whenever the body parses.
fn decode_envelope<T: DeserializeOwned>(
    path: &str,
    status: StatusCode,
    body: &str,
) -> SlotbookResult<Option<T>> {
    match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(_) if !status.is_success() => Err(SlotbookError::Transport(format!(
            "{path} returned {status}"
        ))),
        Err(e) => Err(SlotbookError::Serialization(format!(
            "Failed to parse {path} response: {e}"
        ))),
    }
}

#[async_trait]
impl ScheduleClient for HttpScheduleClient {
    async fn fetch_schedule(&self, month: u32, year: i32) -> SlotbookResult<ScheduleData> {
        self.call(&FetchSchedule { month, year })
            .await?
            .ok_or_else(|| SlotbookError::Serialization("Schedule response has no data".into()))
    }

    async fn save_schedule(&self, request: &SaveSchedule) -> SlotbookResult<()> {
        self.call(request).await.map(|_| ())
    }

    async fn add_extra_slots(&self, request: &AddExtraSlots) -> SlotbookResult<()> {
        self.call(request).await.map(|_| ())
    }

    async fn remove_extra_slots(&self, request: &RemoveExtraSlots) -> SlotbookResult<()> {
        self.call(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_under_base_path() {
        let client =
            HttpScheduleClient::new("https://api.example.com/agent/12", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            client.url_for("schedule").unwrap().as_str(),
            "https://api.example.com/agent/12/schedule"
        );
        assert_eq!(
            client.url_for("extra-slots/remove").unwrap().as_str(),
            "https://api.example.com/agent/12/extra-slots/remove"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpScheduleClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SlotbookError::Config(_)));
    }

    #[test]
    fn test_error_envelope_wins_over_status() {
        let body = r#"{"error": true, "message": "Cannot modify a slot in the past"}"#;
        let err =
            decode_envelope::<ScheduleData>("schedule", StatusCode::UNPROCESSABLE_ENTITY, body)
                .unwrap_err();
        match err {
            SlotbookError::Rejected(message) => {
                assert_eq!(message, "Cannot modify a slot in the past")
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_with_failure_status_is_transport_error() {
        let err = decode_envelope::<ScheduleData>(
            "schedule",
            StatusCode::BAD_GATEWAY,
            "<html>Bad Gateway</html>",
        )
        .unwrap_err();
        match err {
            SlotbookError::Transport(message) => {
                assert_eq!(message, "schedule returned 502 Bad Gateway")
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_with_success_status_is_serialization_error() {
        let err = decode_envelope::<ScheduleData>("extra-slots", StatusCode::OK, "not json")
            .unwrap_err();
        assert!(matches!(err, SlotbookError::Serialization(_)));
    }

    #[test]
    fn test_ok_envelope_returns_data() {
        let body = r#"{"error": false, "data": {"time_schedules": [], "extra_slots": []}}"#;
        let data = decode_envelope::<ScheduleData>("schedule", StatusCode::OK, body)
            .unwrap()
            .unwrap();
        assert_eq!(data, ScheduleData::default());

        let body = r#"{"error": false}"#;
        let empty = decode_envelope::<ScheduleData>("schedule", StatusCode::OK, body).unwrap();
        assert_eq!(empty, None);
    }
}
