//! Reqwest-backed records API adapter.
//!
//! This adapter owns transport details only: endpoint construction, request
//! serialisation, timeout and HTTP error mapping, and JSON decoding into
//! domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::dto::{
    CorrectionReplyDto, CorrectionRequestDto, ErrorBodyDto, MessageDto, MovementLogRecordDto,
    NameBodyDto, SimpleRecordDto,
};
use crate::domain::ports::{RecordsApi, RecordsApiError};
use crate::domain::{CorrectionReply, CorrectionRequest, EntityKind, MutationAck, RecordSet};

const CORRECTION_SEGMENT: &str = "correct";

/// Errors raised while building an [`HttpRecordsApi`].
#[derive(Debug, Error)]
pub enum HttpRecordsApiBuildError {
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The base URL cannot carry path segments.
    #[error("base URL `{url}` cannot be used as an API root")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
    },
}

/// Records API adapter that talks JSON to `{base_url}/api/...`.
pub struct HttpRecordsApi {
    client: Client,
    base_url: Url,
}

impl HttpRecordsApi {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let api = HttpRecordsApi::new(Url::parse("http://127.0.0.1:5000")?, timeout)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot be extended with path segments.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, HttpRecordsApiBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(HttpRecordsApiBuildError::InvalidBaseUrl {
                url: base_url.into(),
            });
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, RecordsApiError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn list(&self, kind: EntityKind) -> Result<RecordSet, RecordsApiError> {
        let url = self.endpoint(&[kind.wire_name()]);
        debug!(%url, "listing records");
        let body = self.execute(self.client.get(url)).await?;
        parse_records(kind, &body)
    }

    async fn create(&self, kind: EntityKind, name: &str) -> Result<MutationAck, RecordsApiError> {
        let url = self.endpoint(&[kind.wire_name()]);
        debug!(%url, "creating record");
        let body = self
            .execute(self.client.post(url).json(&NameBodyDto { name }))
            .await?;
        parse_ack(&body)
    }

    async fn rename(
        &self,
        kind: EntityKind,
        id: i64,
        name: &str,
    ) -> Result<MutationAck, RecordsApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[kind.wire_name(), &id]);
        debug!(%url, "renaming record");
        let body = self
            .execute(self.client.put(url).json(&NameBodyDto { name }))
            .await?;
        parse_ack(&body)
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<MutationAck, RecordsApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[kind.wire_name(), &id]);
        debug!(%url, "deleting record");
        let body = self.execute(self.client.delete(url)).await?;
        parse_ack(&body)
    }

    async fn correct(
        &self,
        request: &CorrectionRequest,
    ) -> Result<CorrectionReply, RecordsApiError> {
        let url = self.endpoint(&[CORRECTION_SEGMENT]);
        debug!(%url, log_id = request.log_id, "submitting correction");
        let body = self
            .execute(
                self.client
                    .post(url)
                    .json(&CorrectionRequestDto::from(request)),
            )
            .await?;
        decode_or_default::<CorrectionReplyDto>(&body).map(CorrectionReply::from)
    }
}

fn parse_records(kind: EntityKind, body: &[u8]) -> Result<RecordSet, RecordsApiError> {
    if kind.is_log_kind() {
        let rows: Vec<MovementLogRecordDto> = decode(kind, body)?;
        rows.into_iter()
            .map(MovementLogRecordDto::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map(RecordSet::MovementLog)
            .map_err(RecordsApiError::decode)
    } else {
        let rows: Vec<SimpleRecordDto> = decode(kind, body)?;
        Ok(RecordSet::Simple(rows.into_iter().map(Into::into).collect()))
    }
}

fn decode<T: DeserializeOwned>(kind: EntityKind, body: &[u8]) -> Result<T, RecordsApiError> {
    serde_json::from_slice(body).map_err(|error| {
        RecordsApiError::decode(format!("invalid {kind} records payload: {error}"))
    })
}

fn parse_ack(body: &[u8]) -> Result<MutationAck, RecordsApiError> {
    decode_or_default::<MessageDto>(body).map(MutationAck::from)
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, RecordsApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|error| RecordsApiError::decode(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> RecordsApiError {
    if error.is_timeout() {
        RecordsApiError::timeout(error.to_string())
    } else {
        RecordsApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RecordsApiError {
    let server_message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message);
    if let Some(message) = server_message {
        return RecordsApiError::rejected(status.as_u16(), message);
    }

    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RecordsApiError::timeout(message)
        }
        _ => RecordsApiError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn api(base: &str) -> HttpRecordsApi {
        HttpRecordsApi::new(
            Url::parse(base).expect("valid base url"),
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://127.0.0.1:5000", "http://127.0.0.1:5000/api/Mill")]
    #[case::trailing_slash("http://127.0.0.1:5000/", "http://127.0.0.1:5000/api/Mill")]
    #[case::mounted("http://host/tools/", "http://host/tools/api/Mill")]
    fn builds_kind_endpoints_under_api(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(api(base).endpoint(&["Mill"]).as_str(), expected);
    }

    #[test]
    fn builds_record_and_correction_endpoints() {
        let api = api("http://127.0.0.1:5000");
        assert_eq!(
            api.endpoint(&["Water_Stage", "12"]).as_str(),
            "http://127.0.0.1:5000/api/Water_Stage/12"
        );
        assert_eq!(
            api.endpoint(&[CORRECTION_SEGMENT]).as_str(),
            "http://127.0.0.1:5000/api/correct"
        );
    }

    #[test]
    fn rejects_bases_that_cannot_hold_paths() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        let error = HttpRecordsApi::new(base, Duration::from_secs(1)).err();
        assert!(
            matches!(error, Some(HttpRecordsApiBuildError::InvalidBaseUrl { .. })),
            "non-hierarchical URLs should be refused",
        );
    }

    #[rstest]
    #[case::error_field(br#"{"error":"Failed to add record to Mill"}"#.as_slice(), "Failed to add record to Mill")]
    #[case::message_field(br#"{"message":"Name is required"}"#.as_slice(), "Name is required")]
    fn surfaces_server_messages_verbatim(#[case] body: &[u8], #[case] expected: &str) {
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(error, RecordsApiError::rejected(500_u16, expected));
    }

    #[rstest]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, "Transport")]
    fn maps_bodyless_statuses_to_infrastructure_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"<html>upstream unavailable</html>");
        match expected {
            "Timeout" => assert!(
                matches!(error, RecordsApiError::Timeout { .. }),
                "timeout statuses should map to Timeout",
            ),
            "Transport" => assert!(
                matches!(error, RecordsApiError::Transport { ref message } if message.contains("502")),
                "other statuses should map to Transport with the status code",
            ),
            _ => panic!("unsupported test expectation: {expected}"),
        }
    }

    #[test]
    fn parses_simple_records() {
        let body = br#"[{"id":1,"name":"North"},{"id":2,"name":"South"}]"#;
        let records = parse_records(EntityKind::Mill, body).expect("JSON should decode");
        assert_eq!(
            records,
            RecordSet::Simple(vec![
                crate::domain::SimpleRecord::new(1, "North"),
                crate::domain::SimpleRecord::new(2, "South"),
            ])
        );
    }

    #[test]
    fn parses_movement_log_records_with_loose_columns() {
        let body = br#"[{
            "log_id": 7,
            "date": "2024-01-01",
            "mill_name": "North",
            "mill_id": 1,
            "shift": 2,
            "miller": "Ada",
            "name": "Flour",
            "id_field": "product_id",
            "id": 3,
            "opening_balance": "100.00",
            "closing_balance": 80,
            "movement": -20.0
        }]"#;

        let records =
            parse_records(EntityKind::ProductMovementLog, body).expect("JSON should decode");
        let RecordSet::MovementLog(rows) = records else {
            panic!("log kinds should decode movement-log rows");
        };
        let row = rows.first().expect("one row");
        assert_eq!(row.shift, "2");
        assert_eq!(row.opening_balance, 100.0);
        assert_eq!(row.closing_balance, 80.0);
        assert_eq!(row.movement, -20.0);
    }

    #[test]
    fn non_numeric_balances_are_decode_errors() {
        let body = br#"[{
            "log_id": 7, "date": "2024-01-01", "mill_name": "North", "mill_id": 1,
            "name": "Flour", "id_field": "product_id", "id": 3,
            "opening_balance": "n/a", "closing_balance": 80, "movement": -20
        }]"#;
        let error = parse_records(EntityKind::ProductMovementLog, body).expect_err("bad balance");
        assert!(matches!(error, RecordsApiError::Decode { .. }));
    }

    #[test]
    fn error_objects_are_not_record_lists() {
        let error = parse_records(EntityKind::Mill, br#"{"error":"boom"}"#).expect_err("object");
        assert!(matches!(error, RecordsApiError::Decode { .. }));
    }

    #[rstest]
    #[case::empty(b"".as_slice(), None)]
    #[case::message(br#"{"message":"Record deleted successfully from Mill"}"#.as_slice(), Some("Record deleted successfully from Mill"))]
    fn acknowledgements_tolerate_empty_bodies(#[case] body: &[u8], #[case] expected: Option<&str>) {
        let ack = parse_ack(body).expect("ack decodes");
        assert_eq!(ack.message.as_deref(), expected);
    }

    #[test]
    fn correction_payload_uses_wire_names() {
        let request = CorrectionRequest {
            log_id: 7,
            table_name: EntityKind::ProductMovementLog,
            id_field: "product_id".to_owned(),
            id_value: 3,
            mill_id: 1,
            new_end_value: 75.0,
        };
        let payload =
            serde_json::to_value(CorrectionRequestDto::from(&request)).expect("serialises");
        assert_eq!(
            payload,
            serde_json::json!({
                "log_id": 7,
                "table_name": "Product_Movement_Log",
                "id_field": "product_id",
                "id_value": 3,
                "mill_id": 1,
                "new_end_value": 75.0,
            })
        );
    }
}
