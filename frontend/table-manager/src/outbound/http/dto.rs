//! DTOs for the records REST API.
//!
//! Responses decode into these transport shapes first and map into domain
//! records in one pass. The backend serialises some columns loosely (shift
//! and miller as ids or names, balances as decimals or numeric strings), so
//! those fields accept either form.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CorrectionReply, CorrectionRequest, MovementLogRecord, MutationAck, SimpleRecord,
};

#[derive(Debug, Deserialize)]
pub(super) struct SimpleRecordDto {
    pub(super) id: i64,
    pub(super) name: TextOrNumber,
}

impl From<SimpleRecordDto> for SimpleRecord {
    fn from(dto: SimpleRecordDto) -> Self {
        Self::new(dto.id, dto.name.into_text())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MovementLogRecordDto {
    pub(super) log_id: i64,
    pub(super) date: TextOrNumber,
    pub(super) mill_name: TextOrNumber,
    pub(super) mill_id: i64,
    #[serde(default)]
    pub(super) shift: Option<TextOrNumber>,
    #[serde(default)]
    pub(super) miller: Option<TextOrNumber>,
    pub(super) name: TextOrNumber,
    pub(super) id_field: String,
    pub(super) id: i64,
    pub(super) opening_balance: Amount,
    pub(super) closing_balance: Amount,
    pub(super) movement: Amount,
}

impl MovementLogRecordDto {
    pub(super) fn into_domain(self) -> Result<MovementLogRecord, String> {
        let log_id = self.log_id;
        let amount = |field: &str, value: Amount| {
            value
                .into_f64()
                .ok_or_else(|| format!("log {log_id} has a non-numeric {field}"))
        };
        Ok(MovementLogRecord {
            log_id,
            date: self.date.into_text(),
            mill_name: self.mill_name.into_text(),
            mill_id: self.mill_id,
            shift: self.shift.map(TextOrNumber::into_text).unwrap_or_default(),
            miller: self.miller.map(TextOrNumber::into_text).unwrap_or_default(),
            name: self.name.into_text(),
            id_field: self.id_field,
            id: self.id,
            opening_balance: amount("opening_balance", self.opening_balance)?,
            closing_balance: amount("closing_balance", self.closing_balance)?,
            movement: amount("movement", self.movement)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NameBodyDto<'a> {
    pub(super) name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MessageDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl From<MessageDto> for MutationAck {
    fn from(dto: MessageDto) -> Self {
        Self {
            message: dto.message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl ErrorBodyDto {
    /// Server-provided failure text, preferring `error` over `message`.
    pub(super) fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CorrectionRequestDto<'a> {
    pub(super) log_id: i64,
    pub(super) table_name: &'static str,
    pub(super) id_field: &'a str,
    pub(super) id_value: i64,
    pub(super) mill_id: i64,
    pub(super) new_end_value: f64,
}

impl<'a> From<&'a CorrectionRequest> for CorrectionRequestDto<'a> {
    fn from(request: &'a CorrectionRequest) -> Self {
        Self {
            log_id: request.log_id,
            table_name: request.table_name.wire_name(),
            id_field: &request.id_field,
            id_value: request.id_value,
            mill_id: request.mill_id,
            new_end_value: request.new_end_value,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CorrectionReplyDto {
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

impl From<CorrectionReplyDto> for CorrectionReply {
    fn from(dto: CorrectionReplyDto) -> Self {
        Self {
            status: dto.status,
            message: dto.message.or(dto.error),
        }
    }
}
