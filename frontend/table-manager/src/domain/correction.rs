//! Correction workflow for movement-log rows.
//!
//! A correction resubmits a new closing value for one logged entry. The client
//! stages the identifying fields in a [`CorrectionDraft`] while the dialog is
//! open and sends them, together with the parsed value, as one
//! [`CorrectionRequest`].

use super::{EntityKind, MovementLogKey, MovementLogRecord};

/// Identifying fields staged while the correction dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionDraft {
    /// Parent mill log entry.
    pub log_id: i64,
    /// Log kind the row belongs to.
    pub table_name: EntityKind,
    /// Column identifying the tracked entity.
    pub id_field: String,
    /// Identifier of the tracked entity.
    pub id_value: i64,
    /// Mill the entry was logged for.
    pub mill_id: i64,
}

impl CorrectionDraft {
    /// Stage a correction for `record`, rendered under `kind`.
    #[must_use]
    pub fn from_record(kind: EntityKind, record: &MovementLogRecord) -> Self {
        Self {
            log_id: record.log_id,
            table_name: kind,
            id_field: record.id_field.clone(),
            id_value: record.id,
            mill_id: record.mill_id,
        }
    }

    /// Key of the row this draft amends.
    #[must_use]
    pub const fn key(&self) -> MovementLogKey {
        MovementLogKey {
            log_id: self.log_id,
            entity_id: self.id_value,
        }
    }

    /// Merge the new ending value into a request.
    #[must_use]
    pub fn into_request(self, new_end_value: f64) -> CorrectionRequest {
        CorrectionRequest {
            log_id: self.log_id,
            table_name: self.table_name,
            id_field: self.id_field,
            id_value: self.id_value,
            mill_id: self.mill_id,
            new_end_value,
        }
    }
}

/// Payload sent to the backend's correction endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionRequest {
    /// Parent mill log entry.
    pub log_id: i64,
    /// Log kind the row belongs to.
    pub table_name: EntityKind,
    /// Column identifying the tracked entity.
    pub id_field: String,
    /// Identifier of the tracked entity.
    pub id_value: i64,
    /// Mill the entry was logged for.
    pub mill_id: i64,
    /// Replacement closing value.
    pub new_end_value: f64,
}

/// Read-only values shown in the correction dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionSummary {
    /// Log date.
    pub date: String,
    /// Mill display name.
    pub mill_name: String,
    /// Tracked entity name.
    pub name: String,
    /// Opening balance of the entry.
    pub opening_balance: f64,
    /// Closing balance currently recorded.
    pub closing_balance: f64,
    /// Movement currently recorded.
    pub movement: f64,
}

impl From<&MovementLogRecord> for CorrectionSummary {
    fn from(record: &MovementLogRecord) -> Self {
        Self {
            date: record.date.clone(),
            mill_name: record.mill_name.clone(),
            name: record.name.clone(),
            opening_balance: record.opening_balance,
            closing_balance: record.closing_balance,
            movement: record.movement,
        }
    }
}

/// The open correction dialog: staged draft plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionDialog {
    /// Staged identifying fields.
    pub draft: CorrectionDraft,
    /// Values shown read-only to the user.
    pub summary: CorrectionSummary,
}

impl CorrectionDialog {
    /// Open a dialog for `record` rendered under `kind`.
    #[must_use]
    pub fn open(kind: EntityKind, record: &MovementLogRecord) -> Self {
        Self {
            draft: CorrectionDraft::from_record(kind, record),
            summary: CorrectionSummary::from(record),
        }
    }
}

/// Raw reply from the correction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorrectionReply {
    /// Status reported by the backend; `"success"` marks an applied correction.
    pub status: Option<String>,
    /// Optional human-readable message.
    pub message: Option<String>,
}

impl CorrectionReply {
    /// Whether the backend applied the correction.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Parse the user's new ending value.
///
/// Returns `None` for blank input and for anything that is not a finite
/// number.
///
/// # Examples
/// ```
/// use table_manager::domain::parse_end_value;
///
/// assert_eq!(parse_end_value(" 75 "), Some(75.0));
/// assert_eq!(parse_end_value(""), None);
/// ```
#[must_use]
pub fn parse_end_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
