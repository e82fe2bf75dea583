//! Record shapes returned by the backend.

/// A plain named entity with a full create/rename/delete lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRecord {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl SimpleRecord {
    /// Build a record from its parts.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One daily balance entry computed upstream by the logging workflow.
///
/// Balances and movement are never edited on the client; a correction
/// resubmits a new closing value and the backend recomputes the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementLogRecord {
    /// Identifier of the parent mill log entry.
    pub log_id: i64,
    /// Log date as reported by the backend.
    pub date: String,
    /// Mill display name.
    pub mill_name: String,
    /// Mill identifier.
    pub mill_id: i64,
    /// Shift the entry was logged under.
    pub shift: String,
    /// Miller on duty.
    pub miller: String,
    /// Name of the product, transfer or stage the entry tracks.
    pub name: String,
    /// Column identifying the tracked entity, e.g. `Product_ID`.
    pub id_field: String,
    /// Identifier of the tracked entity.
    pub id: i64,
    /// Balance carried over from the previous entry.
    pub opening_balance: f64,
    /// Balance recorded at the end of this entry.
    pub closing_balance: f64,
    /// Difference between closing and opening balance.
    pub movement: f64,
}

impl MovementLogRecord {
    /// Key identifying this row within a rendered log table.
    #[must_use]
    pub const fn key(&self) -> MovementLogKey {
        MovementLogKey {
            log_id: self.log_id,
            entity_id: self.id,
        }
    }
}

/// Identity of a movement-log row.
///
/// One mill log entry fans out into one row per tracked entity, so the log
/// id alone is not unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovementLogKey {
    /// Parent mill log entry.
    pub log_id: i64,
    /// Tracked entity within that entry.
    pub entity_id: i64,
}

/// Full record set fetched for one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    /// Rows of a simple kind.
    Simple(Vec<SimpleRecord>),
    /// Rows of a movement-log kind.
    MovementLog(Vec<MovementLogRecord>),
}

impl RecordSet {
    /// Whether the set holds movement-log rows.
    #[must_use]
    pub const fn is_movement_log(&self) -> bool {
        matches!(self, Self::MovementLog(_))
    }

    /// Number of rows in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Simple(records) => records.len(),
            Self::MovementLog(records) => records.len(),
        }
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Acknowledgement returned by create, rename and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutationAck {
    /// Optional human-readable message from the backend.
    pub message: Option<String>,
}
