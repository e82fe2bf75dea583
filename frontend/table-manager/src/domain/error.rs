//! Failure taxonomy for table manager operations.
//!
//! No variant is fatal: the table stays usable after any of them and every
//! retry is a new user-initiated attempt.

use thiserror::Error;

use super::EntityKind;
use super::ports::RecordsApiError;

/// Errors returned by [`TableManager`](super::TableManager) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableManagerError {
    /// Client-side precondition failed; no request was sent.
    #[error("{message}")]
    Precondition {
        /// Text shown to the user.
        message: String,
    },
    /// The backend could not be reached or replied with an unreadable body.
    #[error("transport failure: {message}")]
    Transport {
        /// Diagnostic detail for logs.
        message: String,
    },
    /// The backend refused the operation.
    #[error("{message}")]
    Application {
        /// Server-provided message, surfaced verbatim.
        message: String,
    },
    /// Log kinds are produced upstream and cannot be created here.
    #[error("records of kind {kind} cannot be created directly")]
    AddNotSupported {
        /// Kind that was current.
        kind: EntityKind,
    },
    /// Save or cancel was requested with no unsaved row open.
    #[error("no unsaved row is open")]
    NoDraftRow,
    /// The id does not match any row rendered for the current kind.
    #[error("no {kind} record with id {id} is rendered")]
    UnknownRecord {
        /// Kind that was current.
        kind: EntityKind,
        /// Requested identifier.
        id: i64,
    },
    /// Corrections only apply to movement-log kinds.
    #[error("{kind} is not a movement-log kind")]
    NotALogKind {
        /// Kind that was current.
        kind: EntityKind,
    },
    /// Submit was requested with no correction dialog open.
    #[error("no correction is open")]
    NoCorrectionOpen,
}

impl TableManagerError {
    /// Helper for precondition failures.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Helper for application-level failures.
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<RecordsApiError> for TableManagerError {
    fn from(error: RecordsApiError) -> Self {
        match error {
            RecordsApiError::Rejected { message, .. } => Self::Application { message },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}
