//! Driven port for the backend records API.
//!
//! The domain owns the request and response shapes; adapters own transport,
//! serialisation and status mapping.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CorrectionReply, CorrectionRequest, EntityKind, MutationAck, RecordSet};

define_port_error! {
    /// Errors surfaced while calling the records API.
    pub enum RecordsApiError {
        /// Network transport failed before a response arrived.
        Transport {
            /// Transport diagnostic.
            message: String,
        } => "records api transport failed: {message}",
        /// The request exceeded the transport timeout.
        Timeout {
            /// Transport diagnostic.
            message: String,
        } => "records api timeout: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Decoder diagnostic.
            message: String,
        } => "records api response decode failed: {message}",
        /// The backend answered with a non-success status.
        Rejected {
            /// HTTP status code.
            status: u16,
            /// Server-provided message.
            message: String,
        } => "records api rejected request ({status}): {message}",
    }
}

/// Port for reading and mutating records of one kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// Fetch every record of `kind`.
    ///
    /// Simple kinds yield [`RecordSet::Simple`]; log kinds yield
    /// [`RecordSet::MovementLog`].
    async fn list(&self, kind: EntityKind) -> Result<RecordSet, RecordsApiError>;

    /// Create a simple record named `name`.
    async fn create(&self, kind: EntityKind, name: &str) -> Result<MutationAck, RecordsApiError>;

    /// Rename the simple record `id`.
    async fn rename(
        &self,
        kind: EntityKind,
        id: i64,
        name: &str,
    ) -> Result<MutationAck, RecordsApiError>;

    /// Delete the simple record `id`.
    async fn delete(&self, kind: EntityKind, id: i64) -> Result<MutationAck, RecordsApiError>;

    /// Submit a movement-log correction.
    async fn correct(
        &self,
        request: &CorrectionRequest,
    ) -> Result<CorrectionReply, RecordsApiError>;
}
