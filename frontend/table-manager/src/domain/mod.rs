//! Domain model and the table manager component.
//!
//! Ports live under [`ports`]; adapters in `inbound` and `outbound` depend on
//! this module and never the other way round.

pub mod correction;
pub mod entity_kind;
pub mod error;
pub mod ports;
pub mod records;
pub mod table_manager;
pub mod table_view;

pub use self::correction::{
    CorrectionDialog, CorrectionDraft, CorrectionReply, CorrectionRequest, CorrectionSummary,
    parse_end_value,
};
pub use self::entity_kind::{EntityKind, EntityKindParseError};
pub use self::error::TableManagerError;
pub use self::records::{MovementLogKey, MovementLogRecord, MutationAck, RecordSet, SimpleRecord};
pub use self::table_manager::{DeleteOutcome, RefreshOutcome, TableManager};
pub use self::table_view::{
    DraftRow, LOG_COLUMNS, RowState, SIMPLE_COLUMNS, SimpleRow, TableRows, TableView,
};
