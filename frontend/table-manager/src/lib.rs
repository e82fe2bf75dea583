//! Generic table editor for the inventory and production-log backend.
//!
//! The [`domain::TableManager`] lists, creates, renames and deletes simple
//! lookup records, and drives the correction workflow for movement-log rows.
//! It talks to the backend through the [`domain::ports::RecordsApi`] port and
//! to the user through [`domain::ports::UserPrompt`]. `outbound::http`
//! provides the REST adapter; `inbound` renders tables as HTML and prompts on
//! a terminal.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::TableManagerSettings;
pub use domain::{EntityKind, TableManager, TableManagerError};
