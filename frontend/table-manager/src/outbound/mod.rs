//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed client for the records REST API
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no table-editing logic.

pub mod http;
