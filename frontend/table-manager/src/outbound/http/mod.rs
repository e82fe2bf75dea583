//! HTTP outbound adapter.
//!
//! This module provides a thin reqwest implementation of the `RecordsApi`
//! port.

mod dto;
mod http_records_api;

pub use http_records_api::{HttpRecordsApi, HttpRecordsApiBuildError};
