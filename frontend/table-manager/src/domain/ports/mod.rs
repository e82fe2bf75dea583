//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod records_api;
mod user_prompt;

#[cfg(test)]
pub use records_api::MockRecordsApi;
pub use records_api::{RecordsApi, RecordsApiError};
#[cfg(test)]
pub use user_prompt::MockUserPrompt;
pub use user_prompt::UserPrompt;
