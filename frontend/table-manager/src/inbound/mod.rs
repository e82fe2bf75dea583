//! Inbound adapters: how users see and drive the table manager.
//!
//! - **html**: renders the table view, kind selector and correction dialog
//! - **terminal**: blocking alert/confirm prompts on a line-oriented console

pub mod html;
pub mod terminal;
