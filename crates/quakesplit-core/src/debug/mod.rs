//! Diagnostics for checking a layout against a running game
//!
//! - Resolving every field of the detected layout (`StatusInfo`)

mod status;

pub use status::{FieldStatus, StatusInfo};
