//! CLI command implementations.

pub mod events;
pub mod init_settings;
pub mod layouts;
pub mod status;
pub mod tracking;
