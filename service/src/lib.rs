//! Process-wide infrastructure shared by every other crate: configuration and logging.

pub mod config;
pub mod logging;
