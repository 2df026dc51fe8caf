//! Call analysis domain logic: the language-model gateway, the analysis operation
//! and the CSV call log.
//!
//! The `entity` data types are re-exported here so that `web` only depends on `domain`.
pub use entity::{call_record, sentiment, Analysis, CallRecord, Sentiment};

pub mod analysis;
pub mod call_log;
pub mod error;
pub mod gateway;
