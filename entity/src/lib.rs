//! Plain data types exchanged between the `domain` and `web` layers.

pub mod analysis;
pub mod call_record;
pub mod sentiment;

pub use analysis::Analysis;
pub use call_record::CallRecord;
pub use sentiment::Sentiment;
