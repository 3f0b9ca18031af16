//! Output Generation
//!
//! Transcript, JSONL event log and end-of-run snapshot.

pub mod logger;
pub mod snapshot;
pub mod transcript;

pub use logger::EventLogger;
pub use snapshot::{read_snapshot, write_snapshot};
pub use transcript::{listing_header, section_header, Section, Transcript};
