// In crates/engine/src/lib.rs

pub mod error;
pub mod files;
pub mod history;
pub mod normalize;
pub mod orchestrator;
pub mod session;

pub use error::{Error, Result};
pub use files::{group_files, refresh_files_once, spawn_file_refresh};
pub use history::{HistoryCard, HistoryQuery, HistorySort};
pub use orchestrator::{LoadOutcome, Orchestrator, PollPolicy};
pub use session::{RenderReport, Session};

/// Capacity of the UI event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
