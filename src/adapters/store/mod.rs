//! Document store adapters.
//!
//! - `InMemoryDocumentStore` - Records writes, supports failure injection
//! - `FileDocumentStore` - One YAML file per user, survives relaunch

mod file;
mod in_memory;
mod progress_feed;

pub use file::FileDocumentStore;
pub use in_memory::{InMemoryDocumentStore, RecordedWrite};
pub use progress_feed::ProgressFeed;
