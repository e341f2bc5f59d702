//! Storage implementations
//!
//! - [`InMemoryStore`]: volatile, every collection behind one lock
//! - [`JsonFileStore`]: write-through JSON snapshot on disk
//! - [`InMemoryTextSource`] / [`FsTextSource`]: raw document text

pub mod json_file;
pub mod memory;
pub mod snapshot;
pub mod source;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use snapshot::KnowledgeSnapshot;
pub use source::{FsTextSource, InMemoryTextSource, DEFAULT_MAX_SOURCE_BYTES};
