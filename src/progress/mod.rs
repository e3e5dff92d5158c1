pub mod backend;
pub mod model;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use model::*;
pub use store::{ProgressStore, DEFAULT_MAX_HISTORY, PROGRESS_KEY};
