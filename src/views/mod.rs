pub mod discovery;
pub mod playback;
pub mod search;

#[cfg(test)]
pub(crate) mod fake;

pub use discovery::{DiscoveryView, Tab};
pub use playback::{PlaybackMedia, PlaybackView};
pub use search::{DebouncedSearch, SearchOutcome};
