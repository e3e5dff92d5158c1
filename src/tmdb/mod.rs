pub mod client;
pub mod image;
pub mod types;

pub use client::{MetadataApi, TmdbClient, TmdbError, TmdbResult};
pub use image::{ImageSize, ImageUrls};
pub use types::*;
