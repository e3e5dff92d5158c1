use std::fmt;

use crate::config::TmdbConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    W200,
    W500,
    W780,
    W1280,
    Original,
}

impl ImageSize {
    pub const POSTER: ImageSize = ImageSize::W500;
    pub const BACKDROP: ImageSize = ImageSize::W1280;

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds absolute image URLs from the provider-relative paths found in
/// catalog entries.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
    poster_placeholder: String,
    backdrop_placeholder: String,
}

impl ImageUrls {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            base: config.imagebase.trim_end_matches('/').to_string(),
            poster_placeholder: config.poster_placeholder.clone(),
            backdrop_placeholder: config.backdrop_placeholder.clone(),
        }
    }

    pub fn poster_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.build(path, size, &self.poster_placeholder)
    }

    pub fn backdrop_url(&self, path: Option<&str>, size: ImageSize) -> String {
        self.build(path, size, &self.backdrop_placeholder)
    }

    fn build(&self, path: Option<&str>, size: ImageSize, placeholder: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) if p.starts_with('/') => format!("{}/{}{}", self.base, size, p),
            Some(p) => format!("{}/{}/{}", self.base, size, p),
            None => placeholder.to_string(),
        }
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new(&TmdbConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.poster_url(Some("/abc.jpg"), ImageSize::POSTER),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            urls.poster_url(Some("abc.jpg"), ImageSize::W200),
            "https://image.tmdb.org/t/p/w200/abc.jpg"
        );
        assert!(urls.poster_url(None, ImageSize::POSTER).contains("No+Poster"));
        assert!(urls.poster_url(Some(""), ImageSize::POSTER).contains("No+Poster"));
    }

    #[test]
    fn test_backdrop_url() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.backdrop_url(Some("/bg.jpg"), ImageSize::Original),
            "https://image.tmdb.org/t/p/original/bg.jpg"
        );
        assert!(urls.backdrop_url(None, ImageSize::BACKDROP).contains("No+Image"));
    }
}
