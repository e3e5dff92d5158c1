use std::fmt;

use crate::tmdb::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Discovery,
    Watch { media_type: MediaType, id: u64 },
}

impl Route {
    pub fn watch(media_type: MediaType, id: u64) -> Self {
        Route::Watch { media_type, id }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Discovery),
            ["watch", kind, id] => {
                let media_type = match *kind {
                    "movie" => MediaType::Movie,
                    "tv" => MediaType::Tv,
                    _ => return None,
                };
                let id = id.parse().ok()?;
                Some(Route::Watch { media_type, id })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Discovery => f.write_str("/"),
            Route::Watch { media_type, id } => write!(f, "/watch/{}/{}", media_type, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Discovery));
        assert_eq!(Route::parse(""), Some(Route::Discovery));
        assert_eq!(Route::parse("/watch/movie/550"), Some(Route::watch(MediaType::Movie, 550)));
        assert_eq!(Route::parse("/watch/tv/1399/"), Some(Route::watch(MediaType::Tv, 1399)));
        assert_eq!(Route::parse("/watch/tv/1399?autoplay=1"), Some(Route::watch(MediaType::Tv, 1399)));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Route::parse("/watch/person/1"), None);
        assert_eq!(Route::parse("/watch/movie/abc"), None);
        assert_eq!(Route::parse("/watch/movie"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(Route::Discovery.to_string(), "/");
        assert_eq!(Route::watch(MediaType::Tv, 1399).to_string(), "/watch/tv/1399");
    }
}
