use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_YEAR: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Some(MediaType::Movie),
            "tv" | "show" | "shows" | "series" => Some(MediaType::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingScope {
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingScope::All => "all",
            TrendingScope::Movie => "movie",
            TrendingScope::Tv => "tv",
        }
    }
}

impl From<MediaType> for TrendingScope {
    fn from(t: MediaType) -> Self {
        match t {
            MediaType::Movie => TrendingScope::Movie,
            MediaType::Tv => TrendingScope::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// A catalog entry as the metadata API returns it. Movies carry `title` and
/// `release_date`, shows carry `name` and `first_air_date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

impl MediaSummary {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(UNKNOWN_TITLE)
    }

    pub fn display_year(&self) -> &str {
        match non_empty(&self.release_date).or_else(|| non_empty(&self.first_air_date)) {
            Some(date) => date.get(..4).unwrap_or(date),
            None => UNKNOWN_YEAR,
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// A catalog entry whose kind has been settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Movie(MediaSummary),
    Tv(MediaSummary),
}

impl Media {
    /// Settle the kind of a summary. An explicit `media_type` wins; a kind
    /// other than movie/tv (people, collections) is rejected. Without one,
    /// `fallback` is used, and failing that the shape decides: a `title`
    /// means movie.
    pub fn classify(summary: MediaSummary, fallback: Option<MediaType>) -> Option<Media> {
        let media_type = match summary.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None,
            None => fallback.unwrap_or(if summary.title.is_some() {
                MediaType::Movie
            } else {
                MediaType::Tv
            }),
        };
        Some(Media::new(media_type, summary))
    }

    pub fn new(media_type: MediaType, mut summary: MediaSummary) -> Media {
        summary.media_type = Some(media_type.as_str().to_string());
        match media_type {
            MediaType::Movie => Media::Movie(summary),
            MediaType::Tv => Media::Tv(summary),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Media::Movie(_) => MediaType::Movie,
            Media::Tv(_) => MediaType::Tv,
        }
    }

    pub fn summary(&self) -> &MediaSummary {
        match self {
            Media::Movie(s) | Media::Tv(s) => s,
        }
    }

    pub fn id(&self) -> u64 {
        self.summary().id
    }

    pub fn display_title(&self) -> &str {
        self.summary().display_title()
    }

    pub fn display_year(&self) -> &str {
        self.summary().display_year()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub summary: MediaSummary,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub number_of_episodes: u32,
}

impl SeriesDetail {
    /// Seasons offered for selection; season 0 holds specials and is skipped.
    pub fn selectable_seasons(&self) -> impl Iterator<Item = &SeasonSummary> {
        self.seasons.iter().filter(|s| s.season_number > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub episode_number: u32,
    pub season_number: u32,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreCatalog {
    pub movie: Vec<Genre>,
    pub tv: Vec<Genre>,
}

impl GenreCatalog {
    pub fn for_type(&self, media_type: MediaType) -> &[Genre] {
        match media_type {
            MediaType::Movie => &self.movie,
            MediaType::Tv => &self.tv,
        }
    }
}

// Response envelopes.

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeasonDetail {
    #[serde(default)]
    pub episodes: Vec<Episode>,
}
