use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::types::*;
use crate::config::TmdbConfig;

/// Read-only access to the metadata catalog. Views hold an
/// `Arc<dyn MetadataApi>` so tests can swap in canned data.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn search(&self, query: &str) -> TmdbResult<Vec<Media>>;
    async fn trending(&self, scope: TrendingScope, window: TimeWindow) -> TmdbResult<Vec<Media>>;
    async fn movie_genres(&self) -> TmdbResult<Vec<Genre>>;
    async fn tv_genres(&self) -> TmdbResult<Vec<Genre>>;
    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u64,
        page: u32,
    ) -> TmdbResult<Vec<Media>>;
    async fn movie_details(&self, id: u64) -> TmdbResult<Media>;
    async fn series_details(&self, id: u64) -> TmdbResult<SeriesDetail>;
    async fn season_details(&self, series_id: u64, season_number: u32) -> TmdbResult<Vec<Episode>>;
}

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> TmdbResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.baseurl.trim_end_matches('/').to_string(),
            api_key: config.apikey.clone(),
        })
    }

    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> String {
        endpoint_url(&self.base_url, &self.api_key, path, params)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> TmdbResult<T> {
        let url = self.endpoint_url(path, params);
        debug!("GET {}", path);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MetadataApi for TmdbClient {
    async fn search(&self, query: &str) -> TmdbResult<Vec<Media>> {
        let page: Page<MediaSummary> = self
            .get_json("search/multi", &[("query", query.to_string())])
            .await?;
        Ok(keep_playable(page.results))
    }

    async fn trending(&self, scope: TrendingScope, window: TimeWindow) -> TmdbResult<Vec<Media>> {
        let path = format!("trending/{}/{}", scope.as_str(), window.as_str());
        let page: Page<MediaSummary> = self.get_json(&path, &[]).await?;
        let fallback = match scope {
            TrendingScope::Movie => Some(MediaType::Movie),
            TrendingScope::Tv => Some(MediaType::Tv),
            TrendingScope::All => None,
        };
        Ok(page
            .results
            .into_iter()
            .filter_map(|s| Media::classify(s, fallback))
            .collect())
    }

    async fn movie_genres(&self) -> TmdbResult<Vec<Genre>> {
        let list: GenreList = self.get_json("genre/movie/list", &[]).await?;
        Ok(list.genres)
    }

    async fn tv_genres(&self) -> TmdbResult<Vec<Genre>> {
        let list: GenreList = self.get_json("genre/tv/list", &[]).await?;
        Ok(list.genres)
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u64,
        page: u32,
    ) -> TmdbResult<Vec<Media>> {
        let path = format!("discover/{}", media_type);
        let params = [
            ("with_genres", genre_id.to_string()),
            ("page", page.max(1).to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        let page: Page<MediaSummary> = self.get_json(&path, &params).await?;
        Ok(force_type(page.results, media_type))
    }

    async fn movie_details(&self, id: u64) -> TmdbResult<Media> {
        let summary: MediaSummary = self.get_json(&format!("movie/{}", id), &[]).await?;
        Ok(Media::new(MediaType::Movie, summary))
    }

    async fn series_details(&self, id: u64) -> TmdbResult<SeriesDetail> {
        let mut detail: SeriesDetail = self.get_json(&format!("tv/{}", id), &[]).await?;
        detail.summary.media_type = Some(MediaType::Tv.as_str().to_string());
        Ok(detail)
    }

    async fn season_details(&self, series_id: u64, season_number: u32) -> TmdbResult<Vec<Episode>> {
        let path = format!("tv/{}/season/{}", series_id, season_number);
        let season: SeasonDetail = self.get_json(&path, &[]).await?;
        Ok(season.episodes)
    }
}

fn endpoint_url(base: &str, api_key: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut url = format!("{}/{}?api_key={}", base, path, urlencoding::encode(api_key));
    for (name, value) in params {
        url.push('&');
        url.push_str(name);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

/// Drops people and anything else that cannot be played, keeping order.
pub(crate) fn keep_playable(results: Vec<MediaSummary>) -> Vec<Media> {
    results
        .into_iter()
        .filter(|s| matches!(s.media_type.as_deref(), Some("movie") | Some("tv")))
        .filter_map(|s| Media::classify(s, None))
        .collect()
}

/// The discover endpoint does not echo the media type back.
pub(crate) fn force_type(results: Vec<MediaSummary>, media_type: MediaType) -> Vec<Media> {
    results
        .into_iter()
        .map(|s| Media::new(media_type, s))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {path}")]
    Status { status: u16, path: String },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TmdbError {
    /// Decode failures are the provider sending an unexpected shape; all
    /// other variants are fetch failures.
    pub fn is_decode(&self) -> bool {
        matches!(self, TmdbError::Decode(_))
    }
}

pub type TmdbResult<T> = Result<T, TmdbError>;
