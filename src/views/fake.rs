use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::tmdb::*;

/// Canned catalog for view tests. Series have specials plus two seasons
/// of three and two episodes.
#[derive(Default)]
pub struct FakeApi {
    failing: bool,
    missing: HashSet<u64>,
    missing_seasons: HashSet<u32>,
    searches: Mutex<Vec<String>>,
    season_requests: Mutex<Vec<(u64, u32)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn missing(mut self, id: u64) -> Self {
        self.missing.insert(id);
        self
    }

    pub fn missing_season(mut self, season: u32) -> Self {
        self.missing_seasons.insert(season);
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn season_requests(&self) -> Vec<(u64, u32)> {
        self.season_requests.lock().unwrap().clone()
    }

    fn check(&self, id: Option<u64>) -> TmdbResult<()> {
        if self.failing || id.map_or(false, |id| self.missing.contains(&id)) {
            return Err(TmdbError::Status {
                status: 404,
                path: "fake".to_string(),
            });
        }
        Ok(())
    }

    pub fn movie(id: u64, title: &str) -> Media {
        Media::new(
            MediaType::Movie,
            MediaSummary {
                id,
                title: Some(title.to_string()),
                release_date: Some("1995-12-15".to_string()),
                ..Default::default()
            },
        )
    }

    pub fn show(id: u64, name: &str) -> Media {
        Media::new(
            MediaType::Tv,
            MediaSummary {
                id,
                name: Some(name.to_string()),
                first_air_date: Some("2022-02-18".to_string()),
                ..Default::default()
            },
        )
    }

    fn episode_count(season: u32) -> u32 {
        match season {
            0 => 1,
            1 => 3,
            2 => 2,
            _ => 0,
        }
    }
}

#[async_trait]
impl MetadataApi for FakeApi {
    async fn search(&self, query: &str) -> TmdbResult<Vec<Media>> {
        self.searches.lock().unwrap().push(query.to_string());
        self.check(None)?;
        Ok(vec![Self::movie(1, "Heat"), Self::show(2, "Heat Wave")])
    }

    async fn trending(&self, scope: TrendingScope, _window: TimeWindow) -> TmdbResult<Vec<Media>> {
        self.check(None)?;
        Ok(match scope {
            TrendingScope::All => vec![Self::movie(10, "Trending Movie"), Self::show(20, "Trending Show")],
            TrendingScope::Movie => vec![Self::movie(10, "Trending Movie")],
            TrendingScope::Tv => vec![Self::show(20, "Trending Show")],
        })
    }

    async fn movie_genres(&self) -> TmdbResult<Vec<Genre>> {
        self.check(None)?;
        Ok(vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 18, name: "Drama".to_string() },
        ])
    }

    async fn tv_genres(&self) -> TmdbResult<Vec<Genre>> {
        self.check(None)?;
        Ok(vec![
            Genre { id: 10759, name: "Action & Adventure".to_string() },
            Genre { id: 18, name: "Drama".to_string() },
        ])
    }

    async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u64,
        _page: u32,
    ) -> TmdbResult<Vec<Media>> {
        self.check(None)?;
        let summary = MediaSummary {
            id: genre_id * 100,
            title: Some(format!("Genre {}", genre_id)),
            ..Default::default()
        };
        Ok(vec![Media::new(media_type, summary)])
    }

    async fn movie_details(&self, id: u64) -> TmdbResult<Media> {
        self.check(Some(id))?;
        Ok(Self::movie(id, &format!("Movie {}", id)))
    }

    async fn series_details(&self, id: u64) -> TmdbResult<SeriesDetail> {
        self.check(Some(id))?;
        let seasons = (0..=2)
            .map(|n| SeasonSummary {
                id: id * 10 + n as u64,
                name: format!("Season {}", n),
                season_number: n,
                episode_count: Self::episode_count(n),
                poster_path: None,
            })
            .collect();
        Ok(SeriesDetail {
            summary: Self::show(id, &format!("Show {}", id)).summary().clone(),
            seasons,
            number_of_seasons: 2,
            number_of_episodes: 5,
        })
    }

    async fn season_details(&self, series_id: u64, season_number: u32) -> TmdbResult<Vec<Episode>> {
        self.season_requests.lock().unwrap().push((series_id, season_number));
        self.check(Some(series_id))?;
        if self.missing_seasons.contains(&season_number) {
            return Err(TmdbError::Status {
                status: 404,
                path: "fake".to_string(),
            });
        }
        Ok((1..=Self::episode_count(season_number))
            .map(|e| Episode {
                id: series_id * 1000 + season_number as u64 * 100 + e as u64,
                name: format!("S{}E{}", season_number, e),
                episode_number: e,
                season_number,
                ..Default::default()
            })
            .collect())
    }
}
