use std::sync::Arc;
use tracing::{error, info};

use crate::progress::{ProgressStore, ProgressUpdate};
use crate::route::Route;
use crate::stream::{HealthProbe, ResolvedStream, StreamResolver};
use crate::tmdb::*;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackMedia {
    Movie(Media),
    Series(SeriesDetail),
}

impl PlaybackMedia {
    pub fn summary(&self) -> &MediaSummary {
        match self {
            PlaybackMedia::Movie(m) => m.summary(),
            PlaybackMedia::Series(s) => &s.summary,
        }
    }
}

/// State behind the player screen for one title. Every change of title,
/// season or episode re-resolves the stream and records progress.
pub struct PlaybackView {
    api: Arc<dyn MetadataApi>,
    resolver: Arc<StreamResolver>,
    store: Arc<ProgressStore>,
    probe: Option<Arc<dyn HealthProbe>>,
    media_type: MediaType,
    id: u64,
    media: Option<PlaybackMedia>,
    loading: bool,
    season: u32,
    episode: u32,
    episodes: Vec<Episode>,
    stream: Option<ResolvedStream>,
}

impl PlaybackView {
    pub fn new(
        api: Arc<dyn MetadataApi>,
        resolver: Arc<StreamResolver>,
        store: Arc<ProgressStore>,
        media_type: MediaType,
        id: u64,
    ) -> Self {
        Self {
            api,
            resolver,
            store,
            probe: None,
            media_type,
            id,
            media: None,
            loading: true,
            season: 1,
            episode: 1,
            episodes: Vec::new(),
            stream: None,
        }
    }

    pub fn from_route(
        api: Arc<dyn MetadataApi>,
        resolver: Arc<StreamResolver>,
        store: Arc<ProgressStore>,
        route: Route,
    ) -> Option<Self> {
        match route {
            Route::Watch { media_type, id } => Some(Self::new(api, resolver, store, media_type, id)),
            Route::Discovery => None,
        }
    }

    /// Resolve streams through health-checked failover instead of always
    /// taking the preferred provider.
    pub fn with_failover(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Fetch the title, restore where a series was left off, then start
    /// the stream.
    pub async fn load(&mut self) {
        self.loading = true;
        let media = match self.media_type {
            MediaType::Movie => match self.api.movie_details(self.id).await {
                Ok(media) => Some(PlaybackMedia::Movie(media)),
                Err(e) => {
                    error!("Error loading movie {}: {}", self.id, e);
                    None
                }
            },
            MediaType::Tv => {
                if let Some(saved) = self.store.find(self.id, MediaType::Tv) {
                    if let (Some(season), Some(episode)) = (saved.season, saved.episode) {
                        if season > 0 && episode > 0 {
                            info!("Resuming series {} at S{}E{}", self.id, season, episode);
                            self.season = season;
                            self.episode = episode;
                        }
                    }
                }
                match self.api.series_details(self.id).await {
                    Ok(detail) => Some(PlaybackMedia::Series(detail)),
                    Err(e) => {
                        error!("Error loading series {}: {}", self.id, e);
                        None
                    }
                }
            }
        };
        self.media = media;
        self.loading = false;

        if self.media_type == MediaType::Tv {
            self.load_episodes().await;
        }
        self.refresh_stream().await;
    }

    pub async fn select_season(&mut self, season: u32) {
        if self.media_type != MediaType::Tv {
            return;
        }
        self.season = season;
        self.episode = 1;
        self.load_episodes().await;
        self.refresh_stream().await;
    }

    pub async fn select_episode(&mut self, episode: u32) {
        if self.media_type != MediaType::Tv {
            return;
        }
        self.episode = episode;
        self.refresh_stream().await;
    }

    /// Step to the following episode in the loaded list. Returns false at
    /// the end of the season or when the current episode is not listed.
    pub async fn next_episode(&mut self) -> bool {
        match self.episode_index() {
            Some(i) if i + 1 < self.episodes.len() => {
                let next = self.episodes[i + 1].episode_number;
                self.select_episode(next).await;
                true
            }
            _ => false,
        }
    }

    pub async fn previous_episode(&mut self) -> bool {
        match self.episode_index() {
            Some(i) if i > 0 => {
                let prev = self.episodes[i - 1].episode_number;
                self.select_episode(prev).await;
                true
            }
            _ => false,
        }
    }

    pub fn has_next_episode(&self) -> bool {
        self.episode_index().map_or(false, |i| i + 1 < self.episodes.len())
    }

    pub fn has_previous_episode(&self) -> bool {
        self.episode_index().map_or(false, |i| i > 0)
    }

    async fn load_episodes(&mut self) {
        self.episodes.clear();
        match self.api.season_details(self.id, self.season).await {
            Ok(episodes) => self.episodes = episodes,
            Err(e) => error!("Error loading episodes for {} season {}: {}", self.id, self.season, e),
        }
    }

    async fn refresh_stream(&mut self) {
        let id = self.id.to_string();
        let (season, episode) = match self.media_type {
            MediaType::Movie => (None, None),
            MediaType::Tv => (Some(self.season), Some(self.episode)),
        };

        let resolved = match &self.probe {
            Some(probe) => {
                self.resolver
                    .resolve_with_failover(probe.as_ref(), &id, self.media_type, season, episode)
                    .await
            }
            None => self.resolver.resolve(&id, self.media_type, season, episode),
        };

        match resolved {
            Ok(stream) => {
                self.stream = Some(stream);
                self.store.save(self.progress_update());
            }
            Err(e) => {
                error!("Error loading stream for {}/{}: {}", self.media_type, self.id, e);
                self.stream = None;
            }
        }
    }

    fn progress_update(&self) -> ProgressUpdate {
        match self.media_type {
            MediaType::Movie => ProgressUpdate::movie(self.id),
            MediaType::Tv => ProgressUpdate::episode(
                self.id,
                self.season,
                self.episode,
                self.current_episode().map(|e| e.name.clone()),
            ),
        }
    }

    fn episode_index(&self) -> Option<usize> {
        self.episodes
            .iter()
            .position(|e| e.episode_number == self.episode)
    }

    /// Spinner state: still fetching, or the title never arrived.
    pub fn is_loading(&self) -> bool {
        self.loading || self.media.is_none()
    }

    pub fn media(&self) -> Option<&PlaybackMedia> {
        self.media.as_ref()
    }

    pub fn title(&self) -> &str {
        self.media
            .as_ref()
            .map_or(UNKNOWN_TITLE, |m| m.summary().display_title())
    }

    pub fn year(&self) -> &str {
        self.media
            .as_ref()
            .map_or(UNKNOWN_YEAR, |m| m.summary().display_year())
    }

    pub fn seasons(&self) -> Vec<&SeasonSummary> {
        match &self.media {
            Some(PlaybackMedia::Series(s)) => s.selectable_seasons().collect(),
            _ => Vec::new(),
        }
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|e| e.episode_number == self.episode)
    }

    pub fn stream(&self) -> Option<&ResolvedStream> {
        self.stream.as_ref()
    }

    pub fn route(&self) -> Route {
        Route::watch(self.media_type, self.id)
    }
}
