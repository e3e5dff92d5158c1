use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::search::{DebouncedSearch, SearchOutcome};
use crate::config::SearchConfig;
use crate::progress::ProgressStore;
use crate::route::Route;
use crate::tmdb::*;

/// How many recent entries the continue-watching row shows.
pub const CONTINUE_WATCHING_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Movies,
    Tv,
}

impl Tab {
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            Tab::All => None,
            Tab::Movies => Some(MediaType::Movie),
            Tab::Tv => Some(MediaType::Tv),
        }
    }

    pub fn trending_scope(&self) -> TrendingScope {
        self.media_type().map_or(TrendingScope::All, TrendingScope::from)
    }
}

/// State behind the home screen: search, trending/genre browsing and the
/// continue-watching row. Fetch failures are logged and leave the affected
/// list empty.
pub struct DiscoveryView {
    api: Arc<dyn MetadataApi>,
    store: Arc<ProgressStore>,
    search: DebouncedSearch,
    query: String,
    searching: bool,
    search_results: Vec<Media>,
    tab: Tab,
    selected_genre: Option<u64>,
    genres: GenreCatalog,
    trending: Vec<Media>,
    genre_results: Vec<Media>,
    continue_watching: Vec<Media>,
    // Tab or genre changed while search results covered the grid.
    browse_stale: bool,
}

impl DiscoveryView {
    pub fn new(api: Arc<dyn MetadataApi>, store: Arc<ProgressStore>, config: &SearchConfig) -> Self {
        let search = DebouncedSearch::new(Arc::clone(&api), config);
        Self {
            api,
            store,
            search,
            query: String::new(),
            searching: false,
            search_results: Vec::new(),
            tab: Tab::All,
            selected_genre: None,
            genres: GenreCatalog::default(),
            trending: Vec::new(),
            genre_results: Vec::new(),
            continue_watching: Vec::new(),
            browse_stale: false,
        }
    }

    /// Initial load of every row.
    pub async fn load(&mut self) {
        let (continue_watching, genres, trending) = tokio::join!(
            fetch_continue_watching(self.api.as_ref(), &self.store),
            fetch_genres(self.api.as_ref()),
            self.api.trending(self.tab.trending_scope(), TimeWindow::Week),
        );

        self.continue_watching = continue_watching;
        if let Some(genres) = genres {
            self.genres = genres;
        }
        match trending {
            Ok(results) => self.trending = results,
            Err(e) => error!("Error loading trending: {}", e),
        }
    }

    pub async fn load_continue_watching(&mut self) {
        self.continue_watching = fetch_continue_watching(self.api.as_ref(), &self.store).await;
    }

    pub async fn load_genres(&mut self) {
        if let Some(genres) = fetch_genres(self.api.as_ref()).await {
            self.genres = genres;
        }
    }

    /// Trending is only refreshed while it is what the screen shows.
    pub async fn load_trending(&mut self) {
        if self.searching {
            self.browse_stale = true;
            return;
        }
        if self.selected_genre.is_some() {
            return;
        }
        match self.api.trending(self.tab.trending_scope(), TimeWindow::Week).await {
            Ok(results) => self.trending = results,
            Err(e) => error!("Error loading trending: {}", e),
        }
    }

    pub async fn load_genre_results(&mut self) {
        let (Some(genre_id), Some(media_type)) = (self.selected_genre, self.tab.media_type()) else {
            return;
        };
        if self.searching {
            self.browse_stale = true;
            return;
        }
        match self.api.discover_by_genre(media_type, genre_id, 1).await {
            Ok(results) => self.genre_results = results,
            Err(e) => error!("Error loading genre results: {}", e),
        }
    }

    /// Re-fetch whatever the grid shows once search no longer covers it.
    pub async fn refresh_browse(&mut self) {
        self.browse_stale = false;
        if self.selected_genre.is_some() {
            self.load_genre_results().await;
        } else {
            self.load_trending().await;
        }
    }

    /// Feed the current contents of the search box.
    pub fn set_query(&mut self, query: &str) -> u64 {
        self.query = query.to_string();
        self.search.input(query)
    }

    /// Wait for the debounced search for the latest query and show it.
    /// Returns immediately when no query is pending.
    pub async fn next_search_result(&mut self) {
        let Some(outcome) = self.search.next_outcome().await else {
            return;
        };
        if self.apply_search_outcome(outcome) && self.needs_refresh() {
            self.refresh_browse().await;
        }
    }

    /// True once search has been cleared after the tab or genre changed
    /// underneath it; `refresh_browse` brings the grid back in line.
    pub fn needs_refresh(&self) -> bool {
        !self.searching && self.browse_stale
    }

    /// Returns false when the outcome belongs to a superseded query.
    pub fn apply_search_outcome(&mut self, outcome: SearchOutcome) -> bool {
        if !self.search.is_current(&outcome) {
            debug!("Ignoring stale search outcome {}", outcome.seq());
            return false;
        }
        match outcome {
            SearchOutcome::Cleared { .. } => {
                self.searching = false;
                self.search_results.clear();
            }
            SearchOutcome::Results { query, results, .. } => {
                info!("Search {:?} returned {} results", query, results.len());
                self.searching = true;
                self.search_results = results;
            }
        }
        true
    }

    pub async fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected_genre = None;
        self.genre_results.clear();
        self.load_trending().await;
    }

    /// Genre filters apply to the movie and TV tabs only.
    pub async fn select_genre(&mut self, genre_id: u64) {
        if self.tab == Tab::All {
            return;
        }
        self.selected_genre = Some(genre_id);
        self.load_genre_results().await;
    }

    pub async fn clear_genre(&mut self) {
        self.selected_genre = None;
        self.genre_results.clear();
        self.load_trending().await;
    }

    /// The grid contents: search results, else genre results, else trending.
    pub fn displayed(&self) -> &[Media] {
        if self.searching {
            &self.search_results
        } else if self.selected_genre.is_some() {
            &self.genre_results
        } else {
            &self.trending
        }
    }

    pub fn current_genres(&self) -> &[Genre] {
        match self.tab.media_type() {
            Some(t) => self.genres.for_type(t),
            None => &[],
        }
    }

    pub fn selected_genre_name(&self) -> Option<&str> {
        let id = self.selected_genre?;
        self.current_genres()
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    pub fn remove_from_continue_watching(&mut self, media: &Media) {
        let (id, media_type) = (media.id(), media.media_type());
        self.store.remove(id, media_type);
        self.continue_watching
            .retain(|m| !(m.id() == id && m.media_type() == media_type));
    }

    pub fn open(&self, media: &Media) -> Route {
        Route::watch(media.media_type(), media.id())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selected_genre(&self) -> Option<u64> {
        self.selected_genre
    }

    pub fn genres(&self) -> &GenreCatalog {
        &self.genres
    }

    pub fn continue_watching(&self) -> &[Media] {
        &self.continue_watching
    }
}

/// Details for the most recent progress entries, fetched concurrently.
/// Entries whose details fail to load are left out.
pub async fn fetch_continue_watching(api: &dyn MetadataApi, store: &ProgressStore) -> Vec<Media> {
    let recent = store.list();
    let fetches = recent.iter().take(CONTINUE_WATCHING_LIMIT).map(|p| async move {
        let result = match p.media_type {
            MediaType::Movie => api.movie_details(p.id).await,
            MediaType::Tv => api
                .series_details(p.id)
                .await
                .map(|s| Media::new(MediaType::Tv, s.summary)),
        };
        match result {
            Ok(media) => Some(media),
            Err(e) => {
                error!("Error loading continue watching item {}/{}: {}", p.media_type, p.id, e);
                None
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}

/// Both genre lists, fetched together; `None` if either fails.
pub async fn fetch_genres(api: &dyn MetadataApi) -> Option<GenreCatalog> {
    match tokio::try_join!(api.movie_genres(), api.tv_genres()) {
        Ok((movie, tv)) => Some(GenreCatalog { movie, tv }),
        Err(e) => {
            error!("Error loading genres: {}", e);
            None
        }
    }
}
