pub mod config;
pub mod progress;
pub mod route;
pub mod stream;
pub mod tmdb;
pub mod views;

use std::sync::Arc;
use tracing::{info, warn};

use progress::{FileBackend, ProgressStore};
use route::Route;
use stream::{HealthProbe, HttpHealthProbe, StreamResolver};
use tmdb::{ImageSize, ImageUrls, Media, MediaType, MetadataApi, TimeWindow, TmdbClient, TrendingScope};
use views::{DiscoveryView, PlaybackView};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Metadata error: {0}")]
    Metadata(#[from] tmdb::TmdbError),
    #[error("Stream error: {0}")]
    Stream(#[from] stream::StreamError),
    #[error("Invalid route: {0}")]
    Route(String),
    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// The services every view needs, built once from config and handed out
/// explicitly.
pub struct App {
    pub config: config::Config,
    pub api: Arc<dyn MetadataApi>,
    pub store: Arc<ProgressStore>,
    pub resolver: Arc<StreamResolver>,
    pub images: ImageUrls,
    probe: Option<Arc<dyn HealthProbe>>,
}

impl App {
    pub fn new(config: config::Config) -> Result<Self, AppError> {
        if config.tmdb.apikey.is_empty() {
            warn!("No TMDB API key configured (set tmdb.apikey or {})", config::API_KEY_ENV);
        }

        let api: Arc<dyn MetadataApi> = Arc::new(TmdbClient::new(&config.tmdb)?);

        let data_dir = config.get_data_dir();
        info!("Storing watch progress in {}", data_dir.display());
        let store = Arc::new(ProgressStore::new(
            Box::new(FileBackend::new(data_dir)),
            config.storage.max_history,
        ));

        let resolver = Arc::new(StreamResolver::new(config.streaming.providers.clone())?);
        let probe: Option<Arc<dyn HealthProbe>> = if config.streaming.failover {
            Some(Arc::new(HttpHealthProbe::new()))
        } else {
            None
        };

        Ok(Self {
            images: ImageUrls::new(&config.tmdb),
            config,
            api,
            store,
            resolver,
            probe,
        })
    }

    pub fn discovery(&self) -> DiscoveryView {
        DiscoveryView::new(Arc::clone(&self.api), Arc::clone(&self.store), &self.config.search)
    }

    pub fn playback(&self, media_type: MediaType, id: u64) -> PlaybackView {
        let view = PlaybackView::new(
            Arc::clone(&self.api),
            Arc::clone(&self.resolver),
            Arc::clone(&self.store),
            media_type,
            id,
        );
        match &self.probe {
            Some(probe) => view.with_failover(Arc::clone(probe)),
            None => view,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Search movies and TV shows
    Search { query: String },
    /// Show trending titles
    Trending {
        /// all, movie or tv
        #[arg(long, default_value = "all", value_parser = parse_scope)]
        scope: TrendingScope,
        /// day or week
        #[arg(long, default_value = "week", value_parser = parse_window)]
        window: TimeWindow,
    },
    /// List movie and TV genres
    Genres,
    /// Browse a genre
    Discover {
        #[arg(long = "type", value_parser = parse_media_type)]
        media_type: MediaType,
        #[arg(long)]
        genre: u64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Play a title and record progress
    Watch {
        #[arg(value_parser = parse_media_type)]
        media_type: MediaType,
        id: u64,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode: Option<u32>,
    },
    /// Play a title given its route, e.g. /watch/tv/1399
    Open { route: String },
    /// Show recorded watch progress
    History,
    /// Show the continue-watching row
    Continue,
    /// Remove a title from the watch history
    Forget {
        #[arg(value_parser = parse_media_type)]
        media_type: MediaType,
        id: u64,
    },
    /// Remove all watch history
    ClearHistory,
}

fn parse_media_type(s: &str) -> Result<MediaType, String> {
    MediaType::from_str(s).ok_or_else(|| format!("expected movie or tv, got {:?}", s))
}

fn parse_scope(s: &str) -> Result<TrendingScope, String> {
    match s {
        "all" => Ok(TrendingScope::All),
        other => parse_media_type(other).map(TrendingScope::from),
    }
}

fn parse_window(s: &str) -> Result<TimeWindow, String> {
    match s {
        "day" => Ok(TimeWindow::Day),
        "week" => Ok(TimeWindow::Week),
        other => Err(format!("expected day or week, got {:?}", other)),
    }
}

pub async fn run(config_path: &str, debug_logs: bool, command: Command) -> Result<(), AppError> {
    let mut config = config::Config::load(config_path)?;
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let app = App::new(config)?;

    match command {
        Command::Search { query } => {
            let mut view = app.discovery();
            view.set_query(&query);
            view.next_search_result().await;
            print_media(&app.images, view.displayed().iter().filter(|_| view.is_searching()));
        }
        Command::Trending { scope, window } => {
            let results = app.api.trending(scope, window).await?;
            print_media(&app.images, results.iter());
        }
        Command::Genres => {
            let mut view = app.discovery();
            view.load_genres().await;
            println!("Movie genres:");
            for g in &view.genres().movie {
                println!("  {:>6}  {}", g.id, g.name);
            }
            println!("TV genres:");
            for g in &view.genres().tv {
                println!("  {:>6}  {}", g.id, g.name);
            }
        }
        Command::Discover { media_type, genre, page } => {
            let results = app.api.discover_by_genre(media_type, genre, page).await?;
            print_media(&app.images, results.iter());
        }
        Command::Watch { media_type, id, season, episode } => {
            watch(&app, media_type, id, season, episode).await?;
        }
        Command::Open { route } => match Route::parse(&route) {
            Some(Route::Watch { media_type, id }) => watch(&app, media_type, id, None, None).await?,
            _ => return Err(AppError::Route(route)),
        },
        Command::History => {
            let entries = app.store.list();
            if entries.is_empty() {
                println!("No watch history");
            }
            for p in entries {
                let when = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(p.last_watched)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                match (p.season, p.episode) {
                    (Some(s), Some(e)) => println!(
                        "{}  {:<5} {:>8}  S{}E{} {}",
                        when,
                        p.media_type,
                        p.id,
                        s,
                        e,
                        p.episode_name.unwrap_or_default()
                    ),
                    _ => println!("{}  {:<5} {:>8}", when, p.media_type, p.id),
                }
            }
        }
        Command::Continue => {
            let mut view = app.discovery();
            view.load_continue_watching().await;
            print_media(&app.images, view.continue_watching().iter());
        }
        Command::Forget { media_type, id } => {
            app.store.remove(id, media_type);
        }
        Command::ClearHistory => {
            app.store.clear();
        }
    }

    Ok(())
}

async fn watch(
    app: &App,
    media_type: MediaType,
    id: u64,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<(), AppError> {
    if media_type == MediaType::Movie && (season.is_some() || episode.is_some()) {
        return Err(AppError::Argument("--season/--episode only apply to tv".to_string()));
    }

    let mut view = app.playback(media_type, id);
    view.load().await;
    if let Some(season) = season {
        view.select_season(season).await;
    }
    if let Some(episode) = episode {
        view.select_episode(episode).await;
    }

    println!("{} ({})  {}", view.title(), view.year(), view.route());
    if media_type == MediaType::Tv {
        let seasons: Vec<String> = view.seasons().iter().map(|s| format!("S{}", s.season_number)).collect();
        println!("Seasons: {}", seasons.join(" "));
        match view.current_episode() {
            Some(e) => println!("Episode {}: {}", e.episode_number, e.name),
            None => println!("Season {} episode {}", view.season(), view.episode()),
        }
    }

    let stream = view
        .stream()
        .ok_or(AppError::Stream(stream::StreamError::NoHealthyProvider))?;
    println!("Provider: {}", stream.provider.name);
    println!("{}", stream.url);
    println!("{}", stream.embed_html());
    Ok(())
}

fn print_media<'a>(images: &ImageUrls, media: impl Iterator<Item = &'a Media>) {
    let mut count = 0;
    for m in media {
        count += 1;
        let s = m.summary();
        println!(
            "[{:<5}] {:>8}  {} ({})  {:.1}/10 ({} votes)  {}",
            m.media_type(),
            m.id(),
            m.display_title(),
            m.display_year(),
            s.vote_average,
            s.vote_count,
            images.poster_url(s.poster_path.as_deref(), ImageSize::POSTER)
        );
    }
    if count == 0 {
        println!("No results found");
    }
}
