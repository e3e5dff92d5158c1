use tracing::{info, warn};

use super::health::HealthProbe;
use super::provider::StreamProvider;
use crate::tmdb::MediaType;

pub const EMBED_ALLOW: &str = "autoplay; encrypted-media";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream {
    pub url: String,
    pub provider: StreamProvider,
}

impl ResolvedStream {
    /// Markup for the embedding frame. The frame's content is opaque to us.
    pub fn embed_html(&self) -> String {
        format!(
            r#"<iframe src="{}" allow="{}" allowfullscreen style="border: none"></iframe>"#,
            escape_attr(&self.url),
            EMBED_ALLOW
        )
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub struct StreamResolver {
    providers: Vec<StreamProvider>,
}

impl StreamResolver {
    pub fn new(mut providers: Vec<StreamProvider>) -> Result<Self, StreamError> {
        if providers.is_empty() {
            return Err(StreamError::NoProviders);
        }
        providers.sort_by_key(|p| p.priority);
        Ok(Self { providers })
    }

    pub fn providers(&self) -> &[StreamProvider] {
        &self.providers
    }

    /// Build the embed URL from the preferred provider. No network I/O.
    pub fn resolve(
        &self,
        id: &str,
        media_type: MediaType,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<ResolvedStream, StreamError> {
        let target = StreamTarget::new(media_type, season, episode)?;
        Ok(target.build(id, &self.providers[0]))
    }

    /// Like `resolve`, but walks the providers in priority order and skips
    /// those failing their health check. Providers without a check are
    /// taken as healthy.
    pub async fn resolve_with_failover(
        &self,
        probe: &dyn HealthProbe,
        id: &str,
        media_type: MediaType,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<ResolvedStream, StreamError> {
        let target = StreamTarget::new(media_type, season, episode)?;

        for provider in &self.providers {
            if let Some(check) = &provider.health_check {
                if !probe.is_healthy(check).await {
                    warn!("Stream provider {} failed its health check", provider.id);
                    continue;
                }
            }
            info!("Using stream provider {}", provider.id);
            return Ok(target.build(id, provider));
        }

        Err(StreamError::NoHealthyProvider)
    }
}

enum StreamTarget {
    Movie,
    Episode { season: u32, episode: u32 },
}

impl StreamTarget {
    fn new(media_type: MediaType, season: Option<u32>, episode: Option<u32>) -> Result<Self, StreamError> {
        match (media_type, season, episode) {
            (MediaType::Movie, _, _) => Ok(StreamTarget::Movie),
            (MediaType::Tv, Some(season), Some(episode)) => Ok(StreamTarget::Episode { season, episode }),
            (MediaType::Tv, _, _) => Err(StreamError::InvalidParameters),
        }
    }

    fn build(&self, id: &str, provider: &StreamProvider) -> ResolvedStream {
        let url = match *self {
            StreamTarget::Movie => provider.movie_url(id),
            StreamTarget::Episode { season, episode } => provider.tv_url(id, season, episode),
        };
        ResolvedStream {
            url,
            provider: provider.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("Invalid parameters for TV show stream: season and episode are required")]
    InvalidParameters,
    #[error("No stream providers configured")]
    NoProviders,
    #[error("No healthy stream provider available")]
    NoHealthyProvider,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::provider::HealthCheck;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn provider(id: &str, priority: i32, healthy_url: Option<&str>) -> StreamProvider {
        StreamProvider {
            id: id.to_string(),
            name: id.to_string(),
            priority,
            base_url: format!("https://{}.example", id),
            movie_url: "{base}/movie/{id}".to_string(),
            tv_url: "{base}/tv/{id}/{season}/{episode}".to_string(),
            features: Default::default(),
            health_check: healthy_url.map(|u| HealthCheck {
                url: u.to_string(),
                timeout_ms: 100,
            }),
        }
    }

    struct FakeProbe {
        down: Vec<String>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        fn new(down: &[&str]) -> Self {
            Self {
                down: down.iter().map(|s| s.to_string()).collect(),
                probed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HealthProbe for FakeProbe {
        async fn is_healthy(&self, check: &HealthCheck) -> bool {
            self.probed.lock().unwrap().push(check.url.clone());
            !self.down.contains(&check.url)
        }
    }

    #[test]
    fn test_resolve_movie() {
        let resolver = StreamResolver::new(vec![StreamProvider::multiembed()]).unwrap();
        let stream = resolver.resolve("550", MediaType::Movie, None, None).unwrap();
        assert!(stream.url.contains("550"));
        assert!(!stream.url.contains("&s="));
        assert!(!stream.url.contains("&e="));
        assert_eq!(stream.provider.id, "multiembed");

        // Season/episode are ignored for movies.
        let stream = resolver.resolve("550", MediaType::Movie, Some(1), Some(2)).unwrap();
        assert!(!stream.url.contains("&s="));
    }

    #[test]
    fn test_resolve_tv() {
        let resolver = StreamResolver::new(vec![StreamProvider::multiembed()]).unwrap();
        let stream = resolver.resolve("1399", MediaType::Tv, Some(2), Some(5)).unwrap();
        assert_eq!(stream.url, "https://multiembed.mov/?video_id=1399&tmdb=1&s=2&e=5");
    }

    #[test]
    fn test_resolve_tv_requires_season_and_episode() {
        let resolver = StreamResolver::new(vec![StreamProvider::multiembed()]).unwrap();
        assert_eq!(
            resolver.resolve("1399", MediaType::Tv, None, None),
            Err(StreamError::InvalidParameters)
        );
        assert_eq!(
            resolver.resolve("1399", MediaType::Tv, Some(1), None),
            Err(StreamError::InvalidParameters)
        );
        assert_eq!(
            resolver.resolve("1399", MediaType::Tv, None, Some(1)),
            Err(StreamError::InvalidParameters)
        );
    }

    #[test]
    fn test_priority_order() {
        let resolver = StreamResolver::new(vec![
            provider("second", 2, None),
            provider("first", 1, None),
        ])
        .unwrap();
        let stream = resolver.resolve("1", MediaType::Movie, None, None).unwrap();
        assert_eq!(stream.provider.id, "first");
        assert_eq!(stream.url, "https://first.example/movie/1");
    }

    #[test]
    fn test_no_providers() {
        assert!(matches!(StreamResolver::new(vec![]), Err(StreamError::NoProviders)));
    }

    #[test]
    fn test_embed_html() {
        let resolver = StreamResolver::new(vec![StreamProvider::multiembed()]).unwrap();
        let html = resolver
            .resolve("1399", MediaType::Tv, Some(1), Some(1))
            .unwrap()
            .embed_html();
        assert!(html.contains(r#"src="https://multiembed.mov/?video_id=1399&amp;tmdb=1&amp;s=1&amp;e=1""#));
        assert!(html.contains(r#"allow="autoplay; encrypted-media""#));
    }

    #[tokio::test]
    async fn test_failover_skips_unhealthy() {
        let resolver = StreamResolver::new(vec![
            provider("a", 1, Some("https://a.example/health")),
            provider("b", 2, Some("https://b.example/health")),
            provider("c", 3, None),
        ])
        .unwrap();

        let probe = FakeProbe::new(&["https://a.example/health"]);
        let stream = resolver
            .resolve_with_failover(&probe, "9", MediaType::Tv, Some(1), Some(3))
            .await
            .unwrap();
        assert_eq!(stream.provider.id, "b");
        assert_eq!(stream.url, "https://b.example/tv/9/1/3");
        assert_eq!(probe.probed.lock().unwrap().len(), 2);

        let probe = FakeProbe::new(&["https://a.example/health", "https://b.example/health"]);
        let stream = resolver
            .resolve_with_failover(&probe, "9", MediaType::Movie, None, None)
            .await
            .unwrap();
        assert_eq!(stream.provider.id, "c");
    }

    #[tokio::test]
    async fn test_failover_all_down() {
        let resolver = StreamResolver::new(vec![provider("a", 1, Some("https://a.example/health"))]).unwrap();
        let probe = FakeProbe::new(&["https://a.example/health"]);
        let result = resolver
            .resolve_with_failover(&probe, "9", MediaType::Movie, None, None)
            .await;
        assert_eq!(result, Err(StreamError::NoHealthyProvider));
    }

    #[tokio::test]
    async fn test_failover_validates_before_probing() {
        let resolver = StreamResolver::new(vec![provider("a", 1, Some("https://a.example/health"))]).unwrap();
        let probe = FakeProbe::new(&[]);
        let result = resolver
            .resolve_with_failover(&probe, "9", MediaType::Tv, None, Some(1))
            .await;
        assert_eq!(result, Err(StreamError::InvalidParameters));
        assert!(probe.probed.lock().unwrap().is_empty());
    }
}
