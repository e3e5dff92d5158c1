use serde::{Deserialize, Serialize};

/// An embed provider. URLs are built from templates that may reference
/// `{base}`, `{id}`, `{season}` and `{episode}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamProvider {
    pub id: String,
    pub name: String,
    /// Lower is preferred.
    #[serde(default)]
    pub priority: i32,
    pub base_url: String,
    pub movie_url: String,
    pub tv_url: String,
    #[serde(default)]
    pub features: ProviderFeatures,
    #[serde(default)]
    pub health_check: Option<HealthCheck>,
}

/// Advisory only; nothing enforces these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderFeatures {
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub subtitles: bool,
    #[serde(default)]
    pub quality: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub url: String,
    #[serde(default = "default_health_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_health_timeout_ms() -> u64 {
    3000
}

impl StreamProvider {
    pub fn multiembed() -> Self {
        Self {
            id: "multiembed".to_string(),
            name: "MultiEmbed".to_string(),
            priority: 1,
            base_url: "https://multiembed.mov".to_string(),
            movie_url: "{base}/?video_id={id}&tmdb=1".to_string(),
            tv_url: "{base}/?video_id={id}&tmdb=1&s={season}&e={episode}".to_string(),
            features: ProviderFeatures {
                autoplay: true,
                subtitles: true,
                quality: vec!["1080p".to_string(), "720p".to_string(), "480p".to_string()],
            },
            health_check: Some(HealthCheck {
                url: "https://multiembed.mov".to_string(),
                timeout_ms: default_health_timeout_ms(),
            }),
        }
    }

    pub fn movie_url(&self, id: &str) -> String {
        self.expand(&self.movie_url, id, None)
    }

    pub fn tv_url(&self, id: &str, season: u32, episode: u32) -> String {
        self.expand(&self.tv_url, id, Some((season, episode)))
    }

    fn expand(&self, template: &str, id: &str, episode: Option<(u32, u32)>) -> String {
        let url = template
            .replace("{base}", self.base_url.trim_end_matches('/'))
            .replace("{id}", &urlencoding::encode(id));
        match episode {
            Some((s, e)) => url
                .replace("{season}", &s.to_string())
                .replace("{episode}", &e.to_string()),
            None => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiembed_templates() {
        let p = StreamProvider::multiembed();
        assert_eq!(p.movie_url("550"), "https://multiembed.mov/?video_id=550&tmdb=1");
        assert_eq!(
            p.tv_url("1399", 2, 5),
            "https://multiembed.mov/?video_id=1399&tmdb=1&s=2&e=5"
        );
    }

    #[test]
    fn test_id_is_encoded() {
        let p = StreamProvider::multiembed();
        assert_eq!(p.movie_url("a&b"), "https://multiembed.mov/?video_id=a%26b&tmdb=1");
    }
}
