use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::provider::HealthCheck;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_healthy(&self, check: &HealthCheck) -> bool;
}

/// Probes a provider with a plain GET. Anything short of a 5xx counts as
/// up: embed hosts commonly answer their root with redirects or 403s.
pub struct HttpHealthProbe {
    http: reqwest::Client,
}

impl HttpHealthProbe {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, check: &HealthCheck) -> bool {
        let request = self
            .http
            .get(&check.url)
            .timeout(Duration::from_millis(check.timeout_ms));

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                debug!("Health check {} answered {}", check.url, status);
                !status.is_server_error()
            }
            Err(e) => {
                debug!("Health check {} failed: {}", check.url, e);
                false
            }
        }
    }
}
