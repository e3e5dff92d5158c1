pub mod health;
pub mod provider;
pub mod resolver;

pub use health::{HealthProbe, HttpHealthProbe};
pub use provider::{HealthCheck, ProviderFeatures, StreamProvider};
pub use resolver::{ResolvedStream, StreamError, StreamResolver, EMBED_ALLOW};
