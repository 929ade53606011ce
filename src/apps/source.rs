//! Where app envelopes come from
//!
//! The collection never performs I/O itself. An [`AppsSource`] hands it a
//! decoded response envelope; transport concerns (timeouts, status codes)
//! stay on this side of the seam.

use crate::core::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Produces decoded `/v2/apps` response envelopes
#[async_trait]
pub trait AppsSource: Send + Sync {
    /// Fetch one envelope, e.g. `{"apps": [...]}`
    async fn fetch_envelope(&self) -> Result<Value>;
}

/// A source that always returns the same envelope
#[derive(Debug, Clone)]
pub struct StaticAppsSource {
    envelope: Value,
}

impl StaticAppsSource {
    pub fn new(envelope: Value) -> Self {
        Self { envelope }
    }
}

#[async_trait]
impl AppsSource for StaticAppsSource {
    async fn fetch_envelope(&self) -> Result<Value> {
        Ok(self.envelope.clone())
    }
}

#[cfg(feature = "http")]
pub use http::HttpAppsSource;

#[cfg(feature = "http")]
mod http {
    use super::AppsSource;
    use crate::config::CollectionConfig;
    use crate::core::error::{CollectionError, Result};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;

    /// Fetches envelopes with `GET {base_url}{resource_path}`
    #[derive(Debug, Clone)]
    pub struct HttpAppsSource {
        client: reqwest::Client,
        url: String,
    }

    impl HttpAppsSource {
        pub fn new(base_url: &str, resource_path: &str) -> Result<Self> {
            Self::build(base_url, resource_path, None)
        }

        pub fn from_config(config: &CollectionConfig) -> Result<Self> {
            config.validate()?;
            Self::build(
                &config.base_url,
                &config.resource_path,
                config.request_timeout_secs.map(Duration::from_secs),
            )
        }

        fn build(base_url: &str, resource_path: &str, timeout: Option<Duration>) -> Result<Self> {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build().map_err(transport)?;

            Ok(Self {
                client,
                url: format!("{}{}", base_url.trim_end_matches('/'), resource_path),
            })
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    #[async_trait]
    impl AppsSource for HttpAppsSource {
        async fn fetch_envelope(&self) -> Result<Value> {
            tracing::debug!(url = %self.url, "fetching apps");
            let response = self.client.get(&self.url).send().await.map_err(transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(CollectionError::Transport {
                    message: format!("GET {} returned {}", self.url, status),
                    status: Some(status.as_u16()),
                });
            }

            response.json::<Value>().await.map_err(|e| {
                CollectionError::malformed(format!("response body is not valid JSON: {}", e))
            })
        }
    }

    fn transport(err: reqwest::Error) -> CollectionError {
        CollectionError::Transport {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }

}
