//! Shared HTTP plumbing for the upstream adapters

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::SourceError;

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Thin wrapper around a shared `reqwest::Client`. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| SourceError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// GET `url` and decode the body as JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        source: &str,
        url: &str,
    ) -> Result<T, SourceError> {
        let body = self.get_text(source, url).await?;
        let parse_start = Instant::now();
        let value = serde_json::from_str(&body).map_err(|e| {
            warn!(source, "Failed to parse upstream response: {}", e);
            SourceError::Payload(format!("{source}: {e}"))
        })?;
        debug!(source, "Parsed response in {:.3}s", parse_start.elapsed().as_secs_f64());
        Ok(value)
    }

    async fn get_text(&self, source: &str, url: &str) -> Result<String, SourceError> {
        debug!(source, "Upstream request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| warn!(source, "Upstream request failed: {}", e))?
            .error_for_status()
            .inspect_err(|e| {
                warn!(
                    source,
                    status = e.status().map(|s| s.as_u16()),
                    "Upstream returned an error status"
                );
            })?;

        let body = response.text().await?;

        let total_duration = start_time.elapsed();
        info!(
            source,
            "Upstream responded in {:.3}s ({} bytes)",
            total_duration.as_secs_f64(),
            body.len()
        );

        if total_duration > SLOW_RESPONSE {
            warn!(source, "Slow API response detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(body)
    }
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(endpoint("https://x.org/", "/search"), "https://x.org/search");
        assert_eq!(endpoint("https://x.org/api/v3", "events"), "https://x.org/api/v3/events");
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UpstreamClient::new("geodash-tests").unwrap();
        let err = client
            .get_json::<serde_json::Value>("events", &format!("http://{addr}/events"))
            .await
            .unwrap_err();
        assert!(err.is_transport(), "got {err:?}");
    }
}
