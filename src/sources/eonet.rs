//! NASA EONET v3 natural events feed

use async_trait::async_trait;
use tracing::{info, instrument};

use super::http::{UpstreamClient, endpoint};
use super::{EventsSource, FetchResult};
use crate::config::SourcesConfig;
use crate::models::EventsFeed;

#[derive(Debug, Clone)]
pub struct EonetClient {
    http: UpstreamClient,
    base_url: String,
}

impl EonetClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_config(http: UpstreamClient, config: &SourcesConfig) -> Self {
        Self::new(http, &config.events_url)
    }
}

#[async_trait]
impl EventsSource for EonetClient {
    #[instrument(skip(self))]
    async fn natural_events(&self) -> FetchResult<EventsFeed> {
        let url = endpoint(&self.base_url, "events");
        let feed: EventsFeed = self.http.get_json("events", &url).await?;

        let open = feed.events.iter().filter(|e| !e.is_closed()).count();
        info!("Fetched {} natural events ({} open)", feed.events.len(), open);
        Ok(feed)
    }
}
