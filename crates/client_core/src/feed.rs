use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use shared::domain::ProjectionPoint;
use tracing::info;
use url::Url;

use crate::{error::SourceError, PointSource};

pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Configurable external "growth" feed: `GET <url>?topic=<topic>` returning
/// either a point array or `{ data: [...] }`.
#[derive(Debug, Clone)]
pub struct HttpGrowthFeed {
    http: Client,
    url: Url,
}

impl HttpGrowthFeed {
    /// `raw_url` may be absolute, or a path resolved against `site_origin`.
    pub fn new(
        raw_url: &str,
        site_origin: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let url = resolve_feed_url(raw_url, site_origin)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn topic_url(&self, topic: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("topic", topic);
        url
    }
}

#[async_trait]
impl PointSource for HttpGrowthFeed {
    fn label(&self) -> &'static str {
        "growth-feed"
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<ProjectionPoint>, SourceError> {
        let response = self
            .http
            .get(self.topic_url(topic))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let points = projection::normalize(&payload);
        info!(topic, points = points.len(), url = %self.url, "growth feed: response normalized");
        Ok(points)
    }
}

fn resolve_feed_url(raw_url: &str, site_origin: Option<&str>) -> Result<Url, SourceError> {
    let raw_url = raw_url.trim();
    let invalid = |reason: String| SourceError::InvalidUrl {
        url: raw_url.to_string(),
        reason,
    };

    if raw_url.contains("://") {
        return Url::parse(raw_url).map_err(|e| invalid(e.to_string()));
    }

    let origin = site_origin
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .ok_or_else(|| invalid("relative feed urls need a site origin".to_string()))?;
    let origin = Url::parse(origin).map_err(|e| invalid(format!("bad site origin: {e}")))?;
    let path = if raw_url.starts_with('/') {
        raw_url.to_string()
    } else {
        format!("/{raw_url}")
    };
    origin.join(&path).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
