use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use gemini_integration::{GeminiClient, GeminiConfig};
use shared::domain::{ExternalPointPolicy, Projection, ProjectionPoint, ProjectionSource};
use tracing::{info, warn};

pub mod board;
pub mod error;
pub mod feed;

pub use board::{ProjectionBoard, RefreshOutcome};
pub use error::SourceError;
pub use feed::{HttpGrowthFeed, DEFAULT_FEED_TIMEOUT};

/// Topic used when the caller hands over an empty string.
pub const DEFAULT_TOPIC: &str = "AI Growth";

#[async_trait]
pub trait PointSource: Send + Sync {
    fn label(&self) -> &'static str;
    async fn fetch(&self, topic: &str) -> Result<Vec<ProjectionPoint>, SourceError>;
}

#[async_trait]
impl PointSource for GeminiClient {
    fn label(&self) -> &'static str {
        "gemini"
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<ProjectionPoint>, SourceError> {
        Ok(self.fetch_points(topic).await?)
    }
}

/// Everything needed to wire up the live sources, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub growth_api_url: Option<String>,
    pub site_origin: Option<String>,
    pub feed_timeout: Option<Duration>,
    pub gemini: Option<GeminiConfig>,
    pub policy: ExternalPointPolicy,
}

/// Picks the best available series for a topic: growth feed, then Gemini,
/// then the seeded synthetic curve. Never fails.
pub struct ProjectionOrchestrator {
    external: Option<Arc<dyn PointSource>>,
    generative: Option<Arc<dyn PointSource>>,
    policy: ExternalPointPolicy,
}

impl ProjectionOrchestrator {
    pub fn new(
        external: Option<Arc<dyn PointSource>>,
        generative: Option<Arc<dyn PointSource>>,
        policy: ExternalPointPolicy,
    ) -> Self {
        Self {
            external,
            generative,
            policy,
        }
    }

    pub fn from_config(config: OrchestratorConfig) -> Result<Self> {
        let external = match config.growth_api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                let feed = HttpGrowthFeed::new(
                    url,
                    config.site_origin.as_deref(),
                    config.feed_timeout.unwrap_or(DEFAULT_FEED_TIMEOUT),
                )
                .context("failed to configure growth feed")?;
                info!(url = %feed.url(), "growth feed configured");
                Some(Arc::new(feed) as Arc<dyn PointSource>)
            }
            _ => None,
        };

        let generative = match config.gemini {
            Some(gemini) if !gemini.api_key.trim().is_empty() => {
                let client =
                    GeminiClient::new(gemini).context("failed to build gemini client")?;
                Some(Arc::new(client) as Arc<dyn PointSource>)
            }
            _ => None,
        };

        info!(
            growth_feed = external.is_some(),
            gemini = generative.is_some(),
            policy = ?config.policy,
            "projection orchestrator configured"
        );
        Ok(Self::new(external, generative, config.policy))
    }

    pub fn has_live_sources(&self) -> bool {
        self.external.is_some() || self.generative.is_some()
    }

    pub async fn project(&self, topic: &str) -> Projection {
        self.project_for_year(topic, Utc::now().year()).await
    }

    /// Same as [`project`](Self::project) with an explicit clock.
    pub async fn project_for_year(&self, topic: &str, current_year: i32) -> Projection {
        let topic = match topic.trim() {
            "" => DEFAULT_TOPIC,
            trimmed => trimmed,
        };

        let mut feed_error = None;
        if let Some(feed) = &self.external {
            match try_source(feed.as_ref(), topic).await {
                Ok(points) => {
                    return self.assemble(topic, ProjectionSource::External, points, None, current_year)
                }
                Err(error) => {
                    warn!(topic, source = feed.label(), %error, "projection: growth feed unavailable");
                    feed_error = Some(error);
                }
            }
        }

        let mut generative_error = None;
        if let Some(generative) = &self.generative {
            match try_source(generative.as_ref(), topic).await {
                Ok(points) => {
                    let advisory = feed_error.map(|error| {
                        format!("Growth feed failed ({error}). Gemini fallback is active.")
                    });
                    return self.assemble(
                        topic,
                        ProjectionSource::Generative,
                        points,
                        advisory,
                        current_year,
                    );
                }
                Err(error) => {
                    warn!(topic, source = generative.label(), %error, "projection: generative source unavailable");
                    generative_error = Some(error);
                }
            }
        }

        let advisory = match (feed_error, generative_error) {
            (Some(error), _) => format!(
                "Live services unavailable: growth feed failed ({error}). Showing illustrative projection."
            ),
            (None, Some(error)) => format!(
                "Unable to fetch projection from Gemini ({error}). Showing illustrative projection."
            ),
            (None, None) => {
                "Add a Gemini key or configure a growth feed to activate live projections."
                    .to_string()
            }
        };
        self.assemble(
            topic,
            ProjectionSource::Synthesized,
            Vec::new(),
            Some(advisory),
            current_year,
        )
    }

    fn assemble(
        &self,
        topic: &str,
        source: ProjectionSource,
        points: Vec<ProjectionPoint>,
        advisory: Option<String>,
        current_year: i32,
    ) -> Projection {
        let series = projection::shape_series(topic, points, self.policy, current_year);
        let frame = projection::merge_with_baseline(&series);
        let summary = projection::summarize(&series, current_year);
        info!(
            topic,
            source = source.as_str(),
            points = series.len(),
            delta = summary.delta,
            horizon = summary.horizon,
            "projection ready"
        );
        Projection {
            topic: topic.to_string(),
            source,
            series,
            frame,
            summary,
            advisory,
        }
    }
}

async fn try_source(source: &dyn PointSource, topic: &str) -> Result<Vec<ProjectionPoint>, SourceError> {
    let points = source.fetch(topic).await?;
    if points.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(points)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
