use std::sync::Arc;

use chrono::{Datelike, SecondsFormat, Utc};
use client_core::ProjectionOrchestrator;
use gemini_integration::{GeminiClient, GeminiError};
use shared::{
    domain::{ExternalPointPolicy, QueueSnapshot},
    error::{ApiError, ErrorCode},
    protocol::{
        BuildQueueExtra, BuildQueueResponse, GeminiProjectionExtra, GeminiProjectionResponse,
        InterestTrendsResponse, KeyOrigin, NoExtra, ProjectionResponse, SuccessEnvelope,
        TopicExtra,
    },
};
use tracing::{info, warn};

mod fields;

pub use fields::{first_present, RequestFields};

/// Static operations snapshot served by the build-queue endpoint.
pub const QUEUE_SNAPSHOT: QueueSnapshot = QueueSnapshot {
    audits_running: 3,
    deployments_today: 1,
    avg_time_to_value: 3.2,
    active_agents: 9,
    backlog: 4,
};

#[derive(Clone)]
pub struct ApiContext {
    /// Gemini transport carrying the service key (empty when none is set).
    pub gemini: GeminiClient,
    pub service_key: Option<String>,
    pub policy: ExternalPointPolicy,
    pub orchestrator: Arc<ProjectionOrchestrator>,
}

impl ApiContext {
    pub fn has_service_key(&self) -> bool {
        self.service_key.is_some()
    }
}

pub fn build_queue_route() -> &'static str {
    "/api/v1/build-queue"
}

pub fn interest_trends_route() -> &'static str {
    "/api/v1/interest-trends"
}

pub fn gemini_projection_route() -> &'static str {
    "/api/v1/gemini-projection"
}

pub fn projection_route() -> &'static str {
    "/api/v1/projection"
}

pub fn build_queue() -> BuildQueueResponse {
    SuccessEnvelope::new(
        QUEUE_SNAPSHOT,
        BuildQueueExtra {
            refreshed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    )
}

pub fn interest_trends(
    ctx: &ApiContext,
    fields: &RequestFields,
) -> Result<InterestTrendsResponse, ApiError> {
    let topic = first_present([
        fields.query_field("topic"),
        fields.query_field("interest"),
        fields.body_field("topic"),
        fields.body_field("interest"),
    ]);
    if topic.is_empty() {
        return Err(ApiError::new(
            ErrorCode::BadRequest,
            "Missing required parameter: topic or interest",
        ));
    }

    let data = projection::interest_forecast(&topic, Utc::now().year(), ctx.has_service_key());
    Ok(SuccessEnvelope::new(data, TopicExtra { topic }))
}

pub async fn gemini_projection(
    ctx: &ApiContext,
    fields: &RequestFields,
) -> Result<GeminiProjectionResponse, ApiError> {
    let topic = first_present([fields.query_field("topic"), fields.body_field("topic")]);
    if topic.is_empty() {
        return Err(ApiError::bare(ErrorCode::MissingTopic));
    }

    let client_key = fields.body_field("apiKey");
    let (client, origin) = if !client_key.is_empty() {
        (ctx.gemini.with_api_key(client_key), KeyOrigin::UserKey)
    } else if ctx.has_service_key() {
        (ctx.gemini.clone(), KeyOrigin::ServiceKey)
    } else {
        return Err(ApiError::bare(ErrorCode::NoApiKey));
    };

    let points = client.fetch_points(&topic).await.map_err(|error| {
        warn!(topic = %topic, %error, "gemini projection failed");
        gemini_failure(error)
    })?;
    if points.is_empty() {
        return Err(empty_response());
    }

    let data = projection::shape_series(&topic, points, ctx.policy, Utc::now().year());
    info!(topic = %topic, points = data.len(), source = ?origin, "gemini projection served");
    Ok(SuccessEnvelope::new(
        data,
        GeminiProjectionExtra {
            topic,
            source: origin,
        },
    ))
}

pub async fn projection(
    ctx: &ApiContext,
    fields: &RequestFields,
) -> Result<ProjectionResponse, ApiError> {
    let topic = first_present([fields.query_field("topic"), fields.body_field("topic")]);
    if topic.is_empty() {
        return Err(ApiError::bare(ErrorCode::MissingTopic));
    }
    let projection = ctx.orchestrator.project(&topic).await;
    Ok(SuccessEnvelope::new(projection, NoExtra {}))
}

fn gemini_failure(error: GeminiError) -> ApiError {
    match error {
        GeminiError::Upstream { status, message } => {
            ApiError::new(ErrorCode::UpstreamError, message).with_status(status)
        }
        error if error.is_empty_result() => empty_response(),
        other => ApiError::new(ErrorCode::RequestFailed, other.to_string()),
    }
}

fn empty_response() -> ApiError {
    ApiError::new(ErrorCode::EmptyResponse, "Gemini returned no data points.")
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
