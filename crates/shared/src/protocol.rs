use serde::{Deserialize, Serialize};

use crate::{
    domain::{Projection, ProjectionPoint, QueueSnapshot},
    error::ApiError,
};

/// `{ok:false, error:{...}}` body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ApiError,
}

impl From<ApiError> for ErrorEnvelope {
    fn from(error: ApiError) -> Self {
        Self { ok: false, error }
    }
}

/// `{ok:true, data, ...extra}` body; `extra` is flattened beside `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T, E = NoExtra> {
    pub ok: bool,
    pub data: T,
    #[serde(flatten)]
    pub extra: E,
}

impl<T, E> SuccessEnvelope<T, E> {
    pub fn new(data: T, extra: E) -> Self {
        Self {
            ok: true,
            data,
            extra,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoExtra {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicExtra {
    pub topic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyOrigin {
    UserKey,
    ServiceKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiProjectionExtra {
    pub topic: String,
    pub source: KeyOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildQueueExtra {
    pub refreshed_at: String,
}

pub type InterestTrendsResponse = SuccessEnvelope<Vec<ProjectionPoint>, TopicExtra>;
pub type GeminiProjectionResponse = SuccessEnvelope<Vec<ProjectionPoint>, GeminiProjectionExtra>;
pub type BuildQueueResponse = SuccessEnvelope<QueueSnapshot, BuildQueueExtra>;
pub type ProjectionResponse = SuccessEnvelope<Projection>;
