//! Client for the Gemini `generateContent` API, narrowed to the one prompt the
//! projection widget needs: "give me a year-by-year advancement trajectory".

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use shared::domain::ProjectionPoint;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);
/// Upstream error bodies are cut to this many characters before surfacing.
pub const UPSTREAM_MESSAGE_LIMIT: usize = 512;

const SYSTEM_INSTRUCTION: [&str; 5] = [
    "You are a technology futurist and data analyst. Your task is to generate a projected growth trajectory for a specific field of Artificial Intelligence provided by the user.",
    "You must respond with only a JSON array of objects. Do not include any other text, explanation, or markdown formatting.",
    "Each object in the array represents a data point with a 'year', a numeric 'advancement' score (from 1 to 1000, where 1 is nascent and 1000 is transformative), and an optional 'milestone' string.",
    "The data should start from a plausible year of inception for the given topic and project about 15-20 years into the future.",
    "The growth curve should be exponential, reflecting the accelerating nature of AI development.",
];

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("gemini returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("gemini request timed out after {0:?}")]
    Timeout(Duration),
    #[error("gemini request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("gemini response contained no candidate text")]
    EmptyCandidates,
    #[error("gemini response is not a JSON trajectory: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl GeminiError {
    /// True when the call succeeded but produced nothing usable.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyCandidates | Self::InvalidJson(_))
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GeminiError::Transport)?;
        Ok(Self { http, config })
    }

    /// Same transport, different key. Used when a visitor brings their own.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        let mut config = self.config.clone();
        config.api_key = api_key.into();
        Self {
            http: self.http.clone(),
            config,
        }
    }

    /// Asks for a trajectory and returns the raw candidate text.
    pub async fn generate_text(&self, topic: &str) -> Result<String, GeminiError> {
        let response = self
            .http
            .post(self.config.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&build_request_body(topic))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    warn!(status = status.as_u16(), topic, %error, "gemini: failed to read error body");
                    String::new()
                }
            };
            warn!(status = status.as_u16(), topic, "gemini: upstream rejected request");
            return Err(GeminiError::Upstream {
                status: status.as_u16(),
                message: truncate_message(&body),
            });
        }

        let payload: Value = response.json().await.map_err(|e| self.transport_error(e))?;
        extract_candidate_text(&payload).ok_or(GeminiError::EmptyCandidates)
    }

    /// Fetches, parses and normalizes a trajectory for `topic`.
    pub async fn fetch_points(&self, topic: &str) -> Result<Vec<ProjectionPoint>, GeminiError> {
        let text = self.generate_text(topic).await?;
        let points = parse_points(&text)?;
        info!(topic, points = points.len(), "gemini: trajectory received");
        Ok(points)
    }

    fn transport_error(&self, error: reqwest::Error) -> GeminiError {
        if error.is_timeout() {
            GeminiError::Timeout(self.config.timeout)
        } else {
            GeminiError::Transport(error)
        }
    }
}

pub fn build_request_body(topic: &str) -> Value {
    json!({
        "systemInstruction": {
            "role": "system",
            "parts": [{ "text": SYSTEM_INSTRUCTION.join(" ") }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": format!("Generate the growth trajectory for: \"{topic}\"") }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "year": { "type": "NUMBER" },
                        "advancement": { "type": "NUMBER" },
                        "milestone": { "type": "STRING" }
                    },
                    "required": ["year", "advancement"]
                }
            }
        }
    })
}

/// Joins the text parts of every candidate; `None` when there is no text.
pub fn extract_candidate_text(payload: &Value) -> Option<String> {
    let candidates = payload.get("candidates")?.as_array()?;
    let text = candidates
        .iter()
        .filter_map(|candidate| candidate.pointer("/content/parts")?.as_array())
        .flatten()
        .map(|part| part.get("text").and_then(Value::as_str).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Removes a surrounding ```` ```json ```` fence if the model added one.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_points(text: &str) -> Result<Vec<ProjectionPoint>, GeminiError> {
    let parsed: Value =
        serde_json::from_str(strip_code_fences(text)).map_err(GeminiError::InvalidJson)?;
    Ok(projection::normalize(&parsed))
}

pub fn truncate_message(message: &str) -> String {
    message.chars().take(UPSTREAM_MESSAGE_LIMIT).collect()
}

#[cfg(test)]
#[path = "tests/gemini_tests.rs"]
mod tests;
