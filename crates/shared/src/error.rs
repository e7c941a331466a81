use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    MissingTopic,
    MethodNotAllowed,
    PayloadTooLarge,
    NoApiKey,
    UpstreamError,
    EmptyResponse,
    RequestFailed,
    ServerError,
}

impl ErrorCode {
    /// HTTP status the code is reported with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadRequest | Self::MissingTopic => 400,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge => 413,
            Self::NoApiKey => 503,
            Self::UpstreamError | Self::EmptyResponse => 502,
            Self::RequestFailed | Self::ServerError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            status: None,
        }
    }

    pub fn bare(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}
