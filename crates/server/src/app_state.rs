use std::sync::Arc;

use anyhow::Context;
use client_core::ProjectionOrchestrator;
use gemini_integration::GeminiClient;
use server_api::ApiContext;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let gemini = GeminiClient::new(settings.gemini_config())
            .context("failed to build gemini client")?;
        let orchestrator = ProjectionOrchestrator::from_config(settings.orchestrator_config())?;
        Ok(Self {
            api: ApiContext {
                gemini,
                service_key: settings.gemini_api_key.clone(),
                policy: settings.external_policy,
                orchestrator: Arc::new(orchestrator),
            },
        })
    }
}
