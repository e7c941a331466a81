use std::{collections::HashMap, fs, time::Duration};

use client_core::OrchestratorConfig;
use gemini_integration::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use shared::domain::ExternalPointPolicy;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_bind: String,
    /// Public origin of the site; relative growth feed urls resolve against it.
    pub server_public_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub gemini_timeout_secs: u64,
    pub growth_api_url: Option<String>,
    pub feed_timeout_secs: u64,
    pub external_policy: ExternalPointPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            server_public_url: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.into(),
            gemini_api_base: DEFAULT_API_BASE.into(),
            gemini_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            growth_api_url: None,
            feed_timeout_secs: client_core::DEFAULT_FEED_TIMEOUT.as_secs(),
            external_policy: ExternalPointPolicy::default(),
        }
    }
}

impl Settings {
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone().unwrap_or_default(),
            model: self.gemini_model.clone(),
            api_base: self.gemini_api_base.clone(),
            timeout: Duration::from_secs(self.gemini_timeout_secs),
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            growth_api_url: self.growth_api_url.clone(),
            site_origin: self.server_public_url.clone(),
            feed_timeout: Some(Duration::from_secs(self.feed_timeout_secs)),
            gemini: self.gemini_api_key.as_ref().map(|_| self.gemini_config()),
            policy: self.external_policy,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `server.toml` table, then environment variables.
pub fn settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => apply(&mut settings, |key| file_cfg.get(key).cloned()),
            Err(error) => warn!(%error, "ignoring unreadable server.toml"),
        }
    }

    apply(&mut settings, |key| {
        let plain = match key {
            "bind_addr" => env("SERVER_BIND"),
            "server_public_url" => env("SERVER_PUBLIC_URL"),
            "gemini_api_key" => env("GEMINI_API_KEY"),
            "growth_api_url" => env("GROWTH_API_URL"),
            _ => None,
        };
        env(&format!("APP__{}", key.to_ascii_uppercase())).or(plain)
    });

    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("bind_addr").and_then(non_blank) {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("server_public_url") {
        settings.server_public_url = non_blank(v);
    }
    if let Some(v) = lookup("gemini_api_key") {
        settings.gemini_api_key = non_blank(v);
    }
    if let Some(v) = lookup("gemini_model").and_then(non_blank) {
        settings.gemini_model = v;
    }
    if let Some(v) = lookup("gemini_api_base").and_then(non_blank) {
        settings.gemini_api_base = v;
    }
    if let Some(v) = lookup("growth_api_url") {
        settings.growth_api_url = non_blank(v);
    }
    if let Some(v) = lookup("gemini_timeout_secs") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.gemini_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring invalid gemini_timeout_secs"),
        }
    }
    if let Some(v) = lookup("feed_timeout_secs") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.feed_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring invalid feed_timeout_secs"),
        }
    }
    if let Some(v) = lookup("external_policy") {
        match ExternalPointPolicy::parse(&v) {
            Some(policy) => settings.external_policy = policy,
            None => warn!(value = %v, "ignoring unknown external_policy"),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
