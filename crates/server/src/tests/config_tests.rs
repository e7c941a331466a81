use super::*;

fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = settings_from(None, |_| None);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.gemini_timeout_secs, 12);
    assert!(settings.gemini_api_key.is_none());
    assert_eq!(settings.external_policy, ExternalPointPolicy::AnchorAndExtend);
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
bind_addr = "0.0.0.0:9000"
growth_api_url = "/api/growth"
gemini_model = "gemini-pro"
external_policy = "verbatim"
gemini_timeout_secs = "30"
"#;
    let settings = settings_from(Some(file), |_| None);
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.growth_api_url.as_deref(), Some("/api/growth"));
    assert_eq!(settings.gemini_model, "gemini-pro");
    assert_eq!(settings.external_policy, ExternalPointPolicy::Verbatim);
    assert_eq!(settings.gemini_timeout_secs, 30);
}

#[test]
fn env_overrides_file_and_prefixed_keys_win() {
    let file = r#"bind_addr = "0.0.0.0:9000""#;
    let env = env_from(&[
        ("SERVER_BIND", "127.0.0.1:7000"),
        ("GEMINI_API_KEY", "plain-key"),
        ("APP__GEMINI_API_KEY", "prefixed-key"),
        ("APP__FEED_TIMEOUT_SECS", "4"),
    ]);
    let settings = settings_from(Some(file), env);
    assert_eq!(settings.server_bind, "127.0.0.1:7000");
    assert_eq!(settings.gemini_api_key.as_deref(), Some("prefixed-key"));
    assert_eq!(settings.feed_timeout_secs, 4);
}

#[test]
fn blank_values_mean_not_configured() {
    let file = r#"growth_api_url = "https://feed.example/growth""#;
    let env = env_from(&[("GEMINI_API_KEY", "   "), ("GROWTH_API_URL", "")]);
    let settings = settings_from(Some(file), env);
    assert!(settings.gemini_api_key.is_none());
    assert!(settings.growth_api_url.is_none());
    assert!(settings.orchestrator_config().gemini.is_none());
}

#[test]
fn invalid_values_are_ignored() {
    let env = env_from(&[
        ("APP__EXTERNAL_POLICY", "sideways"),
        ("APP__GEMINI_TIMEOUT_SECS", "soon"),
        ("APP__FEED_TIMEOUT_SECS", "0"),
    ]);
    let settings = settings_from(Some("not = [valid"), env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn orchestrator_config_carries_sources() {
    let env = env_from(&[
        ("GEMINI_API_KEY", "k"),
        ("GROWTH_API_URL", "/growth"),
        ("SERVER_PUBLIC_URL", "https://site.example"),
    ]);
    let settings = settings_from(None, env);
    let config = settings.orchestrator_config();
    assert_eq!(config.growth_api_url.as_deref(), Some("/growth"));
    assert_eq!(config.site_origin.as_deref(), Some("https://site.example"));
    assert_eq!(config.feed_timeout, Some(Duration::from_secs(10)));
    let gemini = config.gemini.expect("gemini config");
    assert_eq!(gemini.api_key, "k");
    assert_eq!(gemini.timeout, Duration::from_secs(12));
}
