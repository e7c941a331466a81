use serde_json::{Map, Value};
use url::form_urlencoded;

/// String parameters gathered from a query string and an optional body.
///
/// Bodies may be JSON, url-encoded forms, or untyped text holding a JSON
/// object. Anything else is ignored rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct RequestFields {
    query: Map<String, Value>,
    body: Option<Map<String, Value>>,
}

impl RequestFields {
    pub fn from_parts(query: Option<&str>, content_type: Option<&str>, body: &[u8]) -> Self {
        Self {
            query: query.map(parse_pairs).unwrap_or_default(),
            body: parse_body(content_type.unwrap_or_default(), body),
        }
    }

    pub fn query_field(&self, key: &str) -> String {
        self.query.get(key).map(coerce_string).unwrap_or_default()
    }

    pub fn body_field(&self, key: &str) -> String {
        self.body
            .as_ref()
            .and_then(|body| body.get(key))
            .map(coerce_string)
            .unwrap_or_default()
    }
}

/// First non-empty value among `candidates`, or an empty string.
pub fn first_present(candidates: impl IntoIterator<Item = String>) -> String {
    candidates
        .into_iter()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

fn parse_pairs(raw: &str) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        map.entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    map
}

fn parse_body(content_type: &str, body: &[u8]) -> Option<Map<String, Value>> {
    if body.is_empty() {
        return None;
    }
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("application/x-www-form-urlencoded") {
        let raw = std::str::from_utf8(body).ok()?;
        let map = parse_pairs(raw);
        return (!map.is_empty()).then_some(map);
    }
    if content_type.contains("multipart/form-data") {
        return None;
    }

    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .find_map(Value::as_str)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
