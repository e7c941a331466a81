use serde_json::Value;
use shared::domain::ProjectionPoint;

/// Converts an arbitrary JSON payload into sorted projection points.
///
/// Accepts a bare array or an object carrying a `data` array; any other shape
/// yields an empty vector. Entries whose `year` or `advancement` cannot be
/// coerced to a finite number are dropped. The sort is stable and duplicate
/// years are kept.
pub fn normalize(payload: &Value) -> Vec<ProjectionPoint> {
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut points: Vec<ProjectionPoint> = entries.iter().filter_map(normalize_entry).collect();
    points.sort_by_key(|point| point.year);
    points
}

fn normalize_entry(entry: &Value) -> Option<ProjectionPoint> {
    let record = entry.as_object()?;
    let year = coerce_number(record.get("year")?)?.round();
    if year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return None;
    }
    let advancement = coerce_number(record.get("advancement")?)?;

    let milestone = record
        .get("milestone")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    Some(ProjectionPoint {
        year: year as i32,
        advancement,
        milestone,
    })
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok()?
        }
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
