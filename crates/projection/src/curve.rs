use shared::domain::{ExternalPointPolicy, ProjectionPoint, MAX_ADVANCEMENT};

use crate::seed::derive_seed;

/// Minimum distance between the start value and the clipped target.
const MIN_TARGET_LIFT: f64 = 320.0;
const DEFAULT_SPAN: usize = 15;
const ANCHORED_MIN_SPAN: usize = 14;
const ANCHORED_EXTRA_YEARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub start_year: i32,
    pub span: usize,
    pub start_value: f64,
    pub target_value: f64,
}

/// Builds a seeded logistic curve of `params.span` yearly points.
///
/// Steepness and midpoint are perturbed by the topic seed and a small
/// sin/cos jitter is layered on top, so the same topic always renders the
/// same shape. Scores are rounded and clamped to `0..=1350`. Up to three
/// points carry a milestone: ~18% and ~52% through the span and the final
/// year; when two of those indices coincide the earlier label wins.
pub fn synthesize(topic: &str, params: &CurveParams) -> Vec<ProjectionPoint> {
    let span = params.span;
    let seed = derive_seed(topic);
    let start_value = params.start_value;
    let target = params
        .target_value
        .max(start_value + MIN_TARGET_LIFT)
        .min(MAX_ADVANCEMENT);
    let steepness = 5.2 + (seed % 25) as f64 / 6.0;
    let midpoint = 0.33 + (seed % 40) as f64 / 170.0;
    let logistic = |progress: f64| 1.0 / (1.0 + (-steepness * (progress - midpoint)).exp());

    let pilot_index = milestone_index(span, 0.18);
    let default_index = milestone_index(span, 0.52);
    let seed_f = seed as f64;

    (0..span)
        .map(|index| {
            let i = index as f64;
            let progress = i / (span.saturating_sub(1).max(1)) as f64;
            let base = start_value + logistic(progress) * (target - start_value);
            let jitter = (seed_f + i * 1.72).sin() * 12.0 + (seed_f / 3.0 + i * 0.6).cos() * 6.0;
            let advancement = (base + jitter).round().clamp(0.0, MAX_ADVANCEMENT);

            let milestone = if index == pilot_index {
                Some(format!("{topic} pilots trigger board-level urgency."))
            } else if index == default_index {
                Some(format!("{topic} becomes a cross-industry default."))
            } else if index + 1 == span {
                Some(format!("{topic} rewires operating models globally."))
            } else {
                None
            };

            ProjectionPoint {
                year: params.start_year + index as i32,
                advancement,
                milestone,
            }
        })
        .collect()
}

fn milestone_index(span: usize, fraction: f64) -> usize {
    (span as f64 * fraction).round() as usize
}

/// Parameters for a topic with no live data.
pub fn default_params(topic: &str, current_year: i32) -> CurveParams {
    let seed = derive_seed(topic);
    CurveParams {
        start_year: current_year - 4 + (seed % 3) as i32,
        span: DEFAULT_SPAN,
        start_value: 60.0 + (seed % 40) as f64,
        target_value: 1080.0 + (seed % 180) as f64,
    }
}

/// Parameters for a forward-looking curve anchored on live points.
///
/// The curve starts at the earliest point's year, slightly below its score,
/// and runs at least six years past the supplied data. Returns `None` for an
/// empty slice.
pub fn anchored_params(points: &[ProjectionPoint]) -> Option<CurveParams> {
    let first = points.iter().min_by_key(|point| point.year)?;
    let last = points.iter().max_by_key(|point| point.year)?;

    let start_value = (first.advancement * 0.85).round().max(30.0);
    let target_value = (start_value + 380.0).max((last.advancement * 1.65 + 180.0).round());
    Some(CurveParams {
        start_year: first.year,
        span: (points.len() + ANCHORED_EXTRA_YEARS).max(ANCHORED_MIN_SPAN),
        start_value,
        target_value,
    })
}

/// Anchors on `points` when there are any, otherwise falls back to the
/// topic's default curve.
pub fn synthesize_from(
    topic: &str,
    points: &[ProjectionPoint],
    current_year: i32,
) -> Vec<ProjectionPoint> {
    let params = anchored_params(points).unwrap_or_else(|| default_params(topic, current_year));
    synthesize(topic, &params)
}

/// Turns normalized live points into the series that gets displayed.
pub fn shape_series(
    topic: &str,
    points: Vec<ProjectionPoint>,
    policy: ExternalPointPolicy,
    current_year: i32,
) -> Vec<ProjectionPoint> {
    match policy {
        ExternalPointPolicy::Verbatim if !points.is_empty() => points,
        _ => synthesize_from(topic, &points, current_year),
    }
}

#[cfg(test)]
#[path = "tests/curve_tests.rs"]
mod tests;
