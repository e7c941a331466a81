use shared::domain::ProjectionPoint;

use crate::seed::derive_seed;

const FORECAST_POINTS: usize = 6;
const FLOOR: f64 = 5.0;

/// Short six-year "interest trend" centred on the current year.
///
/// Milestones sit on the second and the second-to-last points; when a Gemini
/// key is configured the final point advertises the richer projection.
pub fn interest_forecast(topic: &str, current_year: i32, gemini_enabled: bool) -> Vec<ProjectionPoint> {
    let seed = derive_seed(topic);
    let amplitude = 12.0 + (seed % 9) as f64;

    (0..FORECAST_POINTS)
        .map(|index| {
            let i = index as f64;
            let baseline = 55.0 + i * 18.0;
            let variance = ((seed as f64 + i * 3.0) * 0.37).sin() * amplitude;
            let advancement = (baseline + variance).round().max(FLOOR);

            let milestone = if index == 1 {
                Some(format!("Research renaissance for {topic}"))
            } else if index == FORECAST_POINTS - 2 {
                Some(format!("Adoption curve inflection for {topic}"))
            } else if gemini_enabled && index == FORECAST_POINTS - 1 {
                Some("Gemini-enhanced projection ready".to_string())
            } else {
                None
            };

            ProjectionPoint {
                year: current_year - 2 + index as i32,
                advancement,
                milestone,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_spans_six_years_around_now() {
        let points = interest_forecast("Foo", 2026, false);
        let years: Vec<i32> = points.iter().map(|p| p.year).collect();
        assert_eq!(years, (2024..=2029).collect::<Vec<_>>());
        assert!(points.iter().all(|p| p.advancement >= FLOOR));
    }

    #[test]
    fn milestones_mark_second_and_penultimate_points() {
        let points = interest_forecast("Foo", 2026, false);
        assert_eq!(
            points[1].milestone.as_deref(),
            Some("Research renaissance for Foo")
        );
        assert_eq!(
            points[4].milestone.as_deref(),
            Some("Adoption curve inflection for Foo")
        );
        assert_eq!(points[5].milestone, None);

        let with_key = interest_forecast("Foo", 2026, true);
        assert_eq!(
            with_key[5].milestone.as_deref(),
            Some("Gemini-enhanced projection ready")
        );
    }
}
