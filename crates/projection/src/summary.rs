use shared::domain::{ProjectionPoint, ProjectionSummary};

/// Headline numbers shown beside the chart: total change, change over the
/// last step, growth multiple and horizon.
pub fn summarize(series: &[ProjectionPoint], current_year: i32) -> ProjectionSummary {
    let mut sorted: Vec<&ProjectionPoint> = series.iter().collect();
    sorted.sort_by_key(|point| point.year);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return ProjectionSummary {
            delta: 0,
            velocity: 0,
            multiple: 1.0,
            horizon: current_year,
            start_year: current_year,
        };
    };
    let previous = sorted[sorted.len().saturating_sub(2)];

    // Zero scores are treated as missing, as the widget always did.
    let start_value = nonzero_or(first.advancement, 1.0);
    let end_value = nonzero_or(last.advancement, start_value);
    let previous_value = nonzero_or(previous.advancement, start_value);

    let multiple = ((end_value / start_value.max(1.0)) * 10.0).round() / 10.0;

    ProjectionSummary {
        delta: (end_value - start_value).round() as i64,
        velocity: (end_value - previous_value).round() as i64,
        multiple: multiple.max(0.0),
        horizon: last.year,
        start_year: first.year,
    }
}

fn nonzero_or(value: f64, fallback: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_summarises_to_current_year() {
        let summary = summarize(&[], 2026);
        assert_eq!(summary.delta, 0);
        assert_eq!(summary.multiple, 1.0);
        assert_eq!(summary.horizon, 2026);
        assert_eq!(summary.start_year, 2026);
    }

    #[test]
    fn summary_uses_first_last_and_previous_points() {
        let series = vec![
            ProjectionPoint::new(2030, 1000.0),
            ProjectionPoint::new(2020, 100.0),
            ProjectionPoint::new(2029, 940.0),
        ];
        let summary = summarize(&series, 2026);
        assert_eq!(summary.delta, 900);
        assert_eq!(summary.velocity, 60);
        assert_eq!(summary.multiple, 10.0);
        assert_eq!(summary.start_year, 2020);
        assert_eq!(summary.horizon, 2030);
    }

    #[test]
    fn single_point_has_no_velocity() {
        let summary = summarize(&[ProjectionPoint::new(2024, 250.0)], 2026);
        assert_eq!(summary.delta, 0);
        assert_eq!(summary.velocity, 0);
        assert_eq!(summary.multiple, 1.0);
    }
}
