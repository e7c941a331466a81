use super::*;

fn params(span: usize) -> CurveParams {
    CurveParams {
        start_year: 2020,
        span,
        start_value: 90.0,
        target_value: 1100.0,
    }
}

fn milestone_positions(points: &[ProjectionPoint]) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| point.milestone.is_some())
        .map(|(index, _)| index)
        .collect()
}

#[test]
fn emits_one_point_per_year_of_span() {
    let points = synthesize("Quantum Computing", &params(15));
    assert_eq!(points.len(), 15);
    for (index, point) in points.iter().enumerate() {
        assert_eq!(point.year, 2020 + index as i32);
    }
}

#[test]
fn scores_stay_within_bounds() {
    for topic in ["", "AI", "Quantum Computing", "Robotics Process Automation"] {
        let points = synthesize(
            topic,
            &CurveParams {
                start_year: 2000,
                span: 30,
                start_value: 0.0,
                target_value: 5_000.0,
            },
        );
        for point in &points {
            assert!(
                (0.0..=MAX_ADVANCEMENT).contains(&point.advancement),
                "{topic}: {} out of range",
                point.advancement
            );
            assert_eq!(point.advancement, point.advancement.round());
        }
    }
}

#[test]
fn milestones_land_on_fixed_relative_indices() {
    let points = synthesize("Edge Vision", &params(15));
    // round(15 * 0.18) = 3, round(15 * 0.52) = 8, last = 14
    assert_eq!(milestone_positions(&points), vec![3, 8, 14]);
    assert_eq!(
        points[3].milestone.as_deref(),
        Some("Edge Vision pilots trigger board-level urgency.")
    );
    assert_eq!(
        points[8].milestone.as_deref(),
        Some("Edge Vision becomes a cross-industry default.")
    );
    assert_eq!(
        points[14].milestone.as_deref(),
        Some("Edge Vision rewires operating models globally.")
    );
}

#[test]
fn coinciding_milestone_indices_collapse() {
    assert_eq!(milestone_positions(&synthesize("x", &params(1))), vec![0]);
    assert_eq!(milestone_positions(&synthesize("x", &params(2))), vec![0, 1]);
    assert_eq!(milestone_positions(&synthesize("x", &params(3))), vec![1, 2]);
    assert_eq!(milestone_positions(&synthesize("x", &params(4))), vec![1, 2, 3]);

    let single = synthesize("x", &params(1));
    assert_eq!(
        single[0].milestone.as_deref(),
        Some("x pilots trigger board-level urgency.")
    );
}

#[test]
fn empty_span_yields_empty_series() {
    assert!(synthesize("anything", &params(0)).is_empty());
}

#[test]
fn same_topic_renders_same_curve() {
    let first = synthesize("Generative Design Agents", &params(14));
    let second = synthesize("Generative Design Agents", &params(14));
    assert_eq!(first, second);
    assert_ne!(first, synthesize("Generative Design Agent", &params(14)));
}

#[test]
fn curve_rises_with_only_small_dips() {
    for topic in ["Quantum Computing", "AI in Healthcare", "Agentic SaaS"] {
        let points = synthesize_from(topic, &[], 2026);
        assert!(points.last().expect("last").advancement > points[0].advancement + 500.0);
        for pair in points.windows(2) {
            assert!(
                pair[1].advancement - pair[0].advancement >= -40.0,
                "{topic}: dip from {} to {}",
                pair[0].advancement,
                pair[1].advancement
            );
        }
    }
}

#[test]
fn default_params_follow_topic_seed() {
    let topic = "Foo";
    let seed = derive_seed(topic); // 292
    let params = default_params(topic, 2026);
    assert_eq!(params.start_year, 2026 - 4 + (seed % 3) as i32);
    assert_eq!(params.span, 15);
    assert_eq!(params.start_value, 60.0 + (seed % 40) as f64);
    assert_eq!(params.target_value, 1080.0 + (seed % 180) as f64);
}

#[test]
fn anchored_params_extend_past_live_points() {
    let points = vec![
        ProjectionPoint::new(2022, 200.0),
        ProjectionPoint::new(2020, 100.0),
    ];
    let params = anchored_params(&points).expect("params");
    assert_eq!(
        params,
        CurveParams {
            start_year: 2020,
            span: 14,
            start_value: 85.0,
            target_value: 510.0,
        }
    );
}

#[test]
fn anchored_params_floor_start_and_lift_target() {
    let points = vec![ProjectionPoint::new(2019, 10.0); 10];
    let params = anchored_params(&points).expect("params");
    assert_eq!(params.start_value, 30.0);
    assert_eq!(params.target_value, 410.0);
    assert_eq!(params.span, 16);
}

#[test]
fn synthesize_from_without_points_uses_defaults() {
    let topic = "Quantum Computing";
    assert_eq!(
        synthesize_from(topic, &[], 2026),
        synthesize(topic, &default_params(topic, 2026))
    );
    assert!(anchored_params(&[]).is_none());
}

#[test]
fn verbatim_policy_keeps_live_points() {
    let live = vec![
        ProjectionPoint::new(2020, 100.0),
        ProjectionPoint::new(2021, 150.0),
    ];
    let shaped = shape_series("Foo", live.clone(), ExternalPointPolicy::Verbatim, 2026);
    assert_eq!(shaped, live);

    let extended = shape_series("Foo", live, ExternalPointPolicy::AnchorAndExtend, 2026);
    assert_eq!(extended.len(), 14);
    assert_eq!(extended[0].year, 2020);
}

#[test]
fn verbatim_policy_without_points_still_synthesizes() {
    let shaped = shape_series("Foo", Vec::new(), ExternalPointPolicy::Verbatim, 2026);
    assert_eq!(shaped.len(), 15);
}
