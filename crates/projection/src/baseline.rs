use std::collections::BTreeMap;

use shared::domain::{MergedFrame, ProjectionPoint};

/// Generic industry trend line drawn behind every topic.
const BASELINE: [(i32, f64); 11] = [
    (2010, 5.0),
    (2012, 10.0),
    (2014, 20.0),
    (2016, 35.0),
    (2018, 60.0),
    (2020, 100.0),
    (2022, 180.0),
    (2024, 300.0),
    (2026, 500.0),
    (2028, 800.0),
    (2030, 1000.0),
];

pub fn baseline_series() -> &'static [(i32, f64)] {
    &BASELINE
}

/// Full outer join of the baseline and `series` on year, ascending.
///
/// Rows present on one side only leave the other value empty; the chart
/// bridges those gaps. If `series` repeats a year, the later point wins.
pub fn merge_with_baseline(series: &[ProjectionPoint]) -> Vec<MergedFrame> {
    let mut rows: BTreeMap<i32, MergedFrame> = BTreeMap::new();

    for &(year, value) in baseline_series() {
        rows.entry(year).or_insert_with(|| empty_row(year)).baseline = Some(value);
    }

    for point in series {
        let row = rows.entry(point.year).or_insert_with(|| empty_row(point.year));
        row.advancement = Some(point.advancement);
        row.milestone = point.milestone.clone();
    }

    rows.into_values().collect()
}

fn empty_row(year: i32) -> MergedFrame {
    MergedFrame {
        year,
        baseline: None,
        advancement: None,
        milestone: None,
    }
}

#[cfg(test)]
#[path = "tests/baseline_tests.rs"]
mod tests;
