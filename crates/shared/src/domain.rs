use serde::{Deserialize, Serialize};

/// Upper bound for any advancement score a synthesized curve can emit.
pub const MAX_ADVANCEMENT: f64 = 1350.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: i32,
    pub advancement: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

impl ProjectionPoint {
    pub fn new(year: i32, advancement: f64) -> Self {
        Self {
            year,
            advancement,
            milestone: None,
        }
    }

    pub fn with_milestone(mut self, milestone: impl Into<String>) -> Self {
        self.milestone = Some(milestone.into());
        self
    }
}

/// One row of the baseline/projection outer join handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedFrame {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advancement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionSource {
    External,
    Generative,
    Synthesized,
}

impl ProjectionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Generative => "generative",
            Self::Synthesized => "synthesized",
        }
    }
}

/// How points returned by a live source are turned into the displayed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalPointPolicy {
    /// Anchor a synthesized curve on the first/last live points.
    #[default]
    AnchorAndExtend,
    /// Display the normalized live points unchanged.
    Verbatim,
}

impl ExternalPointPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "anchor_and_extend" | "anchor" | "extend" => Some(Self::AnchorAndExtend),
            "verbatim" | "raw" => Some(Self::Verbatim),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub delta: i64,
    pub velocity: i64,
    pub multiple: f64,
    pub horizon: i32,
    pub start_year: i32,
}

/// Everything the widget needs to render one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub topic: String,
    pub source: ProjectionSource,
    pub series: Vec<ProjectionPoint>,
    pub frame: Vec<MergedFrame>,
    pub summary: ProjectionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub audits_running: u32,
    pub deployments_today: u32,
    pub avg_time_to_value: f64,
    pub active_agents: u32,
    pub backlog: u32,
}
