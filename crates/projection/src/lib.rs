//! Deterministic advancement-curve math shared by the server and the client
//! orchestrator. Nothing in here performs I/O.

pub mod baseline;
pub mod curve;
pub mod normalize;
pub mod seed;
pub mod summary;
pub mod trends;

pub use baseline::{baseline_series, merge_with_baseline};
pub use curve::{
    anchored_params, default_params, shape_series, synthesize, synthesize_from, CurveParams,
};
pub use normalize::normalize;
pub use seed::derive_seed;
pub use summary::summarize;
pub use trends::interest_forecast;
