mod classifier;
mod growth;
mod metrics;
mod rounding;
mod slug;
mod types;

pub use classifier::classify;
pub use growth::{annuity_value, compound_annually, future_value, required_monthly};
pub use metrics::{
    AssetAllocation, Baseline, BaselineFigures, DerivedMetricsBag, MarketAssumptions,
    MetricValue, RiskCategory, RiskLevel, derive_metrics, derive_metrics_from_baseline,
    milestone_value, success_rate,
};
pub use rounding::{round_tenth, round_to, tenth_string};
pub use slug::{decode as decode_slug, encode as encode_slug, rounded as rounded_inputs, to_params};
pub use types::{CalculatorInputs, GoalTag, MAX_TIME_HORIZON, ScenarioParams};
