use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::growth::{
    annuity_value, compound_annually, doubling_years, future_value, required_monthly,
};
use super::rounding::round_tenth;
use super::types::CalculatorInputs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketAssumptions {
    pub current_inflation: f64,
    pub historical_average_return: f64,
    pub safe_withdrawal_rate: f64,
    pub advisory_fee_rate: f64,
    pub tax_advantaged_annual_cap: f64,
    pub marginal_tax_rate: f64,
    pub min_increased_contribution: f64,
    pub min_reduced_contribution: f64,
    pub millionaire_target: f64,
    pub milestone_ladder: Vec<f64>,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            current_inflation: 3.0,
            historical_average_return: 10.0,
            safe_withdrawal_rate: 4.0,
            advisory_fee_rate: 1.0,
            tax_advantaged_annual_cap: 23_000.0,
            marginal_tax_rate: 22.0,
            min_increased_contribution: 100.0,
            min_reduced_contribution: 50.0,
            millionaire_target: 1_000_000.0,
            milestone_ladder: vec![
                10_000.0,
                25_000.0,
                50_000.0,
                100_000.0,
                250_000.0,
                500_000.0,
                1_000_000.0,
                2_500_000.0,
                5_000_000.0,
                10_000_000.0,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Currency(f64),
    Percent(f64),
    Count(f64),
    Label(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Currency(v) | MetricValue::Percent(v) | MetricValue::Count(v) => Some(*v),
            MetricValue::Label(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedMetricsBag {
    values: BTreeMap<String, MetricValue>,
}

impl DerivedMetricsBag {
    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.values.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetricValue::as_number)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            MetricValue::Label(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn currency(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_string(), MetricValue::Currency(value));
    }

    fn percent(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), MetricValue::Percent(value));
    }

    fn count(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), MetricValue::Count(value));
    }

    fn label_value(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_string(), MetricValue::Label(value.into()));
    }
}

/// Baseline figures a caller may already hold; missing ones are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaselineFigures {
    pub future_value: Option<f64>,
    pub total_contributions: Option<f64>,
    pub total_gains: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub future_value: f64,
    pub total_contributions: f64,
    pub total_gains: f64,
}

impl BaselineFigures {
    pub fn resolve(self, inputs: &CalculatorInputs) -> Baseline {
        let future_value = self.future_value.unwrap_or_else(|| {
            future_value(
                inputs.initial_amount,
                inputs.monthly_contribution,
                inputs.annual_return,
                inputs.time_horizon,
            )
        });
        let total_contributions = self
            .total_contributions
            .unwrap_or_else(|| inputs.total_contributions());
        let total_gains = self
            .total_gains
            .unwrap_or(future_value - total_contributions);
        Baseline {
            future_value,
            total_contributions,
            total_gains,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskCategory {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskCategory {
    pub fn for_return(annual_return: f64) -> Self {
        if annual_return <= 5.0 {
            RiskCategory::Conservative
        } else if annual_return >= 10.0 {
            RiskCategory::Aggressive
        } else {
            RiskCategory::Moderate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Conservative => "conservative",
            RiskCategory::Moderate => "moderate",
            RiskCategory::Aggressive => "aggressive",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn for_return(annual_return: f64) -> Self {
        if annual_return <= 4.0 {
            RiskLevel::VeryLow
        } else if annual_return <= 6.0 {
            RiskLevel::Low
        } else if annual_return <= 8.0 {
            RiskLevel::Medium
        } else if annual_return <= 10.0 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very-low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very-high",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AssetAllocation {
    pub stock: u32,
    pub bond: u32,
    pub alternative: u32,
}

impl AssetAllocation {
    pub fn for_horizon(years: u32) -> Self {
        let mut stock = 100u32.saturating_sub(years).min(90);
        let mut bond = years.min(40);
        let mut alternative = 100u32.saturating_sub(stock + bond);

        let total = stock + bond + alternative;
        if total != 100 {
            let largest = if stock >= bond && stock >= alternative {
                &mut stock
            } else if bond >= alternative {
                &mut bond
            } else {
                &mut alternative
            };
            *largest = (*largest + 100).saturating_sub(total);
        }

        Self {
            stock,
            bond,
            alternative,
        }
    }
}

pub fn success_rate(annual_return: f64) -> f64 {
    (95.0 - (annual_return - 6.0).max(0.0) * 5.0).clamp(60.0, 95.0)
}

pub fn expected_market_cycles(years: u32) -> u32 {
    ((years as f64 / 7.0).round() as u32).max(1)
}

/// Lump sum compounded yearly while monthly deposits compound monthly.
pub fn milestone_value(inputs: &CalculatorInputs, years: u32) -> f64 {
    compound_annually(inputs.initial_amount, inputs.annual_return, years)
        + annuity_value(
            inputs.monthly_contribution,
            inputs.annual_return,
            years.saturating_mul(12),
        )
}

pub fn derive_metrics(
    inputs: &CalculatorInputs,
    current_future_value: Option<f64>,
    assumptions: &MarketAssumptions,
) -> DerivedMetricsBag {
    let baseline = BaselineFigures {
        future_value: current_future_value,
        ..BaselineFigures::default()
    }
    .resolve(inputs);
    derive_metrics_from_baseline(inputs, &baseline, assumptions)
}

pub fn derive_metrics_from_baseline(
    inputs: &CalculatorInputs,
    baseline: &Baseline,
    assumptions: &MarketAssumptions,
) -> DerivedMetricsBag {
    let mut bag = DerivedMetricsBag::default();
    let rate = inputs.annual_return;
    let years = inputs.time_horizon;
    let fv_at = |monthly: f64, rate: f64, years: u32| {
        future_value(inputs.initial_amount, monthly, rate, years)
    };

    insert_baseline(&mut bag, inputs, baseline);
    insert_milestones(&mut bag, inputs, baseline, assumptions);

    let increased = (inputs.monthly_contribution * 1.5).max(assumptions.min_increased_contribution);
    let increased_value = fv_at(increased, rate, years);
    bag.currency("increasedContributionAmount", increased);
    bag.currency(
        "extraMonthlyContribution",
        increased - inputs.monthly_contribution,
    );
    bag.currency("increasedContributionValue", increased_value);
    bag.currency(
        "increasedContributionGain",
        increased_value - baseline.future_value,
    );

    let reduced = reduced_contribution(inputs.monthly_contribution, assumptions);
    let reduced_value = fv_at(reduced, rate, years);
    bag.currency("reducedContributionAmount", reduced);
    bag.currency("reducedContributionValue", reduced_value);
    bag.currency("reducedContributionLoss", baseline.future_value - reduced_value);

    let longer = years.saturating_add(5);
    let longer_value = fv_at(inputs.monthly_contribution, rate, longer);
    bag.count("longerTimeline", longer as f64);
    bag.currency("longerTimelineValue", longer_value);
    bag.currency("longerTimelineGain", longer_value - baseline.future_value);

    let shorter = years.saturating_sub(5).max(1);
    let shorter_value = fv_at(inputs.monthly_contribution, rate, shorter);
    bag.count("shorterTimeline", shorter as f64);
    bag.currency("shorterTimelineValue", shorter_value);
    bag.currency("shorterTimelineLoss", baseline.future_value - shorter_value);

    let higher_rate = rate + 2.0;
    let higher_value = fv_at(inputs.monthly_contribution, higher_rate, years);
    bag.percent("higherReturnRate", higher_rate);
    bag.currency("higherReturnValue", higher_value);
    bag.currency("higherReturnGain", higher_value - baseline.future_value);

    let lower_rate = (rate - 2.0).max(0.0);
    let lower_value = fv_at(inputs.monthly_contribution, lower_rate, years);
    bag.percent("lowerReturnRate", lower_rate);
    bag.currency("lowerReturnValue", lower_value);
    bag.currency("lowerReturnLoss", baseline.future_value - lower_value);

    let lump_sum = compound_annually(baseline.total_contributions, rate, years);
    bag.currency("lumpSumValue", lump_sum);
    bag.currency("lumpSumDifferenceAmount", lump_sum - baseline.future_value);

    bag.label_value("riskCategory", RiskCategory::for_return(rate).as_str());
    bag.label_value("riskLevel", RiskLevel::for_return(rate).as_str());
    bag.percent("volatilityLow", (rate - 3.0).max(2.0));
    bag.percent("volatilityHigh", rate + 5.0);
    bag.currency(
        "pessimisticValue",
        fv_at(inputs.monthly_contribution, (rate - 3.0).max(0.0), years),
    );
    bag.currency(
        "optimisticValue",
        fv_at(inputs.monthly_contribution, rate + 3.0, years),
    );

    insert_market_context(&mut bag, inputs, baseline, assumptions);

    let allocation = AssetAllocation::for_horizon(years);
    bag.percent("stockAllocation", allocation.stock as f64);
    bag.percent("bondAllocation", allocation.bond as f64);
    bag.percent("alternativeAllocation", allocation.alternative as f64);

    insert_optimization(&mut bag, inputs, baseline, assumptions);
    bag
}

// The floor never lifts the reduced contribution above the current one.
fn reduced_contribution(monthly: f64, assumptions: &MarketAssumptions) -> f64 {
    let reduced = monthly * 0.75;
    let floored = reduced.max(assumptions.min_reduced_contribution);
    if floored > monthly { reduced } else { floored }
}

fn insert_baseline(bag: &mut DerivedMetricsBag, inputs: &CalculatorInputs, baseline: &Baseline) {
    bag.currency("futureValue", baseline.future_value);
    bag.currency("totalContributions", baseline.total_contributions);
    bag.currency("totalGains", baseline.total_gains);
    bag.currency(
        "annualContributionAmount",
        inputs.monthly_contribution * 12.0,
    );

    let (growth_percent, multiple) = if baseline.total_contributions > 0.0 {
        (
            baseline.total_gains / baseline.total_contributions * 100.0,
            baseline.future_value / baseline.total_contributions,
        )
    } else {
        (0.0, 1.0)
    };
    bag.percent("growthPercent", growth_percent);
    bag.count("growthMultiple", round_tenth(multiple));

    let contribution_share = if baseline.future_value > 0.0 {
        (baseline.total_contributions / baseline.future_value * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };
    bag.percent("contributionSharePercent", contribution_share);
    bag.percent("interestSharePercent", 100.0 - contribution_share);
}

fn insert_milestones(
    bag: &mut DerivedMetricsBag,
    inputs: &CalculatorInputs,
    baseline: &Baseline,
    assumptions: &MarketAssumptions,
) {
    bag.currency("fiveYearValue", milestone_value(inputs, 5));
    bag.currency("tenYearValue", milestone_value(inputs, 10));

    let (target, timeframe) = milestone_target(inputs, baseline, &assumptions.milestone_ladder);
    bag.currency("milestoneTarget", target);
    bag.count("milestoneTimeframe", timeframe as f64);

    match doubling_years(inputs.annual_return) {
        Some(doubling) => bag.count("doublingTimeline", round_tenth(doubling)),
        None => bag.label_value("doublingTimeline", "n/a"),
    }
}

/// Highest rung of the ladder the baseline reaches, and the first whole year
/// it gets there. Falls back to the baseline itself at the full horizon.
fn milestone_target(inputs: &CalculatorInputs, baseline: &Baseline, ladder: &[f64]) -> (f64, u32) {
    let Some(target) = ladder
        .iter()
        .copied()
        .filter(|rung| *rung <= baseline.future_value)
        .max_by(f64::total_cmp)
    else {
        return (baseline.future_value, inputs.time_horizon);
    };

    let year = (1..=inputs.time_horizon)
        .find(|&year| {
            future_value(
                inputs.initial_amount,
                inputs.monthly_contribution,
                inputs.annual_return,
                year,
            ) >= target
        })
        .unwrap_or(inputs.time_horizon);
    (target, year)
}

fn insert_market_context(
    bag: &mut DerivedMetricsBag,
    inputs: &CalculatorInputs,
    baseline: &Baseline,
    assumptions: &MarketAssumptions,
) {
    let rate = inputs.annual_return;
    let inflation = assumptions.current_inflation;
    bag.percent("successRate", success_rate(rate));
    bag.percent("currentInflation", inflation);
    bag.percent("realReturn", (rate - inflation).max(0.0));
    bag.currency(
        "inflationAdjustedValue",
        baseline.future_value / (1.0 + inflation / 100.0).powf(inputs.time_horizon as f64),
    );
    bag.count(
        "expectedMarketCycles",
        expected_market_cycles(inputs.time_horizon) as f64,
    );
    bag.percent(
        "historicalAverageReturn",
        assumptions.historical_average_return,
    );
    bag.percent(
        "historicalReturnGap",
        rate - assumptions.historical_average_return,
    );
}

fn insert_optimization(
    bag: &mut DerivedMetricsBag,
    inputs: &CalculatorInputs,
    baseline: &Baseline,
    assumptions: &MarketAssumptions,
) {
    let withdrawal = assumptions.safe_withdrawal_rate / 100.0;
    bag.percent("safeWithdrawalRate", assumptions.safe_withdrawal_rate);
    bag.currency("annualIncome", baseline.future_value * withdrawal);
    bag.currency("monthlyIncome", baseline.future_value * withdrawal / 12.0);

    bag.currency(
        "monthlyContributionForMillion",
        required_monthly(
            assumptions.millionaire_target,
            inputs.initial_amount,
            inputs.annual_return,
            inputs.time_horizon,
        ),
    );

    let sheltered = (inputs.monthly_contribution * 12.0).min(assumptions.tax_advantaged_annual_cap);
    bag.percent("marginalTaxRate", assumptions.marginal_tax_rate);
    bag.currency(
        "annualTaxSavings",
        sheltered * assumptions.marginal_tax_rate / 100.0,
    );

    let after_fees = future_value(
        inputs.initial_amount,
        inputs.monthly_contribution,
        (inputs.annual_return - assumptions.advisory_fee_rate).max(0.0),
        inputs.time_horizon,
    );
    bag.percent("advisoryFeeRate", assumptions.advisory_fee_rate);
    bag.currency("feeDragLoss", baseline.future_value - after_fees);
    bag.currency("dailySavings", inputs.monthly_contribution * 12.0 / 365.0);
}
