use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::classifier::classify;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTag {
    Retirement,
    Wealth,
    Emergency,
    House,
    Education,
    Vacation,
    Starter,
    Investment,
}

impl GoalTag {
    pub const ALL: [GoalTag; 8] = [
        GoalTag::Retirement,
        GoalTag::Wealth,
        GoalTag::Emergency,
        GoalTag::House,
        GoalTag::Education,
        GoalTag::Vacation,
        GoalTag::Starter,
        GoalTag::Investment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalTag::Retirement => "retirement",
            GoalTag::Wealth => "wealth",
            GoalTag::Emergency => "emergency",
            GoalTag::House => "house",
            GoalTag::Education => "education",
            GoalTag::Vacation => "vacation",
            GoalTag::Starter => "starter",
            GoalTag::Investment => "investment",
        }
    }
}

impl fmt::Display for GoalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown goal tag: {s}"))
    }
}

pub const MAX_TIME_HORIZON: u32 = 100;

/// The four numbers a visitor types into the calculator.
///
/// `annual_return` is a percentage (7.0 means 7%), not a fraction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub annual_return: f64,
    pub time_horizon: u32,
}

impl CalculatorInputs {
    pub fn new(
        initial_amount: f64,
        monthly_contribution: f64,
        annual_return: f64,
        time_horizon: u32,
    ) -> Result<Self, String> {
        let inputs = Self {
            initial_amount,
            monthly_contribution,
            annual_return,
            time_horizon,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("initialAmount", self.initial_amount),
            ("monthlyContribution", self.monthly_contribution),
            ("annualReturn", self.annual_return),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite number >= 0"));
            }
        }
        if !(1..=MAX_TIME_HORIZON).contains(&self.time_horizon) {
            return Err(format!("timeHorizon must be between 1 and {MAX_TIME_HORIZON}"));
        }
        Ok(())
    }

    pub fn months(&self) -> u32 {
        self.time_horizon.saturating_mul(12)
    }

    pub fn total_contributions(&self) -> f64 {
        self.initial_amount + self.monthly_contribution * self.months() as f64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    #[serde(flatten)]
    pub inputs: CalculatorInputs,
    pub goal: GoalTag,
    pub slug: String,
}

impl ScenarioParams {
    /// Whether the embedded goal is the one the classifier assigns to these
    /// numbers. Decoding trusts the slug, so a hand-edited goal still decodes.
    pub fn goal_matches_inputs(&self) -> bool {
        classify(&self.inputs) == self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_tag_round_trips_through_str() {
        for tag in GoalTag::ALL {
            assert_eq!(tag.as_str().parse::<GoalTag>(), Ok(tag));
            assert_eq!(tag.to_string(), tag.as_str());
        }
        assert!("pension".parse::<GoalTag>().is_err());
        assert!("Retirement".parse::<GoalTag>().is_err());
    }

    #[test]
    fn new_rejects_negative_and_non_finite_values() {
        let err = CalculatorInputs::new(-1.0, 0.0, 5.0, 10).expect_err("negative initial");
        assert!(err.contains("initialAmount"));
        let err = CalculatorInputs::new(0.0, f64::NAN, 5.0, 10).expect_err("nan monthly");
        assert!(err.contains("monthlyContribution"));
        let err = CalculatorInputs::new(0.0, 0.0, f64::INFINITY, 10).expect_err("inf rate");
        assert!(err.contains("annualReturn"));
        let err = CalculatorInputs::new(0.0, 0.0, 5.0, 0).expect_err("zero years");
        assert!(err.contains("timeHorizon"));
        let err = CalculatorInputs::new(0.0, 0.0, 5.0, MAX_TIME_HORIZON + 1).expect_err("too long");
        assert!(err.contains("timeHorizon"));
        assert!(CalculatorInputs::new(0.0, 0.0, 5.0, MAX_TIME_HORIZON).is_ok());
    }

    #[test]
    fn total_contributions_counts_every_month() {
        let inputs = CalculatorInputs::new(10_000.0, 500.0, 7.0, 20).expect("valid inputs");
        assert_eq!(inputs.months(), 240);
        assert_eq!(inputs.total_contributions(), 130_000.0);
    }

    #[test]
    fn months_saturate_for_unvalidated_horizons() {
        let inputs = CalculatorInputs {
            initial_amount: 0.0,
            monthly_contribution: 100.0,
            annual_return: 0.0,
            time_horizon: 400_000_000,
        };
        assert_eq!(inputs.months(), u32::MAX);
        assert!(inputs.total_contributions().is_finite());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let params = ScenarioParams {
            inputs: CalculatorInputs::new(1.0, 2.0, 3.5, 4).expect("valid inputs"),
            goal: GoalTag::Starter,
            slug: "invest-1-monthly-2-3.5percent-4years-starter".to_string(),
        };
        let json = serde_json::to_string(&params).expect("params should serialize");
        assert!(json.contains("\"initialAmount\":1.0"));
        assert!(json.contains("\"timeHorizon\":4"));
        assert!(json.contains("\"goal\":\"starter\""));
    }

    #[test]
    fn goal_mismatch_is_detectable() {
        let inputs = CalculatorInputs::new(10_000.0, 500.0, 7.0, 20).expect("valid inputs");
        let mut params = ScenarioParams {
            inputs,
            goal: GoalTag::Starter,
            slug: String::new(),
        };
        assert!(params.goal_matches_inputs());
        params.goal = GoalTag::Retirement;
        assert!(!params.goal_matches_inputs());
    }
}
