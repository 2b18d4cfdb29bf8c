use super::rounding::{round_tenth, round_whole, tenth_string, whole_string};
use super::types::{CalculatorInputs, GoalTag, MAX_TIME_HORIZON, ScenarioParams};

const PREFIX: &str = "invest";
const MONTHLY_MARKER: &str = "monthly";
const RATE_SUFFIX: &str = "percent";
const YEARS_SUFFIX: &str = "years";
const MIN_SEGMENTS: usize = 7;

pub fn encode(inputs: &CalculatorInputs, goal: GoalTag) -> String {
    format!(
        "{PREFIX}-{}-{MONTHLY_MARKER}-{}-{}{RATE_SUFFIX}-{}{YEARS_SUFFIX}-{}",
        whole_string(inputs.initial_amount),
        whole_string(inputs.monthly_contribution),
        tenth_string(inputs.annual_return),
        inputs.time_horizon,
        goal.as_str(),
    )
}

pub fn to_params(inputs: &CalculatorInputs, goal: GoalTag) -> ScenarioParams {
    ScenarioParams {
        inputs: rounded(inputs),
        goal,
        slug: encode(inputs, goal),
    }
}

pub fn rounded(inputs: &CalculatorInputs) -> CalculatorInputs {
    CalculatorInputs {
        initial_amount: round_whole(inputs.initial_amount),
        monthly_contribution: round_whole(inputs.monthly_contribution),
        annual_return: round_tenth(inputs.annual_return),
        time_horizon: inputs.time_horizon,
    }
}

/// Returns `None` for anything that is not a well-formed scenario slug.
pub fn decode(slug: &str) -> Option<ScenarioParams> {
    let parts: Vec<&str> = slug.split('-').collect();
    if parts.len() < MIN_SEGMENTS || parts[0] != PREFIX || parts[2] != MONTHLY_MARKER {
        return None;
    }

    let initial_amount = parse_amount(parts[1])?;
    let monthly_contribution = parse_amount(parts[3])?;
    let annual_return = parse_amount(parts[4].strip_suffix(RATE_SUFFIX)?)?;
    let time_horizon = parts[5].strip_suffix(YEARS_SUFFIX)?.parse::<u32>().ok()?;
    if !(1..=MAX_TIME_HORIZON).contains(&time_horizon) {
        return None;
    }

    let goal = parts[6..].join("-").parse::<GoalTag>().ok()?;

    Some(ScenarioParams {
        inputs: CalculatorInputs {
            initial_amount,
            monthly_contribution,
            annual_return,
            time_horizon,
        },
        goal,
        slug: slug.to_string(),
    })
}

fn parse_amount(raw: &str) -> Option<f64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
