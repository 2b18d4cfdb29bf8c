use super::types::{CalculatorInputs, GoalTag};

/// Maps calculator inputs to a goal. Rules are checked in order and the first
/// match wins; `Investment` catches everything else.
pub fn classify(inputs: &CalculatorInputs) -> GoalTag {
    let initial = inputs.initial_amount;
    let monthly = inputs.monthly_contribution;
    let years = inputs.time_horizon;

    if years >= 20 && monthly >= 1_000.0 {
        GoalTag::Retirement
    } else if years >= 15 && (initial >= 50_000.0 || monthly >= 2_000.0) {
        GoalTag::Wealth
    } else if years <= 5 && initial <= 20_000.0 && monthly <= 1_000.0 {
        GoalTag::Emergency
    } else if (5..=15).contains(&years) && (initial >= 10_000.0 || monthly >= 1_500.0) {
        GoalTag::House
    } else if (10..=18).contains(&years) && monthly >= 500.0 {
        GoalTag::Education
    } else if years <= 10 && initial <= 50_000.0 && monthly <= 1_000.0 {
        GoalTag::Vacation
    } else if initial <= 10_000.0 && monthly <= 500.0 {
        GoalTag::Starter
    } else {
        GoalTag::Investment
    }
}
