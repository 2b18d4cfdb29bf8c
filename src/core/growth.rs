const ZERO_RATE_EPS: f64 = 1e-12;

fn monthly_rate(annual_return: f64) -> f64 {
    annual_return / 100.0 / 12.0
}

pub fn future_value(initial: f64, monthly: f64, annual_return: f64, years: u32) -> f64 {
    let months = years as f64 * 12.0;
    let rate = monthly_rate(annual_return);
    if rate.abs() < ZERO_RATE_EPS {
        return initial + monthly * months;
    }
    let growth = (1.0 + rate).powf(months);
    initial * growth + monthly * ((growth - 1.0) / rate)
}

pub fn annuity_value(monthly: f64, annual_return: f64, months: u32) -> f64 {
    let rate = monthly_rate(annual_return);
    if rate.abs() < ZERO_RATE_EPS {
        return monthly * months as f64;
    }
    monthly * (((1.0 + rate).powf(months as f64) - 1.0) / rate)
}

pub fn compound_annually(amount: f64, annual_return: f64, years: u32) -> f64 {
    amount * (1.0 + annual_return / 100.0).powf(years as f64)
}

pub fn required_monthly(target: f64, initial: f64, annual_return: f64, years: u32) -> f64 {
    let months = years.max(1).saturating_mul(12);
    let from_initial = future_value(initial, 0.0, annual_return, years);
    let per_unit = annuity_value(1.0, annual_return, months);
    if per_unit <= 0.0 {
        return 0.0;
    }
    ((target - from_initial) / per_unit).max(0.0)
}

/// Rule-of-72 doubling time in years, `None` when nothing grows.
pub fn doubling_years(annual_return: f64) -> Option<f64> {
    (annual_return > 0.0).then(|| 72.0 / annual_return)
}
