pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn round_tenth(value: f64) -> f64 {
    round_to(value, 1)
}

/// One decimal place, with a trailing `.0` dropped: `7.0 -> "7"`, `7.25 -> "7.3"`.
pub fn tenth_string(value: f64) -> String {
    let rounded = round_tenth(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

pub fn round_whole(value: f64) -> f64 {
    let rounded = value.round();
    if rounded > 0.0 { rounded } else { 0.0 }
}

pub fn whole_string(value: f64) -> String {
    format!("{:.0}", round_whole(value))
}
