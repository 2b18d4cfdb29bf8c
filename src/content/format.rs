use serde::Deserialize;

use crate::core::round_to;

use super::template::ParamValue;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ValueFormat {
    Currency,
    Percent,
    Timeline,
    Plain,
}

const EXACT_KEYS: &[(&str, ValueFormat)] = &[
    ("futureValue", ValueFormat::Currency),
    ("fiveYearValue", ValueFormat::Currency),
    ("tenYearValue", ValueFormat::Currency),
    ("milestoneTarget", ValueFormat::Currency),
    ("monthlyIncome", ValueFormat::Currency),
    ("annualIncome", ValueFormat::Currency),
    ("volatilityLow", ValueFormat::Percent),
    ("volatilityHigh", ValueFormat::Percent),
    ("milestoneTimeframe", ValueFormat::Timeline),
];

const KEY_PATTERNS: &[(ValueFormat, &[&str])] = &[
    (
        ValueFormat::Currency,
        &[
            "Amount",
            "Value",
            "Contribution",
            "Gain",
            "Loss",
            "Total",
            "Benefit",
            "Savings",
        ],
    ),
    (
        ValueFormat::Percent,
        &[
            "Return",
            "Percent",
            "Rate",
            "Allocation",
            "Inflation",
            "Interest",
        ],
    ),
    (ValueFormat::Timeline, &["Timeline"]),
];

pub fn format_for_key(key: &str) -> ValueFormat {
    if let Some((_, format)) = EXACT_KEYS.iter().find(|(name, _)| *name == key) {
        return *format;
    }
    KEY_PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| key.contains(needle)))
        .map(|(format, _)| *format)
        .unwrap_or(ValueFormat::Plain)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberStyle {
    pub decimal_separator: String,
    pub group_separator: String,
    pub years_unit: String,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            years_unit: "years".to_string(),
        }
    }
}

impl NumberStyle {
    pub fn format(&self, key: &str, value: &ParamValue) -> String {
        let ParamValue::Number(n) = value else {
            return value.to_string();
        };
        if !n.is_finite() {
            return value.to_string();
        }
        match format_for_key(key) {
            ValueFormat::Currency => self.currency(*n),
            ValueFormat::Percent => self.percent(*n),
            ValueFormat::Timeline => self.timeline(*n),
            ValueFormat::Plain => value.to_string(),
        }
    }

    /// `$1.2M` from a million up, `$45K` from a thousand up, `$999` below.
    pub fn currency(&self, value: f64) -> String {
        let magnitude = value.abs();
        let body = if magnitude >= 1_000_000.0 {
            let millions = round_to(magnitude / 1_000_000.0, 1);
            format!("{}M", self.decimal(&format!("{millions:.1}")))
        } else if magnitude >= 1_000.0 {
            format!("{:.0}K", (magnitude / 1_000.0).round())
        } else {
            self.grouped(magnitude.round() as u64)
        };
        let sign = if value < 0.0 && body.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
            "-"
        } else {
            ""
        };
        format!("{sign}${body}")
    }

    pub fn percent(&self, value: f64) -> String {
        let rounded = round_to(value, 1);
        format!("{}%", self.decimal(&format!("{rounded:.1}")))
    }

    pub fn timeline(&self, value: f64) -> String {
        format!(
            "{} {}",
            self.decimal(&plain_number(value)),
            self.years_unit
        )
    }

    fn decimal(&self, formatted: &str) -> String {
        if self.decimal_separator == "." {
            formatted.to_string()
        } else {
            formatted.replace('.', &self.decimal_separator)
        }
    }

    fn grouped(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push_str(&self.group_separator);
            }
            out.push(ch);
        }
        out
    }
}

pub fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

pub fn format_currency(value: f64) -> String {
    NumberStyle::default().currency(value)
}

pub fn format_percent(value: f64) -> String {
    NumberStyle::default().percent(value)
}

pub fn format_timeline(value: f64) -> String {
    NumberStyle::default().timeline(value)
}
