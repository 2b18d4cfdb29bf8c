use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use crate::core::{CalculatorInputs, DerivedMetricsBag, MetricValue};

use super::format::{NumberStyle, plain_number};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => f.write_str(&plain_number(*n)),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&MetricValue> for ParamValue {
    fn from(value: &MetricValue) -> Self {
        match value {
            MetricValue::Label(s) => ParamValue::Text(s.clone()),
            other => ParamValue::Number(other.as_number().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl TemplateParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_inputs(inputs: &CalculatorInputs) -> Self {
        let mut params = Self::new();
        params.insert("initialAmount", inputs.initial_amount);
        params.insert("monthlyContribution", inputs.monthly_contribution);
        params.insert("annualReturn", inputs.annual_return);
        params.insert("timeHorizon", inputs.time_horizon);
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn extend_metrics(&mut self, metrics: &DerivedMetricsBag) {
        for (key, value) in metrics.iter() {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(
            r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}|\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}",
        )
        .expect("placeholder regex is valid")
    })
}

/// Placeholders naming a key that is not in the parameter set, and any brace
/// text that is not a placeholder, are copied through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    style: NumberStyle,
}

impl TemplateEngine {
    pub fn new(style: NumberStyle) -> Self {
        Self { style }
    }

    pub fn populate(&self, template: &str, params: &TemplateParameterSet) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &Captures<'_>| {
                let key = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match params.get(key) {
                    Some(value) => self.style.format(key, value),
                    None => {
                        debug!(placeholder = key, "leaving unknown placeholder in place");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}

pub fn populate(template: &str, params: &TemplateParameterSet) -> String {
    TemplateEngine::default().populate(template, params)
}

pub fn has_placeholders(text: &str) -> bool {
    placeholder_regex().is_match(text)
}
