use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{
    AssemblerConfig, BundledLocales, ContentAssembler, DEFAULT_LOCALE, DirectoryLocales,
    LocaleResourceProvider, ScenarioReport,
};
use crate::core::{
    BaselineFigures, CalculatorInputs, MarketAssumptions, ScenarioParams, classify, decode_slug,
    to_params,
};

#[derive(Parser, Debug)]
#[command(
    name = "invest-scenarios",
    about = "Investment scenario classifier, slug codec and localized content generator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the inputs and print the goal and slug.
    #[command(visible_alias = "encode")]
    Classify(InputArgs),
    /// Decode a scenario slug.
    Decode {
        slug: String,
    },
    /// Generate the full localized report for a scenario.
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, default_value_t = 10_000.0, help = "Initial lump sum")]
    pub initial_amount: f64,
    #[arg(long, default_value_t = 500.0, help = "Monthly contribution")]
    pub monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual return in percent, e.g. 7"
    )]
    pub annual_return: f64,
    #[arg(long, default_value_t = 20, help = "Investment horizon in years")]
    pub time_horizon: u32,
    #[arg(
        long,
        help = "JSON object overriding any of the inputs, e.g. {\"timeHorizon\": 30}"
    )]
    pub payload: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
    #[arg(
        long,
        conflicts_with = "payload",
        help = "Take the inputs from a scenario slug instead of flags"
    )]
    pub slug: Option<String>,
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,
    #[arg(long, help = "Directory of <locale>.json bundles to use instead of the built-ins")]
    pub locales_dir: Option<PathBuf>,
    #[arg(long, help = "JSON object overriding market assumptions")]
    pub assumptions: Option<String>,
    #[arg(long, help = "Precomputed baseline future value")]
    pub future_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InputsPayload {
    initial_amount: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_return: Option<f64>,
    time_horizon: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeResponse {
    #[serde(flatten)]
    scenario: ScenarioParams,
    goal_matches_inputs: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_inputs(args: &InputArgs) -> Result<CalculatorInputs, String> {
    let mut initial_amount = args.initial_amount;
    let mut monthly_contribution = args.monthly_contribution;
    let mut annual_return = args.annual_return;
    let mut time_horizon = args.time_horizon;

    if let Some(raw) = &args.payload {
        let payload = serde_json::from_str::<InputsPayload>(raw)
            .map_err(|e| format!("Invalid --payload JSON: {e}"))?;
        if let Some(v) = payload.initial_amount {
            initial_amount = v;
        }
        if let Some(v) = payload.monthly_contribution {
            monthly_contribution = v;
        }
        if let Some(v) = payload.annual_return {
            annual_return = v;
        }
        if let Some(v) = payload.time_horizon {
            time_horizon = v;
        }
    }

    CalculatorInputs::new(
        initial_amount,
        monthly_contribution,
        annual_return,
        time_horizon,
    )
}

fn build_config(args: &GenerateArgs) -> Result<AssemblerConfig, String> {
    let assumptions = match &args.assumptions {
        Some(raw) => serde_json::from_str::<MarketAssumptions>(raw)
            .map_err(|e| format!("Invalid --assumptions JSON: {e}"))?,
        None => MarketAssumptions::default(),
    };
    Ok(AssemblerConfig {
        assumptions,
        ..AssemblerConfig::default()
    })
}

fn generate_report<P: LocaleResourceProvider>(
    provider: P,
    config: AssemblerConfig,
    inputs: &CalculatorInputs,
    args: &GenerateArgs,
) -> Result<ScenarioReport, String> {
    let baseline = BaselineFigures {
        future_value: args.future_value,
        ..BaselineFigures::default()
    };
    ContentAssembler::with_config(provider, config)
        .report_with_baseline(inputs, &args.locale, baseline)
        .map_err(|e| e.to_string())
}

fn generate(args: &GenerateArgs) -> Result<ScenarioReport, String> {
    let inputs = match &args.slug {
        Some(slug) => {
            decode_slug(slug)
                .ok_or_else(|| format!("invalid scenario slug: {slug}"))?
                .inputs
        }
        None => build_inputs(&args.inputs)?,
    };
    if let Some(fv) = args.future_value {
        if !fv.is_finite() || fv < 0.0 {
            return Err("--future-value must be a finite number >= 0".to_string());
        }
    }
    let config = build_config(args)?;

    match &args.locales_dir {
        Some(dir) => {
            debug!(dir = %dir.display(), "reading locale bundles from directory");
            generate_report(DirectoryLocales::new(dir), config, &inputs, args)
        }
        None => {
            let locales = BundledLocales::embedded().map_err(|e| e.to_string())?;
            generate_report(locales, config, &inputs, args)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("failed to serialize output: {e}"))
}

pub fn execute(cli: Cli) -> Result<String, String> {
    match cli.command {
        Command::Classify(args) => {
            let inputs = build_inputs(&args)?;
            to_json(&to_params(&inputs, classify(&inputs)))
        }
        Command::Decode { slug } => {
            let scenario =
                decode_slug(&slug).ok_or_else(|| format!("invalid scenario slug: {slug}"))?;
            let goal_matches_inputs = scenario.goal_matches_inputs();
            to_json(&DecodeResponse {
                scenario,
                goal_matches_inputs,
            })
        }
        Command::Generate(args) => to_json(&generate(&args)?),
    }
}

pub fn error_json(message: &str) -> String {
    serde_json::to_string(&ErrorResponse {
        error: message.to_string(),
    })
    .unwrap_or_else(|_| format!("{{\"error\":{message:?}}}"))
}
