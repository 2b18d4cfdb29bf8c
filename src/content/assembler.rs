use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    BaselineFigures, CalculatorInputs, DerivedMetricsBag, GoalTag, MarketAssumptions,
    MetricValue, ScenarioParams, classify, derive_metrics_from_baseline, to_params,
};

use super::error::ContentError;
use super::locale::{LocaleBundle, LocaleResourceProvider, locale_candidates, normalize_locale};
use super::template::{TemplateEngine, TemplateParameterSet};

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SectionName {
    InvestmentOverview,
    GrowthProjection,
    InvestmentInsights,
    StrategyAnalysis,
    ComparativeScenarios,
    CommunityInsights,
    OptimizationTips,
    MarketContext,
}

impl SectionName {
    pub const ALL: [SectionName; 8] = [
        SectionName::InvestmentOverview,
        SectionName::GrowthProjection,
        SectionName::InvestmentInsights,
        SectionName::StrategyAnalysis,
        SectionName::ComparativeScenarios,
        SectionName::CommunityInsights,
        SectionName::OptimizationTips,
        SectionName::MarketContext,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::InvestmentOverview => "investment_overview",
            SectionName::GrowthProjection => "growth_projection",
            SectionName::InvestmentInsights => "investment_insights",
            SectionName::StrategyAnalysis => "strategy_analysis",
            SectionName::ComparativeScenarios => "comparative_scenarios",
            SectionName::CommunityInsights => "community_insights",
            SectionName::OptimizationTips => "optimization_tips",
            SectionName::MarketContext => "market_context",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSections {
    pub investment_overview: String,
    pub growth_projection: String,
    pub investment_insights: String,
    pub strategy_analysis: String,
    pub comparative_scenarios: String,
    pub community_insights: String,
    pub optimization_tips: String,
    pub market_context: String,
}

impl ContentSections {
    pub fn get(&self, section: SectionName) -> &str {
        match section {
            SectionName::InvestmentOverview => &self.investment_overview,
            SectionName::GrowthProjection => &self.growth_projection,
            SectionName::InvestmentInsights => &self.investment_insights,
            SectionName::StrategyAnalysis => &self.strategy_analysis,
            SectionName::ComparativeScenarios => &self.comparative_scenarios,
            SectionName::CommunityInsights => &self.community_insights,
            SectionName::OptimizationTips => &self.optimization_tips,
            SectionName::MarketContext => &self.market_context,
        }
    }

    fn slot(&mut self, section: SectionName) -> &mut String {
        match section {
            SectionName::InvestmentOverview => &mut self.investment_overview,
            SectionName::GrowthProjection => &mut self.growth_projection,
            SectionName::InvestmentInsights => &mut self.investment_insights,
            SectionName::StrategyAnalysis => &mut self.strategy_analysis,
            SectionName::ComparativeScenarios => &mut self.comparative_scenarios,
            SectionName::CommunityInsights => &mut self.community_insights,
            SectionName::OptimizationTips => &mut self.optimization_tips,
            SectionName::MarketContext => &mut self.market_context,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &str)> {
        SectionName::ALL
            .into_iter()
            .map(move |section| (section, self.get(section)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssemblerConfig {
    pub default_locale: String,
    pub assumptions: MarketAssumptions,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            assumptions: MarketAssumptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub scenario: ScenarioParams,
    pub locale: String,
    pub goal_label: String,
    pub metrics: DerivedMetricsBag,
    pub sections: ContentSections,
}

struct ResolvedLocale {
    code: String,
    bundle: Arc<LocaleBundle>,
    fallback: Option<Arc<LocaleBundle>>,
}

impl ResolvedLocale {
    fn lookup<'a>(&'a self, find: impl Fn(&'a LocaleBundle) -> Option<&'a str>) -> Option<&'a str> {
        find(&self.bundle).or_else(|| self.fallback.as_deref().and_then(find))
    }
}

/// Numbers are computed once per call, before any locale is consulted, so
/// every locale sees identical values.
#[derive(Debug)]
pub struct ContentAssembler<P> {
    provider: P,
    config: AssemblerConfig,
}

impl<P: LocaleResourceProvider> ContentAssembler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AssemblerConfig::default())
    }

    pub fn with_config(provider: P, config: AssemblerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn generate(
        &self,
        inputs: &CalculatorInputs,
        locale: &str,
    ) -> Result<ContentSections, ContentError> {
        self.generate_with_baseline(inputs, locale, BaselineFigures::default())
    }

    pub fn generate_with_baseline(
        &self,
        inputs: &CalculatorInputs,
        locale: &str,
        baseline: BaselineFigures,
    ) -> Result<ContentSections, ContentError> {
        self.report_with_baseline(inputs, locale, baseline)
            .map(|report| report.sections)
    }

    pub fn report(
        &self,
        inputs: &CalculatorInputs,
        locale: &str,
    ) -> Result<ScenarioReport, ContentError> {
        self.report_with_baseline(inputs, locale, BaselineFigures::default())
    }

    pub fn report_with_baseline(
        &self,
        inputs: &CalculatorInputs,
        locale: &str,
        baseline: BaselineFigures,
    ) -> Result<ScenarioReport, ContentError> {
        let goal = classify(inputs);
        let baseline = baseline.resolve(inputs);
        let metrics = derive_metrics_from_baseline(inputs, &baseline, &self.config.assumptions);

        let resolved = self.resolve_locale(locale)?;
        let goal_label = self.goal_label(&resolved, goal);
        let params = self.parameters(inputs, goal, &goal_label, &metrics, &resolved);
        let engine = TemplateEngine::new(resolved.bundle.format.clone());

        let mut sections = ContentSections::default();
        for section in SectionName::ALL {
            let template = self.template(&resolved, section)?;
            *sections.slot(section) = engine.populate(template, &params);
        }
        debug!(
            locale = %resolved.code,
            goal = goal.as_str(),
            "generated scenario content"
        );

        Ok(ScenarioReport {
            scenario: to_params(inputs, goal),
            locale: resolved.code,
            goal_label,
            metrics,
            sections,
        })
    }

    fn resolve_locale(&self, requested: &str) -> Result<ResolvedLocale, ContentError> {
        let default_code = normalize_locale(&self.config.default_locale);
        let default_bundle = self.provider.bundle(&default_code)?;

        for candidate in locale_candidates(requested) {
            if let Some(bundle) = self.provider.bundle(&candidate)? {
                let fallback = if candidate == default_code {
                    None
                } else {
                    default_bundle.clone()
                };
                return Ok(ResolvedLocale {
                    code: candidate,
                    bundle,
                    fallback,
                });
            }
        }

        match default_bundle {
            Some(bundle) => {
                warn!(
                    requested,
                    default = %default_code,
                    "locale not available, using default locale"
                );
                Ok(ResolvedLocale {
                    code: default_code,
                    bundle,
                    fallback: None,
                })
            }
            None => Err(ContentError::MissingLocale {
                requested: requested.to_string(),
                default: default_code,
            }),
        }
    }

    fn goal_label(&self, resolved: &ResolvedLocale, goal: GoalTag) -> String {
        if let Some(label) = resolved.lookup(|b| b.goal_label(goal)) {
            return label.to_string();
        }
        warn!(
            locale = %resolved.code,
            goal = goal.as_str(),
            "no goal label in locale or default, using the tag"
        );
        goal.as_str().to_string()
    }

    fn template<'a>(
        &self,
        resolved: &'a ResolvedLocale,
        section: SectionName,
    ) -> Result<&'a str, ContentError> {
        if let Some(template) = resolved.bundle.template(section.as_str()) {
            return Ok(template);
        }
        match resolved.fallback.as_deref().and_then(|b| b.template(section.as_str())) {
            Some(template) => {
                warn!(
                    locale = %resolved.code,
                    section = section.as_str(),
                    "template missing, using default locale"
                );
                Ok(template)
            }
            None => Err(ContentError::MissingTemplate {
                name: section.as_str().to_string(),
                locale: resolved.code.clone(),
            }),
        }
    }

    fn parameters(
        &self,
        inputs: &CalculatorInputs,
        goal: GoalTag,
        goal_label: &str,
        metrics: &DerivedMetricsBag,
        resolved: &ResolvedLocale,
    ) -> TemplateParameterSet {
        let mut params = TemplateParameterSet::from_inputs(inputs);
        params.extend_metrics(metrics);
        for (key, value) in metrics.iter() {
            if let MetricValue::Label(term) = value {
                let translated = resolved.lookup(|b| b.term(term)).unwrap_or(term.as_str());
                params.insert(key, translated);
            }
        }
        params.insert("goal", goal.as_str());
        params.insert("goalLabel", goal_label);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BundledLocales, has_placeholders};

    fn fixture_inputs() -> CalculatorInputs {
        CalculatorInputs {
            initial_amount: 10_000.0,
            monthly_contribution: 500.0,
            annual_return: 7.0,
            time_horizon: 20,
        }
    }

    fn assembler() -> ContentAssembler<BundledLocales> {
        ContentAssembler::new(BundledLocales::embedded().expect("embedded bundles parse"))
    }

    fn bundle(json: &str) -> LocaleBundle {
        LocaleBundle::from_json("test", json).expect("valid bundle json")
    }

    fn minimal_bundle(marker: &str) -> LocaleBundle {
        let templates = SectionName::ALL
            .iter()
            .map(|s| format!("\"{}\": \"{marker} {{futureValue}} {{{{ goalLabel }}}}\"", s.as_str()))
            .collect::<Vec<_>>()
            .join(",");
        bundle(&format!(
            r#"{{"goals": {{"starter": "{marker}-starter"}}, "templates": {{{templates}}}}}"#
        ))
    }

    #[test]
    fn generates_all_sections_without_placeholders() {
        let sections = assembler()
            .generate(&fixture_inputs(), "en")
            .expect("content generates");
        for (section, text) in sections.iter() {
            assert!(!text.trim().is_empty(), "{} is empty", section.as_str());
            assert!(!has_placeholders(text), "{} kept a placeholder", section.as_str());
        }
        assert!(sections.investment_overview.contains("$301K"));
    }

    #[test]
    fn unknown_locale_falls_back_to_default_set() {
        let assembler = assembler();
        let report = assembler
            .report(&fixture_inputs(), "de")
            .expect("falls back to default");
        assert_eq!(report.locale, "en");
        let english = assembler
            .generate(&fixture_inputs(), "en")
            .expect("english");
        assert_eq!(report.sections, english);
    }

    #[test]
    fn region_locale_uses_primary_language() {
        let report = assembler()
            .report(&fixture_inputs(), "es-MX")
            .expect("spanish content");
        assert_eq!(report.locale, "es");
        assert_eq!(report.goal_label, "Cartera Inicial");
    }

    #[test]
    fn numbers_are_identical_across_locales() {
        let assembler = assembler();
        let en = assembler.report(&fixture_inputs(), "en").expect("en");
        let pl = assembler.report(&fixture_inputs(), "pl").expect("pl");
        assert_eq!(en.metrics, pl.metrics);
        assert_eq!(en.scenario, pl.scenario);
        assert_ne!(en.sections, pl.sections);
    }

    #[test]
    fn missing_default_and_requested_locale_is_an_error() {
        let assembler = ContentAssembler::new(BundledLocales::default());
        let err = assembler
            .generate(&fixture_inputs(), "fr")
            .expect_err("no resources at all");
        assert!(matches!(err, ContentError::MissingLocale { .. }));
    }

    #[test]
    fn missing_template_is_filled_from_default_locale() {
        let mut locales = BundledLocales::default();
        locales.insert("en", minimal_bundle("EN"));
        let mut partial = minimal_bundle("XX");
        partial.templates.remove("market_context");
        partial.goals.clear();
        locales.insert("xx", partial);

        let report = ContentAssembler::new(locales)
            .report(&fixture_inputs(), "xx")
            .expect("degrades to default entries");
        assert_eq!(report.locale, "xx");
        assert_eq!(report.goal_label, "EN-starter");
        assert!(report.sections.investment_overview.starts_with("XX $301K"));
        assert!(report.sections.market_context.starts_with("EN $301K"));
    }

    #[test]
    fn template_missing_everywhere_is_an_error() {
        let mut only = minimal_bundle("EN");
        only.templates.remove("optimization_tips");
        let mut locales = BundledLocales::default();
        locales.insert("en", only);

        let err = ContentAssembler::new(locales)
            .generate(&fixture_inputs(), "en")
            .expect_err("template absent from default");
        assert!(
            matches!(err, ContentError::MissingTemplate { ref name, .. } if name == "optimization_tips")
        );
    }

    #[test]
    fn goal_label_falls_back_to_tag() {
        let mut en = minimal_bundle("EN");
        en.goals.clear();
        let mut locales = BundledLocales::default();
        locales.insert("en", en);
        let report = ContentAssembler::new(locales)
            .report(&fixture_inputs(), "en")
            .expect("generates");
        assert_eq!(report.goal_label, "starter");
    }

    #[test]
    fn supplied_baseline_is_used_everywhere() {
        let report = assembler()
            .report_with_baseline(
                &fixture_inputs(),
                "en",
                BaselineFigures {
                    future_value: Some(2_000_000.0),
                    ..BaselineFigures::default()
                },
            )
            .expect("generates");
        assert_eq!(report.metrics.number("futureValue"), Some(2_000_000.0));
        assert_eq!(report.metrics.number("totalGains"), Some(1_870_000.0));
        assert!(report.sections.investment_overview.contains("$2.0M"));
    }

    #[test]
    fn small_contributions_never_read_as_negative_cuts() {
        let inputs = CalculatorInputs {
            monthly_contribution: 20.0,
            ..fixture_inputs()
        };
        let sections = assembler().generate(&inputs, "en").expect("generates");
        assert!(sections.strategy_analysis.contains("Cutting it to $15"));
        assert!(!sections.strategy_analysis.contains("-$"));
    }

    #[test]
    fn labels_are_translated_per_locale() {
        let assembler = assembler();
        let es = assembler.generate(&fixture_inputs(), "es").expect("es");
        assert!(es.investment_insights.contains("moderado"));
        let en = assembler.generate(&fixture_inputs(), "en").expect("en");
        assert!(en.investment_insights.contains("moderate"));
    }

    #[test]
    fn concurrent_generation_is_deterministic() {
        let owned = assembler();
        let assembler = &owned;
        let expected = assembler.generate(&fixture_inputs(), "pl").expect("pl");
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || assembler.generate(&fixture_inputs(), "pl")))
                .collect();
            for handle in handles {
                let sections = handle.join().expect("thread finished").expect("generates");
                assert_eq!(sections, expected);
            }
        });
    }

    #[test]
    fn sections_serialize_with_fixed_keys() {
        let sections = assembler()
            .generate(&fixture_inputs(), "en")
            .expect("generates");
        let json = serde_json::to_value(&sections).expect("serializes");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 8);
        for section in SectionName::ALL {
            assert!(object.contains_key(section.as_str()));
        }
    }
}
