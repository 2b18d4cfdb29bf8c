use invest_scenarios::content::{
    BundledLocales, ContentAssembler, SectionName, has_placeholders,
};
use invest_scenarios::core::{
    CalculatorInputs, GoalTag, classify, decode_slug, encode_slug, future_value,
};

const EPS: f64 = 1e-2;

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPS,
        "expected {expected}, got {actual}"
    );
}

fn fixture() -> CalculatorInputs {
    CalculatorInputs::new(10_000.0, 500.0, 7.0, 20).expect("valid inputs")
}

fn assembler() -> ContentAssembler<BundledLocales> {
    ContentAssembler::new(BundledLocales::embedded().expect("embedded bundles parse"))
}

#[test]
fn fixture_slug_round_trips() {
    let inputs = fixture();
    let goal = classify(&inputs);
    assert_eq!(goal, GoalTag::Starter);

    let slug = encode_slug(&inputs, goal);
    assert_eq!(slug, "invest-10000-monthly-500-7percent-20years-starter");

    let decoded = decode_slug(&slug).expect("fixture slug decodes");
    assert_eq!(decoded.inputs, inputs);
    assert_eq!(decoded.goal, goal);
    assert!(decoded.goal_matches_inputs());
}

#[test]
fn fixture_numbers() {
    let inputs = fixture();
    assert_approx(future_value(10_000.0, 500.0, 7.0, 20), 300_850.72);

    let report = assembler().report(&inputs, "en").expect("report");
    let metrics = &report.metrics;
    assert_approx(metrics.number("futureValue").expect("futureValue"), 300_850.72);
    assert_approx(
        metrics.number("totalContributions").expect("totalContributions"),
        130_000.0,
    );
    assert_approx(metrics.number("totalGains").expect("totalGains"), 170_850.72);
    assert_eq!(metrics.number("fiveYearValue").map(f64::round), Some(49_822.0));
    assert_eq!(metrics.number("tenYearValue").map(f64::round), Some(106_214.0));

    let allocation: f64 = ["stockAllocation", "bondAllocation", "alternativeAllocation"]
        .iter()
        .map(|k| metrics.number(k).expect("allocation present"))
        .sum();
    assert_eq!(allocation, 100.0);

    assert!(report.sections.investment_overview.contains("$301K"));
    assert!(report.sections.investment_overview.contains("Starter Portfolio"));
}

#[test]
fn every_builtin_locale_fills_every_placeholder() {
    let assembler = assembler();
    let samples = [
        fixture(),
        CalculatorInputs::new(0.0, 0.0, 0.0, 1).expect("valid"),
        CalculatorInputs::new(250_000.0, 3_000.0, 12.0, 35).expect("valid"),
        CalculatorInputs::new(5_000.0, 150.0, 4.0, 3).expect("valid"),
    ];
    for code in ["en", "es", "pl"] {
        for inputs in &samples {
            let sections = assembler.generate(inputs, code).expect("content generates");
            for section in SectionName::ALL {
                let text = sections.get(section);
                assert!(!text.trim().is_empty(), "{code}/{} empty", section.as_str());
                assert!(
                    !has_placeholders(text),
                    "{code}/{} left a placeholder: {text}",
                    section.as_str()
                );
            }
        }
    }
}

#[test]
fn numbers_do_not_depend_on_locale() {
    let assembler = assembler();
    let inputs = CalculatorInputs::new(60_000.0, 1_200.0, 8.5, 25).expect("valid");
    let en = assembler.report(&inputs, "en").expect("en");
    for code in ["es", "pl", "pl-PL", "xx"] {
        let other = assembler.report(&inputs, code).expect("report");
        assert_eq!(other.metrics, en.metrics, "{code}");
        assert_eq!(other.scenario, en.scenario, "{code}");
    }
}

#[test]
fn locale_number_style_shows_in_prose() {
    let assembler = assembler();
    let pl = assembler.generate(&fixture(), "pl").expect("pl");
    assert!(pl.investment_overview.contains("7,0%"));
    assert!(pl.growth_projection.contains("10,3 lat"));

    let es = assembler.generate(&fixture(), "es").expect("es");
    assert!(es.growth_projection.contains("10,3 años"));
}
