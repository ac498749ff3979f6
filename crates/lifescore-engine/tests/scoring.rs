//! End-to-end scoring behavior against the canonical reference table.

use lifescore_core::{AnswerSet, FactorId, FactorTable};
use lifescore_engine::{Calculator, ContributionAnalyzer, SimulationConfig};

fn calculator() -> Calculator {
    Calculator::new(FactorTable::reference())
}

fn all_best() -> AnswerSet {
    AnswerSet::new()
        .with(FactorId::Location, "high-income")
        .with(FactorId::Education, "university")
        .with(FactorId::Income, "top-bracket")
        .with(FactorId::Water, "reliable")
        .with(FactorId::Healthcare, "easy")
        .with(FactorId::Hunger, "never")
        .with(FactorId::Internet, "high-speed")
}

fn all_worst() -> AnswerSet {
    AnswerSet::new()
        .with(FactorId::Location, "low-income")
        .with(FactorId::Education, "none")
        .with(FactorId::Income, "bottom-bracket")
        .with(FactorId::Water, "must-collect")
        .with(FactorId::Healthcare, "unaffordable")
        .with(FactorId::Hunger, "often")
        .with(FactorId::Internet, "none")
}

#[test]
fn partial_answer_normalization() {
    // (84×0.10 + 90×0.20) / 0.30 = 88.0
    let result = calculator().score(
        &AnswerSet::new()
            .with(FactorId::Location, "high-income")
            .with(FactorId::Education, "university"),
    );
    assert_eq!(result.percentile, 88.0);
    assert_eq!(result.metadata.factors_included, 2);
    assert!((result.metadata.total_weight_used - 0.30).abs() < 1e-9);
}

#[test]
fn single_factor_weight_cancels() {
    let result = calculator().score(&AnswerSet::new().with(FactorId::Location, "high-income"));
    assert_eq!(result.percentile, 84.0);
}

#[test]
fn all_best_answers_land_high() {
    let p = calculator().score(&all_best()).percentile;
    assert!((78.0..=85.0).contains(&p), "got {p}");
}

#[test]
fn all_worst_answers_land_low() {
    let p = calculator().score(&all_worst()).percentile;
    assert!((5.0..=15.0).contains(&p), "got {p}");
}

#[test]
fn unknown_token_resolves_to_fallback() {
    let calc = calculator();
    let result = calc.score(
        &AnswerSet::new()
            .with(FactorId::Location, "high-income")
            .with(FactorId::Education, "masters"),
    );
    // (84×0.10 + 50×0.20) / 0.30 = 61.33…
    assert_eq!(result.percentile, 61.3);
    assert_eq!(result.per_factor[&FactorId::Education], 50.0);
}

#[test]
fn upgrading_an_answer_never_decreases_score() {
    let calc = calculator();
    let base = AnswerSet::new()
        .with(FactorId::Income, "middle-bracket")
        .with(FactorId::Water, "intermittent");

    let mut previous = f64::MIN;
    for token in ["must-collect", "intermittent", "reliable"] {
        let p = calc
            .score(&base.clone().with(FactorId::Water, token))
            .percentile;
        assert!(p >= previous, "{token} dropped the score: {p} < {previous}");
        previous = p;
    }
}

#[test]
fn repeated_scoring_is_identical() {
    let calc = calculator();
    let answers = all_best();
    let a = calc.score(&answers);
    let b = calc.score(&answers);
    assert_eq!(a.percentile, b.percentile);
    assert_eq!(a.per_factor, b.per_factor);
}

#[test]
fn contributions_decompose_the_score() {
    let calc = calculator();
    for answers in [all_best(), all_worst()] {
        let result = calc.score(&answers);
        let entries = ContributionAnalyzer::analyze(calc.table(), &result);

        let weighted: f64 = entries.iter().map(|e| e.weighted_contribution).sum();
        let weight: f64 = entries.iter().map(|e| e.weight).sum();
        assert!((weighted / weight - result.percentile).abs() < 0.1);
    }
}

#[test]
fn confidence_interval_brackets_the_point_estimate() {
    let calc = calculator();
    let answers = all_best();
    let point = calc.score(&answers).percentile;
    let ci = calc.score_with_confidence_interval(&answers, SimulationConfig::seeded(1000, 42));

    assert!(ci.ci_lower <= ci.median && ci.median <= ci.ci_upper);
    assert!(ci.ci_range < 15.0, "interval too wide: {}", ci.ci_range);
    // Noise is zero-mean, so the median converges on the point estimate.
    assert!(
        (ci.median - point).abs() <= 2.0,
        "median {} strayed from point estimate {point}",
        ci.median
    );
}

#[test]
fn confidence_interval_median_converges_for_partial_answers() {
    let calc = calculator();
    let answers = AnswerSet::new()
        .with(FactorId::Income, "middle-bracket")
        .with(FactorId::Education, "secondary");
    let point = calc.score(&answers).percentile;
    let ci = calc.score_with_confidence_interval(&answers, SimulationConfig::seeded(2000, 7));
    assert!((ci.median - point).abs() <= 2.0);
}

#[test]
fn single_iteration_has_no_interval() {
    let ci = calculator().score_with_confidence_interval(&all_best(), SimulationConfig::seeded(1, 42));
    assert!(ci.ci_range < 1.0);
}

#[test]
fn score_result_serializes_for_the_renderer() {
    let result = calculator().score(&all_best());
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["percentile"].is_number());
    assert_eq!(json["metadata"]["factors_included"], 7);
    assert!(json["per_factor"]["income"].is_number());
}
