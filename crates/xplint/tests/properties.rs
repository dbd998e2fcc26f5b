mod helpers;

use helpers::{EVERYTHING_WRONG, covered, doc, lint, run};
use xplint::validator::{
    LowerComparisonValidator, WhitelistKeyValidator, WhitelistNameValidator,
};
use xplint::{DocumentSettings, LintRule, SOURCE, Severity, Validator, ValidatorRegistry};

#[test]
fn every_rule_fires_on_correlation_source() {
    let diagnostics = lint("co", EVERYTHING_WRONG);
    let mut rules: Vec<_> = diagnostics.iter().map(|d| d.rule).collect();
    rules.dedup();
    assert_eq!(rules, LintRule::ALL, "{diagnostics:#?}");
    assert!(diagnostics.iter().all(|d| d.source == SOURCE));
}

#[test]
fn enrichment_source_only_gets_shared_rules() {
    let rules: Vec<_> = lint("en", EVERYTHING_WRONG).iter().map(|d| d.rule).collect();
    assert_eq!(
        rules,
        [LintRule::NumberToStringConcat, LintRule::FilterSingleEquals]
    );
}

#[test]
fn inapplicable_dialects_get_nothing() {
    for language_id in ["xp", "", "plaintext", "CO"] {
        assert!(
            lint(language_id, EVERYTHING_WRONG).is_empty(),
            "{language_id} was flagged"
        );
    }
}

#[test]
fn validation_is_deterministic() {
    let registry = ValidatorRegistry::with_defaults();
    let document = doc("co", EVERYTHING_WRONG);
    let settings = DocumentSettings::default();
    assert_eq!(
        registry.run(&document, &settings),
        registry.run(&document, &settings)
    );
}

#[test]
fn lowered_comparison_with_uppercase_literal() {
    let text = "filter {\n    lower(event_src.subsys) == \"Directory Service\"\n}\n";
    let diagnostics = run(&LowerComparisonValidator, "co", text);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(
        covered(text, &diagnostics[0]),
        "lower(event_src.subsys) == \"Directory Service\""
    );

    let text = "filter {\n    lower(x) == \"directory service\"\n}\n";
    assert!(run(&LowerComparisonValidator, "co", text).is_empty());
}

#[test]
fn whitelist_key_consistency() {
    let ok = "rule R: e\n$alert.key = $host.name\n$wl = filter::CheckWL_Networking(\"R\", $host.name)\n";
    assert!(run(&WhitelistKeyValidator, "co", ok).is_empty());

    let bad = "rule R: e\n$alert.key = $host.name\n$wl = filter::CheckWL_Networking(\"R\", $user.name)\n";
    let diagnostics = run(&WhitelistKeyValidator, "co", bad);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(covered(bad, &diagnostics[0]), "$user.name");
}

#[test]
fn whitelist_name_range_is_the_literal() {
    let text = "rule ESC_Test: e\n$wl = filter::CheckWL_Networking(\"ESC_Other\", $host.name)\n";
    let diagnostics = run(&WhitelistNameValidator, "co", text);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(covered(text, &diagnostics[0]), "ESC_Other");
}

#[test]
fn cap_holds_for_registered_validators() {
    let max = 7;
    let text: String = (0..max + 5)
        .map(|i| format!("lower($f{i}) == \"Upper\"\n"))
        .collect();
    let settings = DocumentSettings::new(max);
    let document = doc("co", &text);

    let validator: &dyn Validator = &LowerComparisonValidator;
    assert_eq!(validator.validate(&document, &settings).len(), max);
    assert_eq!(
        ValidatorRegistry::with_defaults()
            .run(&document, &settings)
            .len(),
        max
    );
}

#[test]
fn diagnostics_serialize_to_wire_shape() {
    let text = "lower($a) == \"A\"";
    let diagnostics = run(&LowerComparisonValidator, "co", text);
    let json = serde_json::to_value(&diagnostics[0]).unwrap();
    assert_eq!(json["severity"], 1);
    assert_eq!(json["source"], SOURCE);
    assert_eq!(json["range"]["start"]["line"], 0);
    assert_eq!(json["range"]["end"]["character"], 16);
}

#[test]
fn reported_severity_matches_rule_default() {
    for d in lint("co", EVERYTHING_WRONG) {
        assert_eq!(d.severity, d.rule.default_severity(), "{}", d.rule);
    }
}
