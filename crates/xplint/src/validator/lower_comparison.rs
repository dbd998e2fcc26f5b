use std::sync::LazyLock;

use regex::Regex;

use super::scan::regex;
use super::{ValidationContext, Validator, has_uppercase};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

/// `lower(expr) == "literal"` / `!=`, group 1 is the literal.
static LOWER_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"\blower\s*\(\s*\S+?\s*\)\s*(?:==|!=)\s*"([^"\n]*)""#));

/// Flags comparisons of a lowered value against a literal that still has
/// uppercase letters. Such a comparison can never be true.
pub struct LowerComparisonValidator;

impl Validator for LowerComparisonValidator {
    fn rule(&self) -> LintRule {
        LintRule::LowerComparisonCase
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut budget = ctx.budget();

        for caps in LOWER_COMPARISON.captures_iter(ctx.text()) {
            let (Some(whole), Some(literal)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !has_uppercase(literal.as_str()) {
                continue;
            }
            let d = ctx.diagnostic(
                self.rule(),
                Severity::Error,
                whole.range(),
                "Condition is always false: the lower() result is compared with a literal \
                 that contains uppercase letters",
            );
            if !budget.push(&mut diagnostics, d) {
                break;
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn uppercase_literal_flagged() {
        let doc = co(r#"filter { lower(event_src.subsys) == "Directory Service" }"#);
        let d = run(&LowerComparisonValidator, &doc);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].severity, Severity::Error);
        assert_eq!(d[0].rule, LintRule::LowerComparisonCase);
        assert_eq!(
            covered(&doc, &d[0]),
            r#"lower(event_src.subsys) == "Directory Service""#
        );
    }

    #[test]
    fn not_equals_flagged() {
        let doc = co(r#"lower(event_src.subsys) != "Directory Service""#);
        assert_eq!(run(&LowerComparisonValidator, &doc).len(), 1);
    }

    #[test]
    fn lowercase_literal_ok() {
        let doc = co(r#"lower(x) == "directory service""#);
        assert!(run(&LowerComparisonValidator, &doc).is_empty());
    }

    #[test]
    fn cyrillic_uppercase_flagged() {
        let doc = co(r#"lower(object.name) == "Служба""#);
        assert_eq!(run(&LowerComparisonValidator, &doc).len(), 1);
    }

    #[test]
    fn one_diagnostic_per_comparison() {
        let doc = co(r#"lower(a) == "ABC" and lower(b) == "ok" or lower(c) != "Xy""#);
        let d = run(&LowerComparisonValidator, &doc);
        assert_eq!(d.len(), 2);
        assert_eq!(covered(&doc, &d[0]), r#"lower(a) == "ABC""#);
        assert_eq!(covered(&doc, &d[1]), r#"lower(c) != "Xy""#);
    }

    #[test]
    fn other_dialects_ignored() {
        let text = r#"lower(a) == "ABC""#;
        assert!(run(&LowerComparisonValidator, &en(text)).is_empty());
        assert!(run(&LowerComparisonValidator, &xp(text)).is_empty());
    }

    #[test]
    fn cap_limits_findings() {
        let text = "lower(a) == \"A\"\n".repeat(8);
        let d = run_capped(&LowerComparisonValidator, &co(&text), 3);
        assert_eq!(d.len(), 3);
        assert_eq!(d[2].range.start.line, 2);
    }

    #[test]
    fn deterministic() {
        let doc = co("lower(a) == \"A\"\nlower(b) != \"B\"");
        assert_eq!(
            run(&LowerComparisonValidator, &doc),
            run(&LowerComparisonValidator, &doc)
        );
    }
}
