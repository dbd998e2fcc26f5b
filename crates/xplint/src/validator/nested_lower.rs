use std::sync::LazyLock;

use regex::Regex;

use super::scan::regex;
use super::{ValidationContext, Validator, has_uppercase};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

/// `func(lower(expr), "literal"` for each matching function. Group 1 is the
/// literal.
static NESTED_CALLS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    ["find_substr", "match", "regex"].map(|func| {
        regex(&format!(
            r#"\b{func}\s*\(\s*lower\s*\(\s*\S+?\s*\)\s*,\s*"([^"\n]*)""#
        ))
    })
});

/// `\A`, `\B`, `\S` or `\W` used as a regex token: followed by a
/// quantifier, `.` or the end of the literal. Path segments such as
/// `\Windows` do not match.
static CLASS_ESCAPE: LazyLock<Regex> = LazyLock::new(|| regex(r"\\[ABSW](?:[+*?.]+|$)"));

/// Flags `find_substr`, `match` and `regex` calls over a lowered value whose
/// pattern still contains uppercase letters.
pub struct NestedLowerValidator;

impl Validator for NestedLowerValidator {
    fn rule(&self) -> LintRule {
        LintRule::NestedLowerCase
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for pattern in NESTED_CALLS.iter() {
            let mut budget = ctx.budget();
            for caps in pattern.captures_iter(ctx.text()) {
                let (Some(whole), Some(literal)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if !has_uppercase(&strip_class_escapes(literal.as_str())) {
                    continue;
                }
                let d = ctx.diagnostic(
                    self.rule(),
                    Severity::Error,
                    whole.range(),
                    "Condition is always false: the first argument is lowered but the \
                     second one contains uppercase letters",
                );
                if !budget.push(&mut diagnostics, d) {
                    break;
                }
            }
        }

        diagnostics
    }
}

/// Drop regex class escape tokens together with their quantifiers.
fn strip_class_escapes(literal: &str) -> std::borrow::Cow<'_, str> {
    CLASS_ESCAPE.replace_all(literal, "")
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn find_substr_uppercase_flagged() {
        let doc = co(r#"find_substr(lower(object.path), "Windows") != null"#);
        let d = run(&NestedLowerValidator, &doc);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].severity, Severity::Error);
        assert_eq!(covered(&doc, &d[0]), r#"find_substr(lower(object.path), "Windows""#);
    }

    #[test]
    fn match_and_regex_flagged() {
        let doc = co(concat!(
            "match(lower(object.name), \"*Temp*\")\n",
            "regex(lower(object.name), \"c:\\\\Users\", 0) != null\n",
        ));
        let d = run(&NestedLowerValidator, &doc);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].range.start.line, 0);
        assert_eq!(d[1].range.start.line, 1);
    }

    #[test]
    fn lowercase_pattern_ok() {
        let doc = co(r#"find_substr(lower(object.path), "windows\system32")"#);
        assert!(run(&NestedLowerValidator, &doc).is_empty());
    }

    #[test]
    fn quantified_class_escapes_are_not_uppercase() {
        let doc = co(r#"regex(lower(object.query), "select\s+\S+from\W*where\B.", 0)"#);
        assert!(run(&NestedLowerValidator, &doc).is_empty());
        let doc = co(r#"match(lower(object.name), "temp\S")"#);
        assert!(run(&NestedLowerValidator, &doc).is_empty());
    }

    #[test]
    fn path_literal_flagged() {
        let doc = co(r#"find_substr(lower(object.path), "c:\Windows\System32")"#);
        assert_eq!(run(&NestedLowerValidator, &doc).len(), 1);
    }

    #[test]
    fn strip_keeps_unquantified_escapes() {
        assert_eq!(strip_class_escapes(r"a\S+b"), "ab");
        assert_eq!(strip_class_escapes(r"a\W*?.b"), "ab");
        assert_eq!(strip_class_escapes(r"end\A"), "end");
        assert_eq!(strip_class_escapes(r"\System32"), r"\System32");
        assert_eq!(strip_class_escapes(r"a\D+"), r"a\D+");
    }

    #[test]
    fn call_without_lower_ignored() {
        let doc = co(r#"find_substr(object.path, "Windows")"#);
        assert!(run(&NestedLowerValidator, &doc).is_empty());
    }

    #[test]
    fn enrichment_ignored() {
        let doc = en(r#"match(lower(x), "ABC")"#);
        assert!(run(&NestedLowerValidator, &doc).is_empty());
    }

    #[test]
    fn cap_applies_per_pattern() {
        let mut text = "find_substr(lower(a), \"X\")\n".repeat(4);
        text.push_str(&"match(lower(a), \"X\")\n".repeat(4));
        let d = run_capped(&NestedLowerValidator, &co(&text), 2);
        assert_eq!(d.len(), 4);
        assert_eq!(d[2].range.start.line, 4);
    }
}
