use std::sync::LazyLock;

use regex::Regex;

use super::scan::regex;
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::{CORRELATION, ENRICHMENT};

/// Taxonomy fields of type Number.
// TODO: derive this list from the taxonomy file instead of hard-coding it.
const NUMERIC_FIELDS: &[&str] = &[
    r"dst\.port",
    r"src\.port",
    "assigned_dst_port",
    "assigned_src_port",
    "count",
    r"dst\.geo\.asn",
    r"src\.geo\.asn",
    "duration",
    r"external_dst\.geo\.asn",
    r"external_src\.geo\.asn",
    "logon_type",
    r"numfield\d+",
];

/// `field + "literal"` or `"literal" + field` for a numeric field.
static NUMERIC_CONCAT: LazyLock<Regex> = LazyLock::new(|| {
    let field = format!(r"\$?\b(?:{})\b", NUMERIC_FIELDS.join("|"));
    let literal = r#""[^"\n]*""#;
    regex(&format!(
        r"{field}\s*\+\s*{literal}|{literal}\s*\+\s*{field}"
    ))
});

/// Warns when a numeric field is concatenated with a string literal without
/// an explicit `string()` conversion.
pub struct NumberConcatValidator;

impl Validator for NumberConcatValidator {
    fn rule(&self) -> LintRule {
        LintRule::NumberToStringConcat
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION, ENRICHMENT]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut budget = ctx.budget();

        for m in NUMERIC_CONCAT.find_iter(ctx.text()) {
            let d = ctx.diagnostic(
                self.rule(),
                Severity::Warning,
                m.range(),
                "Possible implicit conversion of a Number to a string, which can produce an \
                 empty string. Use string() to convert explicitly",
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
    fn port_concatenation_both_sides() {
        let doc = co(concat!(
            "$text1 = \"Port: \" + dst.port\n",
            "$text2 = src.port + \" is open\"\n",
        ));
        let d = run(&NumberConcatValidator, &doc);
        assert_eq!(d.len(), 2);
        assert!(d.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(covered(&doc, &d[0]), "\"Port: \" + dst.port");
        assert_eq!(covered(&doc, &d[1]), "src.port + \" is open\"");
    }

    #[test]
    fn numfield_and_sigil() {
        let doc = en("$x = \"n=\" + $numfield12");
        assert_eq!(run(&NumberConcatValidator, &doc).len(), 1);
    }

    #[test]
    fn explicit_conversion_ok() {
        let doc = co(concat!(
            "$text = \"Port: \" + string(dst.port)\n",
            "$n = dst.port + 1\n",
            "$s = object.name + \"x\"\n",
        ));
        assert!(run(&NumberConcatValidator, &doc).is_empty());
    }

    #[test]
    fn field_name_must_match_whole_word() {
        let doc = co("$s = account + \"x\"\n$t = \"y\" + countries");
        assert!(run(&NumberConcatValidator, &doc).is_empty());
    }

    #[test]
    fn normalization_ignored() {
        let doc = xp("$x = \"Port: \" + dst.port");
        assert!(run(&NumberConcatValidator, &doc).is_empty());
    }
}
