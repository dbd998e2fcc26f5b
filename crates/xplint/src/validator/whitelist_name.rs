use std::sync::LazyLock;

use regex::Regex;

use super::scan::{WHITELIST_CALL, group_span, regex};
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

/// `rule <name>:` at the start of a line. Group 1 is the name.
static RULE_NAME: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)^\s*rule\s+([^\s:]+)\s*:"));

/// The first argument of every whitelisting macro must be the rule's own name.
pub struct WhitelistNameValidator;

impl Validator for WhitelistNameValidator {
    fn rule(&self) -> LintRule {
        LintRule::WhitelistRuleNameMismatch
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let text = ctx.text();
        let Some(rule_name) = RULE_NAME.captures(text).and_then(|c| c.get(1)) else {
            return Vec::new();
        };
        let rule_name = rule_name.as_str();

        let mut diagnostics = Vec::new();
        let mut budget = ctx.budget();

        for caps in WHITELIST_CALL.captures_iter(text) {
            let Some(span) = group_span(&caps, 1) else {
                continue;
            };
            if &text[span.clone()] == rule_name {
                continue;
            }
            let d = ctx.diagnostic(
                self.rule(),
                Severity::Error,
                span,
                format!(
                    "The first argument of the whitelisting macro differs from the rule name \
                     '{rule_name}'"
                ),
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

    const RULE: &str = "\
rule ESC_Test: e

    on e {
        $subject = \"account\"
    }

emit {
    $alert.key = $host.name
    $x = filter::CheckWL_Networking(\"ESC_Other\", $host.name)
}
";

    #[test]
    fn mismatched_name_flagged_on_literal() {
        let doc = co(RULE);
        let d = run(&WhitelistNameValidator, &doc);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].severity, Severity::Error);
        assert_eq!(covered(&doc, &d[0]), "ESC_Other");
        assert_eq!(d[0].range.start.line, 8);
    }

    #[test]
    fn matching_name_ok() {
        let doc = co(&RULE.replace("ESC_Other", "ESC_Test"));
        assert!(run(&WhitelistNameValidator, &doc).is_empty());
    }

    #[test]
    fn each_call_site_reported() {
        let text = format!(
            "{RULE}filter::CheckWL_Tasks(\"ESC_Test\", x)\nfilter::CheckWL_Tasks(\"Nope\", x)\n"
        );
        let d = run(&WhitelistNameValidator, &co(&text));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn only_first_rule_declaration_counts() {
        let text = format!("{RULE}rule ESC_Other:\n");
        assert_eq!(run(&WhitelistNameValidator, &co(&text)).len(), 1);
    }

    #[test]
    fn no_rule_declaration_no_findings() {
        let doc = co("filter::CheckWL_Networking(\"ESC_Other\", $host.name)");
        assert!(run(&WhitelistNameValidator, &doc).is_empty());
    }
}
