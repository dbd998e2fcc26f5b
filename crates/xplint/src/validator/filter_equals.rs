use std::sync::LazyLock;

use regex::Regex;

use super::scan::{blocks, regex};
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::{CORRELATION, ENRICHMENT};

static FILTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)\b(filter)\s*\{(.*?)\}"));

/// ` ident = "literal"`. Group 1 is the identifier, group 2 the run of `=`
/// characters, so `==` can be told apart from `=`.
static EQUALS_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"\s+(\S+)\s+(=+)\s+"[^"\n]*""#));

/// Flags `=` used where a `filter { }` block needs `==`.
pub struct FilterEqualsValidator;

impl Validator for FilterEqualsValidator {
    fn rule(&self) -> LintRule {
        LintRule::FilterSingleEquals
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION, ENRICHMENT]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for block in blocks(&FILTER_BLOCK, ctx.text()) {
            let mut budget = ctx.budget();
            for caps in EQUALS_LITERAL.captures_iter(block.body) {
                let (Some(whole), Some(ident), Some(op)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                if op.as_str() != "=" {
                    continue;
                }
                let d = ctx.diagnostic_in(
                    self.rule(),
                    Severity::Error,
                    block.body_start,
                    ident.start()..whole.end(),
                    "Values in a filter block are compared with ==",
                );
                if !budget.push(&mut diagnostics, d) {
                    break;
                }
            }
        }

        diagnostics
    }
}
