use std::sync::LazyLock;

use regex::Regex;

use super::scan::{blocks, regex};
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

/// `on <event> { ... }` and `emit { ... }`. Group 1 is the header, group 2
/// the body. Bodies end at the first `}`.
static EVENT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?s)\b(on\s+[^\s{]+|emit)\s*\{(.*?)\}"));

/// A line starting with a bare identifier followed by `=` or `==`. Group 1
/// is the identifier, group 2 the operator.
static BARE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?m)^\s+([a-z0-9_.]+)\s*(==?)\s*\S+"));

/// Inside `on`/`emit` blocks only `$`-prefixed fields may be assigned.
pub struct BlockAssignmentValidator;

impl Validator for BlockAssignmentValidator {
    fn rule(&self) -> LintRule {
        LintRule::FieldAssignmentInBlock
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for block in blocks(&EVENT_BLOCK, ctx.text()) {
            let mut budget = ctx.budget();
            for caps in BARE_ASSIGNMENT.captures_iter(block.body) {
                let (Some(whole), Some(field), Some(op)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                if op.as_str() != "=" {
                    continue;
                }
                let span = field.start()..whole.end();
                let field = field.as_str();
                let d = ctx.diagnostic_in(
                    self.rule(),
                    Severity::Error,
                    block.body_start,
                    span,
                    format!(
                        "Assigning event field {field} is not allowed in block '{}'. Use ${field}",
                        block.header
                    ),
                );
                if !budget.push(&mut diagnostics, d) {
                    break;
                }
            }
        }

        diagnostics
    }
}
