use std::sync::LazyLock;

use regex::Regex;

use super::scan::{WHITELIST_CALL, call_argument, normalize_key, regex};
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

/// `$alert.key = <expr>`, group 1 is the expression up to the end of line.
static ALERT_KEY: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?m)\$alert\.key\s*=\s*(.+?)\s*$"));

/// Key a whitelisting macro may use to forward a sub-rule's alert key.
const FORWARDED_KEY: &str = "lower(alert.key)";

/// The second argument of every whitelisting macro must be the expression
/// assigned to `$alert.key`.
pub struct WhitelistKeyValidator;

impl Validator for WhitelistKeyValidator {
    fn rule(&self) -> LintRule {
        LintRule::WhitelistKeyMismatch
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let text = ctx.text();
        let Some(alert_key) = ALERT_KEY.captures(text).and_then(|c| c.get(1)) else {
            return Vec::new();
        };
        let alert_key = normalize_key(alert_key.as_str());
        if alert_key == "alert.key" {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        let mut budget = ctx.budget();

        for call in WHITELIST_CALL.find_iter(text) {
            let Some(span) = key_argument(text, call.end()) else {
                continue;
            };
            let key = normalize_key(&text[span.clone()]);
            if key == FORWARDED_KEY || key == alert_key {
                continue;
            }
            let d = ctx.diagnostic(
                self.rule(),
                Severity::Warning,
                span,
                "The whitelisting key differs from the $alert.key value",
            );
            if !budget.push(&mut diagnostics, d) {
                break;
            }
        }

        diagnostics
    }
}

/// Span of the argument following the rule-name literal that ends at `from`.
fn key_argument(text: &str, from: usize) -> Option<std::ops::Range<usize>> {
    let rest = &text[from..];
    let comma = from + (rest.len() - rest.trim_start().len());
    if !text[comma..].starts_with(',') {
        return None;
    }
    call_argument(text, comma + 1)
}
