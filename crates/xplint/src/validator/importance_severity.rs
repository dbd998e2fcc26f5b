use std::sync::LazyLock;

use regex::Regex;

use super::scan::regex;
use super::{ValidationContext, Validator};
use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::CORRELATION;

static IMPORTANCE: LazyLock<Regex> = LazyLock::new(|| regex(r#"\$importance\s*=\s*"(\S+?)""#));

/// A quoted severity, group 1 is the value. An unquoted `$importance`
/// assignment is a passthrough and never matches.
static INCIDENT_SEVERITY: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"\$incident\.severity\s*=\s*"(\S+?)""#));

/// Severity value that forwards the importance.
const PASSTHROUGH: &str = "$importance";

/// `$importance` and `$incident.severity` must agree. Reports at most once
/// per document.
pub struct ImportanceSeverityValidator;

impl Validator for ImportanceSeverityValidator {
    fn rule(&self) -> LintRule {
        LintRule::ImportanceSeverityMismatch
    }

    fn languages(&self) -> &'static [&'static str] {
        &[CORRELATION]
    }

    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
        let text = ctx.text();
        let Some(importance) = IMPORTANCE.captures(text).and_then(|c| c.get(1)) else {
            return Vec::new();
        };
        let Some(severity) = INCIDENT_SEVERITY.captures(text) else {
            return Vec::new();
        };
        let (Some(whole), Some(value)) = (severity.get(0), severity.get(1)) else {
            return Vec::new();
        };
        if value.as_str() == importance.as_str() || value.as_str() == PASSTHROUGH {
            return Vec::new();
        }

        vec![ctx.diagnostic(
            self.rule(),
            Severity::Warning,
            whole.range(),
            format!(
                "Alert importance \"{}\" differs from incident severity \"{}\"",
                importance.as_str(),
                value.as_str()
            ),
        )]
    }
}
