//! The validator contract and the helpers every validator shares.
//!
//! A validator scans raw rule text for one defect pattern. There is no parser
//! behind this: each check is a handful of regular expressions plus the
//! offset arithmetic in [`ValidationContext`].

mod block_assignment;
mod filter_equals;
mod importance_severity;
mod lower_comparison;
mod nested_lower;
mod number_concat;
mod scan;
mod whitelist_key;
mod whitelist_name;

pub use block_assignment::BlockAssignmentValidator;
pub use filter_equals::FilterEqualsValidator;
pub use importance_severity::ImportanceSeverityValidator;
pub use lower_comparison::LowerComparisonValidator;
pub use nested_lower::NestedLowerValidator;
pub use number_concat::NumberConcatValidator;
pub use whitelist_key::WhitelistKeyValidator;
pub use whitelist_name::WhitelistNameValidator;

use std::ops::Range as Span;

use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::document::TextDocument;
use crate::settings::DocumentSettings;

/// One semantic check over rule source text.
///
/// Implementations must not panic on any input; a missing anchor (no rule
/// name, no `$alert.key`, ...) means "nothing to report".
pub trait Validator: Send + Sync {
    /// The rule reported by this validator.
    fn rule(&self) -> LintRule;

    /// Dialect identifiers this validator applies to.
    fn languages(&self) -> &'static [&'static str];

    /// Rule-specific scan. Only called for applicable documents; go through
    /// [`validate`](dyn Validator::validate) instead of calling this directly.
    fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic>;
}

impl dyn Validator + '_ {
    pub fn applies_to(&self, language_id: &str) -> bool {
        self.languages().contains(&language_id)
    }

    /// Run the check if the document's dialect is one this validator handles.
    pub fn validate(
        &self,
        document: &TextDocument,
        settings: &DocumentSettings,
    ) -> Vec<Diagnostic> {
        if !self.applies_to(document.language_id()) {
            return Vec::new();
        }
        self.check(&ValidationContext::new(document, settings))
    }
}

/// What a validator sees during one pass.
pub struct ValidationContext<'a> {
    document: &'a TextDocument,
    settings: &'a DocumentSettings,
}

impl<'a> ValidationContext<'a> {
    pub fn new(document: &'a TextDocument, settings: &'a DocumentSettings) -> Self {
        Self { document, settings }
    }

    pub fn text(&self) -> &'a str {
        self.document.text()
    }

    /// A fresh findings budget for one pattern loop.
    pub fn budget(&self) -> Budget {
        Budget::new(self.settings.max_number_of_problems)
    }

    /// Build a diagnostic for a byte span of the document.
    pub fn diagnostic(
        &self,
        rule: LintRule,
        severity: Severity,
        span: Span<usize>,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::new(rule, severity, self.document.range_at(span), message)
    }

    /// Build a diagnostic for a span that is relative to an extracted slice
    /// starting at document offset `base`.
    pub fn diagnostic_in(
        &self,
        rule: LintRule,
        severity: Severity,
        base: usize,
        local: Span<usize>,
        message: impl Into<String>,
    ) -> Diagnostic {
        self.diagnostic(rule, severity, base + local.start..base + local.end, message)
    }
}

/// Caps the number of findings a single pattern loop may emit.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    remaining: usize,
}

impl Budget {
    pub fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Push `diagnostic` if there is room left. Returns `false` once the
    /// budget is spent so the caller can stop scanning.
    pub fn push(&mut self, out: &mut Vec<Diagnostic>, diagnostic: Diagnostic) -> bool {
        if self.remaining == 0 {
            return false;
        }
        out.push(diagnostic);
        self.remaining -= 1;
        self.remaining > 0
    }
}

/// True if `s` contains an uppercase letter (any script).
pub(crate) fn has_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    struct Noisy;

    impl Validator for Noisy {
        fn rule(&self) -> LintRule {
            LintRule::FilterSingleEquals
        }

        fn languages(&self) -> &'static [&'static str] {
            &["co"]
        }

        fn check(&self, ctx: &ValidationContext<'_>) -> Vec<Diagnostic> {
            vec![ctx.diagnostic(self.rule(), Severity::Hint, 0..1, "always")]
        }
    }

    #[test]
    fn guard_skips_other_dialects() {
        assert_eq!(run(&Noisy, &co("x")).len(), 1);
        assert!(run(&Noisy, &en("x")).is_empty());
        assert!(run(&Noisy, &xp("x")).is_empty());
    }

    #[test]
    fn budget_stops_at_limit() {
        let doc = co("abc");
        let settings = DocumentSettings::new(2);
        let ctx = ValidationContext::new(&doc, &settings);
        let mut budget = ctx.budget();
        let mut out = Vec::new();
        let d = ctx.diagnostic(LintRule::FilterSingleEquals, Severity::Error, 0..1, "m");
        assert!(budget.push(&mut out, d.clone()));
        assert!(!budget.push(&mut out, d.clone()));
        assert!(budget.is_exhausted());
        assert!(!budget.push(&mut out, d));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn diagnostic_in_translates_offsets() {
        let doc = co("head\nbody x = 1");
        let settings = DocumentSettings::default();
        let ctx = ValidationContext::new(&doc, &settings);
        let d = ctx.diagnostic_in(LintRule::FieldAssignmentInBlock, Severity::Error, 5, 5..10, "m");
        assert_eq!(d.range.start.line, 1);
        assert_eq!(d.range.start.character, 5);
        assert_eq!(d.range.end.character, 10);
    }

    #[test]
    fn uppercase_detection_covers_cyrillic() {
        assert!(has_uppercase("Служба"));
        assert!(has_uppercase("directory Service"));
        assert!(!has_uppercase("служба 42 _"));
    }
}
