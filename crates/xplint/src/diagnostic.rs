//! Diagnostics produced by a validation pass.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::position::Range;

/// Source tag carried by every diagnostic produced by this crate.
pub const SOURCE: &str = "xp";

/// Severity of a finding. The numeric values follow the editor protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The rule is wrong and will misbehave.
    Error = 1,
    /// Likely bug, worth a look.
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl Severity {
    /// Protocol number (1 = Error … 4 = Hint).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse the spelling used in `.xplint.yml`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "information" | "info" => Some(Severity::Information),
            "hint" => Some(Severity::Hint),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Identifies which validator produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LintRule {
    LowerComparisonCase,
    NestedLowerCase,
    FieldAssignmentInBlock,
    NumberToStringConcat,
    FilterSingleEquals,
    WhitelistKeyMismatch,
    WhitelistRuleNameMismatch,
    ImportanceSeverityMismatch,
}

impl LintRule {
    /// Every rule, in registration order.
    pub const ALL: [LintRule; 8] = [
        LintRule::LowerComparisonCase,
        LintRule::NestedLowerCase,
        LintRule::FieldAssignmentInBlock,
        LintRule::NumberToStringConcat,
        LintRule::FilterSingleEquals,
        LintRule::WhitelistKeyMismatch,
        LintRule::WhitelistRuleNameMismatch,
        LintRule::ImportanceSeverityMismatch,
    ];

    /// Stable snake_case code used in configs, suppressions and output.
    pub fn code(self) -> &'static str {
        match self {
            LintRule::LowerComparisonCase => "lower_comparison_case",
            LintRule::NestedLowerCase => "nested_lower_case",
            LintRule::FieldAssignmentInBlock => "field_assignment_in_block",
            LintRule::NumberToStringConcat => "number_to_string_concat",
            LintRule::FilterSingleEquals => "filter_single_equals",
            LintRule::WhitelistKeyMismatch => "whitelist_key_mismatch",
            LintRule::WhitelistRuleNameMismatch => "whitelist_rule_name_mismatch",
            LintRule::ImportanceSeverityMismatch => "importance_severity_mismatch",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Severity the built-in validator reports this rule with.
    pub fn default_severity(self) -> Severity {
        match self {
            LintRule::NumberToStringConcat
            | LintRule::WhitelistKeyMismatch
            | LintRule::ImportanceSeverityMismatch => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// One-line summary for `xplint rules`.
    pub fn summary(self) -> &'static str {
        match self {
            LintRule::LowerComparisonCase => {
                "lower(x) compared with a literal that contains uppercase letters"
            }
            LintRule::NestedLowerCase => {
                "find_substr/match/regex over lower(x) with an uppercase literal"
            }
            LintRule::FieldAssignmentInBlock => {
                "event field assigned without $ inside an on/emit block"
            }
            LintRule::NumberToStringConcat => {
                "numeric field concatenated with a string without string()"
            }
            LintRule::FilterSingleEquals => "single '=' used for comparison inside filter {}",
            LintRule::WhitelistKeyMismatch => {
                "whitelisting macro key differs from the $alert.key value"
            }
            LintRule::WhitelistRuleNameMismatch => {
                "whitelisting macro rule name differs from the declared rule name"
            }
            LintRule::ImportanceSeverityMismatch => {
                "$importance and $incident.severity disagree"
            }
        }
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for LintRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A single finding anchored to a range of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub source: &'static str,
    /// Which rule fired; published as the diagnostic code.
    #[serde(rename = "code")]
    pub rule: LintRule,
}

impl Diagnostic {
    pub fn new(rule: LintRule, severity: Severity, range: Range, message: impl Into<String>) -> Self {
        Self {
            severity,
            range,
            message: message.into(),
            source: SOURCE,
            rule,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}\n    --> {}:{}",
            self.severity,
            self.rule,
            self.message,
            self.range.start.line + 1,
            self.range.start.character + 1
        )
    }
}
