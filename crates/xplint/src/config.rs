//! Lint configuration and suppression.
//!
//! Rules can be silenced or re-graded from a `.xplint.yml` file:
//!
//! ```yaml
//! disabled_rules:
//!   - number_to_string_concat
//! severity_overrides:
//!   whitelist_key_mismatch: error
//! max_number_of_problems: 200
//! ```
//!
//! and inline, with `#` comments in the rule source:
//!
//! - `# xplint-disable` silences every rule for the file
//! - `# xplint-disable rule_a, rule_b` silences the listed rules for the file
//! - `# xplint-disable-next-line [rule_a, ...]` does the same for the next line

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostic::{Diagnostic, LintRule, Severity};
use crate::error::{Result, XpLintError};
use crate::settings::DocumentSettings;

/// File names probed by [`LintConfig::find_in_ancestors`].
pub const CONFIG_FILE_NAMES: [&str; 2] = [".xplint.yml", ".xplint.yaml"];

/// Suppressions, severity overrides and an optional findings cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintConfig {
    pub disabled_rules: HashSet<LintRule>,
    pub severity_overrides: HashMap<LintRule, Severity>,
    pub max_number_of_problems: Option<usize>,
}

/// Raw YAML shape for `.xplint.yml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLintConfig {
    #[serde(default)]
    disabled_rules: Vec<String>,
    #[serde(default)]
    severity_overrides: HashMap<String, String>,
    #[serde(default)]
    max_number_of_problems: Option<usize>,
}

fn parse_rule(code: &str) -> Result<LintRule> {
    LintRule::from_code(code)
        .ok_or_else(|| XpLintError::InvalidConfig(format!("unknown rule '{code}'")))
}

impl LintConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawLintConfig = serde_yaml::from_str(content)?;

        let disabled_rules = raw
            .disabled_rules
            .iter()
            .map(|code| parse_rule(code))
            .collect::<Result<HashSet<_>>>()?;

        let mut severity_overrides = HashMap::new();
        for (code, sev) in &raw.severity_overrides {
            let rule = parse_rule(code)?;
            let severity = Severity::from_name(sev).ok_or_else(|| {
                XpLintError::InvalidConfig(format!(
                    "invalid severity '{sev}' for rule '{code}' in lint config"
                ))
            })?;
            severity_overrides.insert(rule, severity);
        }

        Ok(LintConfig {
            disabled_rules,
            severity_overrides,
            max_number_of_problems: raw.max_number_of_problems,
        })
    }

    /// Load a config from a `.xplint.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Walk up from `start_path` to find the nearest `.xplint.yml`.
    pub fn find_in_ancestors(start_path: &Path) -> Option<PathBuf> {
        let dir = if start_path.is_file() {
            start_path.parent()?
        } else {
            start_path
        };

        let mut current = dir;
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            current = current.parent()?;
        }
    }

    /// Merge another config into this one (e.g. CLI `--disable` into file config).
    pub fn merge(&mut self, other: &LintConfig) {
        self.disabled_rules.extend(other.disabled_rules.iter().copied());
        self.severity_overrides
            .extend(other.severity_overrides.iter().map(|(r, s)| (*r, *s)));
        if other.max_number_of_problems.is_some() {
            self.max_number_of_problems = other.max_number_of_problems;
        }
    }

    pub fn is_disabled(&self, rule: LintRule) -> bool {
        self.disabled_rules.contains(&rule)
    }

    /// `settings` with the configured cap applied, if there is one.
    pub fn settings_over(&self, settings: DocumentSettings) -> DocumentSettings {
        match self.max_number_of_problems {
            Some(max) => DocumentSettings::new(max),
            None => settings,
        }
    }
}

// =============================================================================
// Inline suppression comments
// =============================================================================

/// Parsed inline suppression directives from rule source text.
#[derive(Debug, Clone, Default)]
pub struct InlineSuppressions {
    /// If `true`, all rules are suppressed for the entire file.
    pub disable_all: bool,
    /// Rules suppressed for the entire file.
    pub file_disabled: HashSet<String>,
    /// Rules suppressed per zero-based line; `None` means all rules.
    pub line_disabled: HashMap<u32, Option<HashSet<String>>>,
}

fn parse_rule_list(rest: &str) -> HashSet<String> {
    rest.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `# xplint-disable` comments from rule source text.
pub fn parse_inline_suppressions(text: &str) -> InlineSuppressions {
    let mut result = InlineSuppressions::default();

    for (i, line) in text.lines().enumerate() {
        let Some(pos) = find_comment(line) else {
            continue;
        };
        let comment = line[pos + 1..].trim();

        if let Some(rest) = comment.strip_prefix("xplint-disable-next-line") {
            let next_line = (i + 1) as u32;
            let rules = parse_rule_list(rest);
            if rules.is_empty() {
                result.line_disabled.insert(next_line, None);
            } else {
                result
                    .line_disabled
                    .entry(next_line)
                    .and_modify(|existing| {
                        if let Some(set) = existing {
                            set.extend(rules.iter().cloned());
                        }
                    })
                    .or_insert(Some(rules));
            }
        } else if let Some(rest) = comment.strip_prefix("xplint-disable") {
            let rules = parse_rule_list(rest);
            if rules.is_empty() {
                result.disable_all = true;
            } else {
                result.file_disabled.extend(rules);
            }
        }
    }

    result
}

/// Byte offset of a `#` that is not inside a string literal.
fn find_comment(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return Some(i),
            _ => {}
        }
    }
    None
}

impl InlineSuppressions {
    pub fn is_suppressed(&self, diagnostic: &Diagnostic) -> bool {
        if self.disable_all {
            return true;
        }

        let code = diagnostic.rule.code();
        if self.file_disabled.contains(code) {
            return true;
        }

        match self.line_disabled.get(&diagnostic.range.start.line) {
            Some(None) => true,
            Some(Some(rules)) => rules.contains(code),
            None => false,
        }
    }
}

/// Drop disabled and inline-suppressed diagnostics, then apply overrides.
pub fn apply_suppressions(
    diagnostics: Vec<Diagnostic>,
    config: &LintConfig,
    inline: &InlineSuppressions,
) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .filter(|d| !config.is_disabled(d.rule))
        .filter(|d| !inline.is_suppressed(d))
        .map(|mut d| {
            if let Some(sev) = config.severity_overrides.get(&d.rule) {
                d.severity = *sev;
            }
            d
        })
        .collect()
}
