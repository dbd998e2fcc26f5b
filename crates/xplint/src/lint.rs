//! One-shot linting of text, files and directory trees.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{LintConfig, apply_suppressions, parse_inline_suppressions};
use crate::diagnostic::{Diagnostic, Severity};
use crate::document::{TextDocument, language_for_extension};
use crate::error::Result;
use crate::registry::ValidatorRegistry;
use crate::settings::DocumentSettings;

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileLintResult {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the file could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileLintResult {
    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Information)
    }

    pub fn hint_count(&self) -> usize {
        self.count(Severity::Hint)
    }
}

/// Lint source text in the given dialect.
pub fn lint_text(
    registry: &ValidatorRegistry,
    document: &TextDocument,
    settings: DocumentSettings,
    config: &LintConfig,
) -> Vec<Diagnostic> {
    let settings = config.settings_over(settings).normalized();
    let diagnostics = registry.run(document, &settings);
    let inline = parse_inline_suppressions(document.text());
    apply_suppressions(diagnostics, config, &inline)
}

/// Lint a file, picking the dialect from its extension.
///
/// Files with an unknown extension are linted as normalization sources,
/// which no built-in validator targets.
pub fn lint_file(
    registry: &ValidatorRegistry,
    path: &Path,
    config: &LintConfig,
) -> Result<FileLintResult> {
    let content = std::fs::read_to_string(path)?;
    let language = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
        .unwrap_or(crate::document::NORMALIZATION);
    let uri = format!("file://{}", path.display());
    let document = TextDocument::new(uri, language, 0, content);
    let diagnostics = lint_text(registry, &document, DocumentSettings::default(), config);
    Ok(FileLintResult {
        path: path.to_path_buf(),
        diagnostics,
        error: None,
    })
}

/// Lint every rule source below `dir`.
///
/// Hidden directories are skipped, entries are visited in path order and
/// symlink cycles are followed once. Unreadable files produce a result
/// with `error` set instead of aborting the walk.
pub fn lint_directory(
    registry: &ValidatorRegistry,
    dir: &Path,
    config: &LintConfig,
) -> Result<Vec<FileLintResult>> {
    let mut results = Vec::new();
    let mut visited = HashSet::new();

    fn walk(
        registry: &ValidatorRegistry,
        dir: &Path,
        config: &LintConfig,
        results: &mut Vec<FileLintResult>,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        let canonical = match dir.canonicalize() {
            Ok(p) => p,
            Err(_) => return Ok(()),
        };
        if !visited.insert(canonical) {
            return Ok(());
        }

        let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'))
                {
                    continue;
                }
                walk(registry, &path, config, results, visited)?;
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(language_for_extension)
                .is_some()
            {
                match lint_file(registry, &path, config) {
                    Ok(file_result) => results.push(file_result),
                    Err(e) => {
                        log::warn!("failed to read {}: {e}", path.display());
                        results.push(FileLintResult {
                            path: path.clone(),
                            diagnostics: Vec::new(),
                            error: Some(format!("error reading file: {e}")),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    walk(registry, dir, config, &mut results, &mut visited)?;
    Ok(results)
}
