//! # xplint
//!
//! Static analysis for detection rule sources: correlation rules (`co`),
//! enrichment rules (`en`) and normalization formulas (`xp`).
//!
//! Every check is a self-contained regex scan over the raw text; no syntax
//! tree is built. The crate provides:
//!
//! - **Validators**: eight built-in checks, each guarded by the dialects it
//!   applies to and capped by a per-document findings limit
//! - **Registry**: the ordered set of validators run on every pass, with each
//!   validator isolated so one failure never hides the others
//! - **Coordinator**: reacts to open/change/close/configuration events and
//!   publishes complete diagnostic sets per document
//! - **Config**: `.xplint.yml` rule toggles, severity overrides and inline
//!   `# xplint-disable` comments
//!
//! ## Quick Start
//!
//! ```rust
//! use xplint::{DocumentSettings, LintConfig, LintRule, TextDocument, ValidatorRegistry, lint_text};
//!
//! let source = r#"
//! rule Suspicious_Logon: e
//! filter {
//!     lower(event_src.subsys) == "Directory Service"
//! }
//! "#;
//!
//! let document = TextDocument::new("file:///rules/logon.co", "co", 1, source);
//! let registry = ValidatorRegistry::with_defaults();
//! let diagnostics = lint_text(&registry, &document, DocumentSettings::default(), &LintConfig::default());
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].rule, LintRule::LowerComparisonCase);
//! assert_eq!(diagnostics[0].range.start.line, 3);
//! ```

pub mod config;
pub mod coordinator;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod lint;
pub mod position;
pub mod registry;
pub mod settings;
pub mod validator;

pub use config::{InlineSuppressions, LintConfig, apply_suppressions, parse_inline_suppressions};
pub use coordinator::{DiagnosticPublisher, ValidationCoordinator};
pub use diagnostic::{Diagnostic, LintRule, SOURCE, Severity};
pub use document::{
    CORRELATION, ENRICHMENT, NORMALIZATION, TextDocument, language_for_extension,
};
pub use error::{Result, XpLintError};
pub use lint::{FileLintResult, lint_directory, lint_file, lint_text};
pub use position::{LineIndex, Position, Range};
pub use registry::ValidatorRegistry;
pub use settings::{
    DEFAULT_MAX_NUMBER_OF_PROBLEMS, DocumentSettings, SettingsCache, SettingsProvider,
    StaticSettings,
};
pub use validator::{ValidationContext, Validator};
