//! Convert xplint diagnostics into LSP `Diagnostic` objects.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use xplint::Severity;

pub fn severity_to_lsp(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

fn range_to_lsp(range: xplint::Range) -> Range {
    Range::new(
        Position::new(range.start.line, range.start.character),
        Position::new(range.end.line, range.end.character),
    )
}

pub fn to_lsp(diagnostic: &xplint::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: range_to_lsp(diagnostic.range),
        severity: Some(severity_to_lsp(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.rule.code().to_string())),
        source: Some(diagnostic.source.to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}
