#![allow(dead_code)]

use xplint::{
    Diagnostic, DocumentSettings, LintConfig, TextDocument, Validator, ValidatorRegistry,
    lint_text,
};

/// A rule containing at least one trigger for every built-in validator.
pub const EVERYTHING_WRONG: &str = r#"rule ESC_Test: e

event Logon:
    key:
        event_src.host
    filter {
        lower(event_src.subsys) == "Directory Service"
        and find_substr(lower(object.name), "\Domain Admins")
        and event_src.title = "windows"
    }

emit {
    $importance = "high"
    $incident.severity = "low"
    $alert.key = $host.name
    $wl = filter::CheckWL_Networking("ESC_Other", $user.name)
    $text = "port " + dst.port
    subject = "account"
}
"#;

pub fn doc(language_id: &str, text: &str) -> TextDocument {
    TextDocument::new(format!("file:///rules/test.{language_id}"), language_id, 1, text)
}

pub fn lint(language_id: &str, text: &str) -> Vec<Diagnostic> {
    lint_text(
        &ValidatorRegistry::with_defaults(),
        &doc(language_id, text),
        DocumentSettings::default(),
        &LintConfig::default(),
    )
}

pub fn run(validator: &dyn Validator, language_id: &str, text: &str) -> Vec<Diagnostic> {
    validator.validate(&doc(language_id, text), &DocumentSettings::default())
}

/// The text a diagnostic's single-line range covers.
pub fn covered<'a>(text: &'a str, d: &Diagnostic) -> &'a str {
    assert_eq!(d.range.start.line, d.range.end.line, "multi-line range");
    let line = text.lines().nth(d.range.start.line as usize).unwrap();
    &line[d.range.start.character as usize..d.range.end.character as usize]
}
