//! Text scanning helpers shared by the validators.

use std::ops::Range as Span;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Compile a built-in pattern. Every pattern is a literal exercised by the
/// unit tests, so failure here is a programming error.
pub(crate) fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// `filter::CheckWL_<Name>("<rule name>"`, group 1 is the rule name literal.
pub(crate) static WHITELIST_CALL: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"filter::CheckWL_\w+\s*\(\s*"([^"\n]*)""#));

/// A block extracted from the source text.
pub(crate) struct Block<'t> {
    /// Header text, e.g. `on login` or `emit`.
    pub header: &'t str,
    /// Document offset of the first body byte.
    pub body_start: usize,
    pub body: &'t str,
}

/// Iterate blocks matched by `pattern`, which must capture the header in
/// group 1 and the body in group 2. Bodies are not nested.
pub(crate) fn blocks<'r, 't>(
    pattern: &'r Regex,
    text: &'t str,
) -> impl Iterator<Item = Block<'t>> {
    pattern.captures_iter(text).filter_map(|caps| {
        let header = caps.get(1)?;
        let body = caps.get(2)?;
        Some(Block {
            header: header.as_str(),
            body_start: body.start(),
            body: body.as_str(),
        })
    })
}

/// Span of capture group `i`, if it participated.
pub(crate) fn group_span(caps: &Captures<'_>, i: usize) -> Option<Span<usize>> {
    caps.get(i).map(|m| m.range())
}

/// Find the span of the call argument that starts at or after `from`.
///
/// Leading whitespace is skipped. The argument ends at the first `,` or `)`
/// outside nested brackets and string literals; trailing whitespace is not
/// part of the span. Returns `None` for an empty or unterminated argument.
pub(crate) fn call_argument(text: &str, from: usize) -> Option<Span<usize>> {
    let rest = text.get(from..)?;
    let start = from + (rest.len() - rest.trim_start().len());

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ',' | ')' if depth == 0 => {
                let end = start + text[start..start + i].trim_end().len();
                return (end > start).then_some(start..end);
            }
            _ => {}
        }
    }
    None
}

/// Drop whitespace and `$` sigils so `$src.host` and `src.host` compare equal.
pub(crate) fn normalize_key(expr: &str) -> String {
    expr.chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect()
}
