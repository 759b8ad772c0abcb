//! Source clean-up before line recognition.
//!
//! Drops generated headers and forward declarations, applies per-language
//! literal fixes, and splits brace-delimited lines holding several
//! statements so that one-line programs read like formatted ones. Format
//! prints are then reduced to plain prints (see [`crate::formats`]).

use crate::formats::{rewrite_format_print, rewrite_python_print};
use crate::text::{is_ident_char, string_close, string_end};
use jibjab_languages::{BlockStyle, LanguageProfile};
use regex::Regex;
use std::sync::LazyLock;

static UTF8_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(\w+)\s+UTF8String\s*\]").unwrap_or_else(|e| panic!("{e}"))
});

/// Keywords whose `{` always opens a block, never a literal.
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "else", "func", "function", "catch", "try", "do", "}",
    "@try", "@catch", "@autoreleasepool",
];

/// Lines ready for the state machine. Python lines keep their indentation.
pub(crate) fn prepare(profile: &LanguageProfile, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_import_block = false;

    for raw in source.lines() {
        let trimmed = raw.trim();
        if profile.quirks.import_blocks {
            if in_import_block {
                in_import_block = trimmed != ")";
                continue;
            }
            if trimmed.strip_prefix("import").is_some_and(|r| r.trim() == "(") {
                in_import_block = true;
                continue;
            }
        }
        if !trimmed.is_empty() && profile.is_header(trimmed) {
            continue;
        }

        let mut line = raw.trim_end().to_string();
        if profile.quirks.objc_literals {
            line = unwrap_objc_literals(&line);
        }
        if profile.quirks.single_quoted_strings {
            line = double_quote_strings(&line);
        }
        if profile.quirks.python_prints {
            line = rewrite_python_print(&line);
        }

        if profile.block_style == BlockStyle::Braces {
            if line.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            lines.extend(
                split_statements(&line)
                    .into_iter()
                    .filter(|stmt| !profile.is_forward_decl(stmt))
                    .map(|stmt| {
                        if profile.quirks.format_prints {
                            rewrite_format_print(&stmt).unwrap_or(stmt)
                        } else {
                            stmt
                        }
                    }),
            );
        } else {
            lines.push(line);
        }
    }
    lines
}

/// `@"text"` becomes `"text"` and `[name UTF8String]` becomes `name`.
fn unwrap_objc_literals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while let Some(c) = line[i..].chars().next() {
        if c == '"' {
            let end = string_end(line, i);
            out.push_str(&line[i..end]);
            i = end;
            continue;
        }
        if c == '@' && line[i + 1..].starts_with('"') {
            i += 1;
            continue;
        }
        out.push(c);
        i += c.len_utf8();
    }
    UTF8_STRING.replace_all(&out, "$1").into_owned()
}

/// Rewrite `'...'` literals as `"..."`. Text after a `#` comment is untouched.
fn double_quote_strings(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while let Some(c) = line[i..].chars().next() {
        match c {
            '#' => {
                out.push_str(&line[i..]);
                break;
            }
            '"' => {
                let end = string_end(line, i);
                out.push_str(&line[i..end]);
                i = end;
            }
            '\'' => match string_close(line, i) {
                Some(close) => {
                    out.push('"');
                    let mut inner = line[i + 1..close].chars().peekable();
                    while let Some(ch) = inner.next() {
                        match ch {
                            '\\' if inner.peek() == Some(&'\'') => {
                                out.push('\'');
                                inner.next();
                            }
                            '\\' => {
                                out.push('\\');
                                if let Some(escaped) = inner.next() {
                                    out.push(escaped);
                                }
                            }
                            '"' => out.push_str("\\\""),
                            _ => out.push(ch),
                        }
                    }
                    out.push('"');
                    i = close + 1;
                }
                None => {
                    out.push_str(&line[i..]);
                    break;
                }
            },
            _ => {
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    out
}

/// Split a brace-language line at top-level `;`, after block `{` and before `}`.
///
/// Text inside strings and parentheses never splits, nor do the `;` of a
/// `for` header or the braces of a literal such as `{a: 1}`.
pub(crate) fn split_statements(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut parens = 0usize;
    let mut literal_braces = 0usize;
    let mut i = 0;

    while let Some(c) = line[i..].chars().next() {
        if c == '"' || c == '\'' {
            let end = string_end(line, i);
            current.push_str(&line[i..end]);
            i = end;
            continue;
        }
        if parens == 0 && literal_braces == 0 && line[i..].starts_with("//") {
            current.push_str(&line[i..]);
            break;
        }
        i += c.len_utf8();
        match c {
            '(' | '[' => parens += 1,
            ')' | ']' => parens = parens.saturating_sub(1),
            _ => {}
        }
        if parens > 0 {
            current.push(c);
            continue;
        }
        match c {
            '{' if literal_braces > 0 || opens_literal(&current) => {
                literal_braces += 1;
                current.push(c);
            }
            '{' => {
                current.push(c);
                flush(&mut parts, &mut current);
            }
            '}' if literal_braces > 0 => {
                literal_braces -= 1;
                current.push(c);
            }
            '}' => {
                flush(&mut parts, &mut current);
                current.push(c);
            }
            ';' if literal_braces == 0 && !is_for_header(&current) => {
                current.push(c);
                flush(&mut parts, &mut current);
            }
            _ => current.push(c),
        }
    }
    flush(&mut parts, &mut current);
    parts
}

fn flush(parts: &mut Vec<String>, current: &mut String) {
    let stmt = current.trim();
    if !stmt.is_empty() {
        parts.push(stmt.to_string());
    }
    current.clear();
}

fn is_for_header(stmt: &str) -> bool {
    starts_with_word(stmt.trim_start(), "for")
}

fn starts_with_word(s: &str, word: &str) -> bool {
    s.strip_prefix(word)
        .is_some_and(|rest| !rest.starts_with(is_ident_char))
}

/// Whether a `{` following `stmt` opens a value literal rather than a block.
fn opens_literal(stmt: &str) -> bool {
    let stmt = stmt.trim();
    if BLOCK_KEYWORDS.iter().any(|kw| starts_with_word(stmt, kw)) {
        return false;
    }
    match stmt.chars().last() {
        None => false,
        Some(c) if "=(,:[?".contains(c) => true,
        Some(_) => stmt.ends_with("return") || has_assignment(stmt),
    }
}

/// A bare `=` or `:=`, as opposed to a comparison.
fn has_assignment(stmt: &str) -> bool {
    let bytes = stmt.as_bytes();
    bytes.iter().enumerate().any(|(k, &b)| {
        b == b'='
            && !(k > 0 && b"=!<>".contains(&bytes[k - 1]))
            && bytes.get(k + 1) != Some(&b'=')
    })
}
