//! Lexical helpers shared by the pre-pass and the rewriter.

/// Byte index of the `)` closing the `(` at `open`, skipping string literals.
pub(crate) fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while let Some(c) = s[i..].chars().next() {
        match c {
            '"' | '\'' => {
                i = string_end(s, i);
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    None
}

/// Byte index of the quote closing the string literal opening at `start`.
pub(crate) fn string_close(s: &str, start: usize) -> Option<usize> {
    let mut chars = s[start..].char_indices();
    let (_, quote) = chars.next()?;
    let mut escaped = false;
    for (offset, c) in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(start + offset);
        }
    }
    None
}

/// Byte index just past the string literal opening at `start`.
///
/// An unterminated literal runs to the end of `s`.
pub(crate) fn string_end(s: &str, start: usize) -> usize {
    string_close(s, start).map_or(s.len(), |close| close + 1)
}

pub(crate) fn starts_number(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// End of a run of digits with an optional fractional part.
pub(crate) fn number_end(s: &str, start: usize) -> usize {
    let bytes = s.as_bytes();
    let mut j = start;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    if j + 1 < bytes.len() && bytes[j] == b'.' && bytes[j + 1].is_ascii_digit() {
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
    }
    j
}

pub(crate) fn ident_end(s: &str, start: usize) -> usize {
    s[start..]
        .find(|c: char| !is_ident_char(c))
        .map_or(s.len(), |off| start + off)
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

