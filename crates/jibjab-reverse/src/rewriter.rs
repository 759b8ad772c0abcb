//! Expression rewriting from a target's surface syntax into canonical form.
//!
//! Rewriting is a single left-to-right scan that never touches string
//! literals, followed by a call pass. Canonical input passes through
//! unchanged, so rewriting an already rewritten expression is a no-op.

use crate::canonical;
use crate::text::{
    ident_end, is_ident_char, is_ident_start, matching_paren, number_end, starts_number,
    string_end,
};
use jibjab_languages::{LanguageProfile, Operator};

/// Canonical keywords that are followed by `(` and are not calls.
const CANONICAL_CALLS: &[&str] = &["emit", "val", "with", "grab"];

/// Rewrites expressions for one target language.
pub struct Rewriter {
    profile: &'static LanguageProfile,
    /// Binary operators, longest spelling first.
    binary: Vec<(&'static str, Operator)>,
    /// Spellings of prefix negation.
    negation: Vec<&'static str>,
}

impl Rewriter {
    pub fn new(profile: &'static LanguageProfile) -> Self {
        let mut binary: Vec<_> = profile
            .operators
            .iter()
            .copied()
            .filter(|(_, op)| *op != Operator::Not)
            .collect();
        binary.sort_by_key(|(surface, _)| std::cmp::Reverse(surface.len()));
        let negation = profile
            .operators
            .iter()
            .filter(|(_, op)| *op == Operator::Not)
            .map(|(surface, _)| *surface)
            .collect();
        Self {
            profile,
            binary,
            negation,
        }
    }

    /// Rewrite one expression.
    pub fn rewrite(&self, expr: &str) -> String {
        let expr = strip_enclosing_parens(expr.trim());
        let tokens = self.rewrite_tokens(expr);
        self.rewrite_calls(&tokens)
    }

    /// Operators, literals and numbers.
    fn rewrite_tokens(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 16);
        let mut i = 0;
        // Whether the last significant thing scanned was an operand.
        // A `-` directly before a digit is a sign only when it is not.
        let mut after_operand = false;

        while let Some(c) = s[i..].chars().next() {
            let rest = &s[i..];
            let prev = s[..i].chars().next_back();

            if c == '"' || c == '\'' {
                let end = string_end(s, i);
                out.push_str(&s[i..end]);
                i = end;
                after_operand = true;
                continue;
            }

            if c == ' ' {
                if let Some((len, op)) = self.binary_at(rest) {
                    out.push(' ');
                    out.push_str(canonical::operator(op));
                    out.push(' ');
                    i += len;
                    after_operand = false;
                    continue;
                }
                out.push(' ');
                i += 1;
                continue;
            }

            // Already canonical: `#42`, `#-3`.
            if c == canonical::NUMBER_PREFIX && starts_number(&rest[1..]) {
                let digits = if rest[1..].starts_with('-') { 2 } else { 1 };
                let end = number_end(s, i + digits);
                out.push_str(&s[i..end]);
                i = end;
                after_operand = true;
                continue;
            }

            if let Some(len) = self.negation_at(rest, prev) {
                out.push_str(canonical::operator(Operator::Not));
                i += len;
                after_operand = false;
                continue;
            }

            if c == '-' && !after_operand && rest[1..].starts_with(|d: char| d.is_ascii_digit()) {
                let end = number_end(s, i + 1);
                if !s[end..].starts_with(is_ident_char) {
                    out.push(canonical::NUMBER_PREFIX);
                }
                out.push_str(&s[i..end]);
                i = end;
                after_operand = true;
                continue;
            }

            if c.is_ascii_digit() && !prev.is_some_and(|p| is_ident_char(p) || p == '.') {
                let end = number_end(s, i);
                if s[end..].starts_with(is_ident_char) {
                    let word_end = ident_end(s, i);
                    out.push_str(&s[i..word_end]);
                    i = word_end;
                } else {
                    out.push(canonical::NUMBER_PREFIX);
                    out.push_str(&s[i..end]);
                    i = end;
                }
                after_operand = true;
                continue;
            }

            if is_ident_start(c) && !prev.is_some_and(is_ident_char) {
                if prev != Some('~')
                    && let Some((len, token)) = self.literal_at(rest)
                {
                    out.push_str(token);
                    i += len;
                } else {
                    let end = ident_end(s, i);
                    out.push_str(&s[i..end]);
                    i = end;
                }
                after_operand = true;
                continue;
            }

            out.push(c);
            i += c.len_utf8();
            if !c.is_whitespace() {
                after_operand = matches!(c, ')' | ']' | '}');
            }
        }
        out
    }

    /// ` OP ` at the start of `rest`: consumed length and operator.
    fn binary_at(&self, rest: &str) -> Option<(usize, Operator)> {
        let after_space = rest.strip_prefix(' ')?;
        self.binary.iter().find_map(|&(surface, op)| {
            let tail = after_space.strip_prefix(surface)?;
            tail.starts_with(' ').then_some((surface.len() + 2, op))
        })
    }

    /// Prefix negation at the start of `rest`: consumed length.
    fn negation_at(&self, rest: &str, prev: Option<char>) -> Option<usize> {
        self.negation.iter().find_map(|&surface| {
            if surface.starts_with(is_ident_start) {
                // Word form, `not x`.
                let tail = rest.strip_prefix(surface)?;
                (tail.starts_with(' ') && !prev.is_some_and(is_ident_char))
                    .then_some(surface.len() + 1)
            } else {
                // Symbol form, `!x`. `<!>` and `!=` belong to other tokens.
                let tail = rest.strip_prefix(surface)?;
                (!tail.starts_with('=') && prev != Some('<')).then_some(surface.len())
            }
        })
    }

    /// A literal spelling at the start of `rest`: consumed length and canonical token.
    fn literal_at(&self, rest: &str) -> Option<(usize, &'static str)> {
        let lits = &self.profile.literals;
        [
            (lits.yes, canonical::YES),
            (lits.no, canonical::NO),
            (lits.nil, canonical::NIL),
        ]
        .into_iter()
        .find_map(|(spelling, token)| {
            let tail = rest.strip_prefix(spelling)?;
            (!spelling.is_empty() && !tail.starts_with(is_ident_char))
                .then_some((spelling.len(), token))
        })
    }

    /// Turn `name(args)` into invocations, innermost arguments included.
    fn rewrite_calls(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 32);
        let mut i = 0;
        while let Some(c) = s[i..].chars().next() {
            if c == '"' || c == '\'' {
                let end = string_end(s, i);
                out.push_str(&s[i..end]);
                i = end;
                continue;
            }
            let prev = s[..i].chars().next_back();
            if is_ident_start(c) && !prev.is_some_and(is_ident_char) {
                let end = ident_end(s, i);
                let name = &s[i..end];
                if s[end..].starts_with('(')
                    && let Some(close) = matching_paren(s, end)
                {
                    let args = self.rewrite_calls(&s[end + 1..close]);
                    if self.keeps_call(&s[..i], name) {
                        out.push_str(name);
                        out.push('(');
                        out.push_str(&args);
                        out.push(')');
                    } else {
                        out.push_str(&canonical::invoke(name, &args));
                    }
                    i = close + 1;
                    continue;
                }
                out.push_str(name);
                i = end;
                continue;
            }
            out.push(c);
            i += c.len_utf8();
        }
        out
    }

    fn keeps_call(&self, before: &str, name: &str) -> bool {
        let qualified = [".", "::", "->", "@", "~", "#"]
            .iter()
            .any(|sep| before.ends_with(sep));
        qualified
            || CANONICAL_CALLS.contains(&name)
            || self.profile.is_builtin(name)
            || self.profile.is_reserved(name)
    }
}

/// Strip one pair of parentheses, only if the opening one closes at the very end.
fn strip_enclosing_parens(s: &str) -> &str {
    if !(s.starts_with('(') && s.ends_with(')')) {
        return s;
    }
    match matching_paren(s, 0) {
        Some(close) if close == s.len() - 1 => s[1..close].trim(),
        _ => s,
    }
}
