//! The per-language record consumed by the decompiler and the toolchain runner.
//!
//! A profile is immutable data: surface spellings, line recognizers and
//! toolchain templates. Nothing in here knows about canonical JibJab text;
//! the decompiler maps [`Operator`] and [`Literals`] onto that vocabulary.

use crate::TargetId;
use regex::Regex;

/// How a language delimits nested blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{` opens, `}` closes. `} else {` closes and reopens on one line.
    Braces,
    /// Blocks end when indentation drops below the current depth.
    Indentation,
    /// Blocks end with an `end` / `end NAME` line.
    EndKeyword,
}

/// How a function signature spells its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `int n`, `const char *s`
    TypeFirst,
    /// `n int`
    NameFirst,
    /// `n: Int`, `_ n: Int`, `n: int = 3`
    Annotated,
    /// `n`, `n = 3`
    Untyped,
}

impl ParamStyle {
    /// Strips types and default values from a parameter list, keeping names.
    ///
    /// A lone `void` (C's empty parameter list) yields no names.
    pub fn names(self, params: &str) -> Vec<String> {
        params
            .split(',')
            .filter_map(|param| {
                let param = param.split('=').next().unwrap_or_default().trim();
                if param.is_empty() {
                    return None;
                }
                let name = match self {
                    ParamStyle::TypeFirst | ParamStyle::Untyped => last_word(param),
                    ParamStyle::NameFirst => param.split_whitespace().next(),
                    ParamStyle::Annotated => last_word(param.split(':').next().unwrap_or(param)),
                }?;
                (name != "void").then(|| name.to_string())
            })
            .collect()
    }
}

fn last_word(s: &str) -> Option<&str> {
    s.rsplit(|c: char| c.is_whitespace() || c == '*' || c == '&')
        .find(|w| !w.is_empty())
}

/// Surface operators a language may spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
    /// Prefix negation. Every other operator is binary.
    Not,
}

/// How a language spells boolean and null literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literals {
    pub yes: &'static str,
    pub no: &'static str,
    pub nil: &'static str,
}

/// The `int main() { ... }` style wrapper a target forces around top-level code.
///
/// Openers are consumed without emitting anything; the matching closer is
/// swallowed too, and an `exit` line directly before it is dropped.
#[derive(Debug)]
pub struct MainWrapper {
    pub openers: Vec<Regex>,
    pub exit: Option<Regex>,
}

/// Line recognizers, tried against one trimmed line at a time.
///
/// Capture groups are named:
/// - `func_def`: `name`, `params`
/// - `for_loop`: `var`, optional `start`, `end`
/// - `conditional`: `cond`
/// - `alternative`, `catch`: optional `close` (line also closes the open block), `catch` optional `var`
/// - `returns`, `throw`: `value`
/// - `emit`: `value`, or `text` for a bare string literal without quotes
/// - `bind`: `name`, `value`
#[derive(Debug)]
pub struct Recognizers {
    /// `None` for indentation-delimited languages.
    pub closer: Option<Regex>,
    pub func_def: Regex,
    pub for_loop: Regex,
    pub conditional: Regex,
    pub alternative: Regex,
    pub returns: Regex,
    pub emit: Vec<Regex>,
    pub bind: Vec<Regex>,
    pub try_open: Option<Regex>,
    pub catch: Option<Regex>,
    /// Empty when the language has no throw statement.
    pub throw: Vec<Regex>,
}

/// Source fixes applied before line recognition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `@"..."` strings and `[x UTF8String]` unwrapping.
    pub objc_literals: bool,
    /// `'...'` strings are rewritten to `"..."`.
    pub single_quoted_strings: bool,
    /// `import ( ... )` blocks are dropped whole.
    pub import_blocks: bool,
    /// `printf`, `NSLog`, `fmt.Printf` and `std::cout` chains with a format
    /// are read back as one interpolated string. Spelled-out boolean
    /// ternaries print the condition.
    pub format_prints: bool,
    /// `f"..."` strings and `str(x).lower()` booleans.
    pub python_prints: bool,
}

/// Default build and run templates.
///
/// Placeholders: `{src}` source file, `{out}` compiled binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainDefaults {
    pub compile: Option<&'static [&'static str]>,
    pub run: &'static [&'static str],
}

/// Everything the workbench knows about one target language.
#[derive(Debug)]
pub struct LanguageProfile {
    pub target: TargetId,
    /// Human-readable name.
    pub name: &'static str,
    /// Source file extension, without the dot.
    pub extension: &'static str,
    pub comment_prefix: &'static str,
    pub block_style: BlockStyle,
    /// Columns per nesting level, for indentation-delimited languages.
    pub indent_width: usize,
    pub literals: Literals,
    /// Surface spelling to operator, longest spellings are matched first.
    pub operators: &'static [(&'static str, Operator)],
    pub param_style: ParamStyle,
    /// Callables that must not be rewritten into invocations.
    pub builtins: &'static [&'static str],
    /// Words that cannot be bound as variables.
    pub reserved: &'static [&'static str],
    /// Line prefixes of generated headers.
    pub header_prefixes: &'static [&'static str],
    pub forward_decl: Option<Regex>,
    pub main_wrapper: Option<MainWrapper>,
    pub quirks: Quirks,
    /// `None` when the language cannot be read back.
    pub recognizers: Option<Recognizers>,
    pub toolchain: ToolchainDefaults,
}

impl LanguageProfile {
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(&name)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(&name)
    }

    /// Whether `line` is part of a generated header.
    pub fn is_header(&self, line: &str) -> bool {
        self.header_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Whether `line` is a bare forward declaration.
    pub fn is_forward_decl(&self, line: &str) -> bool {
        self.forward_decl.as_ref().is_some_and(|re| re.is_match(line))
    }
}

/// Compiles a regex literal from a static profile.
///
/// Profiles are fixed at build time, so a bad pattern is a programming error.
pub(crate) fn re(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid profile pattern {pattern:?}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_first_params() {
        assert_eq!(ParamStyle::TypeFirst.names("int n, const char *s"), ["n", "s"]);
        assert_eq!(ParamStyle::TypeFirst.names("std::string& name"), ["name"]);
        assert!(ParamStyle::TypeFirst.names("void").is_empty());
        assert!(ParamStyle::TypeFirst.names("").is_empty());
    }

    #[test]
    fn name_first_params() {
        assert_eq!(ParamStyle::NameFirst.names("a, b int"), ["a", "b"]);
        assert_eq!(ParamStyle::NameFirst.names("n int"), ["n"]);
    }

    #[test]
    fn annotated_params() {
        assert_eq!(ParamStyle::Annotated.names("_ n: Int, m: Int"), ["n", "m"]);
        assert_eq!(ParamStyle::Annotated.names("n: int = 3, k"), ["n", "k"]);
    }

    #[test]
    fn untyped_params() {
        assert_eq!(ParamStyle::Untyped.names("a, b = 2"), ["a", "b"]);
    }
}
