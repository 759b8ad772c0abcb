//! Format-string prints read back as single-value prints.
//!
//! Generated code prints several values at once through a format string, and
//! prints booleans through a `x ? "true" : "false"` ternary. Both are turned
//! into the language's plain one-value print: a format becomes an
//! interpolated string such as `"{a} and {b}"`, a ternary becomes its
//! condition. Lines that are already plain prints are left alone.

use crate::text::{is_ident_char, string_close, string_end};
use regex::Regex;
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("{e}"))
}

static FORMAT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"^(?P<callee>printf|NSLog|fmt\.Printf)\(\s*"(?P<format>(?:[^"\\]|\\.)*)"\s*(?:,\s*(?P<args>.*?))?\s*\)\s*;?$"#)
});

static CONVERSION: LazyLock<Regex> =
    LazyLock::new(|| re(r"%(?:%|[-+ #0]*[0-9]*(?:\.[0-9]+)?(?:hh|h|ll|l|z)?[a-zA-Z@])"));

static BOOL_TERNARY: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"^\(?\s*(?P<cond>[A-Za-z_][\w.]*)\s*\?\s*"[^"]*"\s*:\s*"[^"]*"\s*\)?$"#)
});

static CAST: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\(\s*(?:const\s+)?(?:unsigned\s+)?(?:long\s+long|long|int|double|float|char\s*\*)\s*\)\s*")
});

static COUT: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"^std::cout\s*<<\s*(?P<chain>.+?)\s*<<\s*(?:std::endl|"\\n")\s*;$"#)
});

static PRINT_LOWER: LazyLock<Regex> =
    LazyLock::new(|| re(r"^print\(\s*str\((?P<value>\w+)\)\.lower\(\)\s*\)$"));

static BRACED_LOWER: LazyLock<Regex> =
    LazyLock::new(|| re(r"\{str\((?P<value>\w+)\)\.lower\(\)\}"));

/// Rewrite one brace-language statement. `None` leaves it as it is.
pub(crate) fn rewrite_format_print(stmt: &str) -> Option<String> {
    rewrite_call(stmt).or_else(|| rewrite_cout(stmt))
}

/// Rewrite one Python line, keeping its indentation.
pub(crate) fn rewrite_python_print(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    if let Some(caps) = PRINT_LOWER.captures(body) {
        return format!("{indent}print({})", &caps["value"]);
    }
    let body = strip_fstring_prefixes(body);
    let body = BRACED_LOWER.replace_all(&body, "{$value}");
    format!("{indent}{body}")
}

fn rewrite_call(stmt: &str) -> Option<String> {
    let caps = FORMAT_CALL.captures(stmt)?;
    let callee = caps.name("callee")?.as_str();
    let format = caps.name("format")?.as_str();
    let format = match callee {
        "NSLog" => format,
        _ => format.strip_suffix("\\n")?,
    };
    let args = caps.name("args").map_or_else(Vec::new, |a| split_args(a.as_str()));

    let value = match args.as_slice() {
        // `printf("hello\n")` is already a plain print.
        [] if callee == "printf" => return None,
        [arg] if is_lone_conversion(format) => {
            let plain = plain_arg(arg);
            if plain == *arg {
                return None;
            }
            plain.to_string()
        }
        _ => interpolate(format, &args)?,
    };
    Some(match callee {
        "printf" => format!(r#"printf("%s\n", {value});"#),
        "NSLog" => format!(r#"NSLog("%@", {value});"#),
        _ => format!("fmt.Println({value})"),
    })
}

fn rewrite_cout(stmt: &str) -> Option<String> {
    let caps = COUT.captures(stmt)?;
    let parts = split_shifts(caps.name("chain")?.as_str());
    let value = match parts.as_slice() {
        [only] => BOOL_TERNARY.captures(only)?["cond"].to_string(),
        parts => {
            let mut text = String::from("\"");
            for part in parts {
                push_piece(&mut text, part);
            }
            text.push('"');
            text
        }
    };
    Some(format!("std::cout << {value} << std::endl;"))
}

fn is_lone_conversion(format: &str) -> bool {
    CONVERSION
        .find(format)
        .is_some_and(|m| m.start() == 0 && m.end() == format.len() && m.as_str() != "%%")
}

/// An argument without a numeric cast, or the condition of a boolean ternary.
fn plain_arg(arg: &str) -> &str {
    let arg = CAST.find(arg).map_or(arg, |cast| &arg[cast.end()..]);
    match BOOL_TERNARY.captures(arg) {
        Some(caps) => caps.name("cond").map_or(arg, |m| m.as_str()),
        None => arg,
    }
}

/// Substitute each conversion of `format` with the next argument.
///
/// `None` when the counts disagree.
fn interpolate(format: &str, args: &[String]) -> Option<String> {
    let mut text = String::from("\"");
    let mut args = args.iter();
    let mut last = 0;
    for conversion in CONVERSION.find_iter(format) {
        text.push_str(&format[last..conversion.start()]);
        last = conversion.end();
        if conversion.as_str() == "%%" {
            text.push('%');
            continue;
        }
        push_piece(&mut text, args.next()?);
    }
    if args.next().is_some() {
        return None;
    }
    text.push_str(&format[last..]);
    text.push('"');
    Some(text)
}

/// Append a string literal's contents, or any other value as `{value}`.
fn push_piece(text: &mut String, piece: &str) {
    let piece = plain_arg(piece.trim());
    match literal_contents(piece) {
        Some(inner) => text.push_str(inner),
        None => {
            text.push('{');
            text.push_str(piece);
            text.push('}');
        }
    }
}

fn literal_contents(s: &str) -> Option<&str> {
    if !s.starts_with('"') {
        return None;
    }
    let close = string_close(s, 0)?;
    (close == s.len() - 1).then(|| &s[1..close])
}

/// Split call arguments at top-level commas.
fn split_args(s: &str) -> Vec<String> {
    split_top_level(s, ",")
}

/// Split a stream chain at top-level `<<`.
fn split_shifts(s: &str) -> Vec<String> {
    split_top_level(s, "<<")
}

fn split_top_level(s: &str, sep: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while let Some(c) = s[i..].chars().next() {
        match c {
            '"' | '\'' => {
                i = string_end(s, i);
                continue;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && s[i..].starts_with(sep) => {
                parts.push(s[start..i].trim().to_string());
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    let rest = s[start..].trim();
    if !rest.is_empty() || !parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// `f"..."` becomes `"..."`; its `{name}` holes already read as interpolation.
fn strip_fstring_prefixes(line: &str) -> String {
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
            'f' | 'F'
                if line[i + 1..].starts_with('"')
                    && !out.chars().next_back().is_some_and(is_ident_char) =>
            {
                i += 1;
            }
            _ => {
                out.push(c);
                i += c.len_utf8();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_print(stmt: &str) -> Option<String> {
        rewrite_format_print(stmt)
    }

    #[test]
    fn printf_with_several_conversions() {
        assert_eq!(
            format_print(r#"printf("%d and %d\n", a, b);"#).as_deref(),
            Some(r#"printf("%s\n", "{a} and {b}");"#)
        );
        assert_eq!(
            format_print(r#"printf("%s is %ld\n", name, (long)fib(n));"#).as_deref(),
            Some(r#"printf("%s\n", "{name} is {fib(n)}");"#)
        );
        assert_eq!(
            format_print(r#"printf("x = %d, 100%%\n", x);"#).as_deref(),
            Some(r#"printf("%s\n", "x = {x}, 100%");"#)
        );
    }

    #[test]
    fn boolean_ternaries_print_their_condition() {
        assert_eq!(
            format_print(r#"printf("%s\n", done ? "true" : "false");"#).as_deref(),
            Some(r#"printf("%s\n", done);"#)
        );
        assert_eq!(
            format_print(r#"printf("ok: %s\n", ok ? "true" : "false");"#).as_deref(),
            Some(r#"printf("%s\n", "ok: {ok}");"#)
        );
        assert_eq!(
            format_print(r#"std::cout << (flag ? "true" : "false") << std::endl;"#).as_deref(),
            Some("std::cout << flag << std::endl;")
        );
        assert_eq!(
            format_print(r#"NSLog("%@", flag ? "true" : "false");"#).as_deref(),
            Some(r#"NSLog("%@", flag);"#)
        );
    }

    #[test]
    fn nslog_conversions() {
        assert_eq!(
            format_print(r#"NSLog("%ld", (long)count);"#).as_deref(),
            Some(r#"NSLog("%@", count);"#)
        );
        assert_eq!(
            format_print(r#"NSLog("%@ has %ld", name, (long)n);"#).as_deref(),
            Some(r#"NSLog("%@", "{name} has {n}");"#)
        );
    }

    #[test]
    fn go_printf() {
        assert_eq!(
            format_print(r#"fmt.Printf("%v + %v\n", a, b)"#).as_deref(),
            Some(r#"fmt.Println("{a} + {b}")"#)
        );
        assert_eq!(
            format_print(r#"fmt.Printf("done\n")"#).as_deref(),
            Some(r#"fmt.Println("done")"#)
        );
    }

    #[test]
    fn cout_chains_join_into_one_string() {
        assert_eq!(
            format_print(r#"std::cout << "x is " << x << std::endl;"#).as_deref(),
            Some(r#"std::cout << "x is {x}" << std::endl;"#)
        );
    }

    #[test]
    fn plain_prints_are_left_alone() {
        assert_eq!(format_print(r#"printf("%d\n", x);"#), None);
        assert_eq!(format_print(r#"printf("hello\n");"#), None);
        assert_eq!(format_print(r#"printf("[");"#), None);
        assert_eq!(format_print(r#"fmt.Printf("%v\n", x)"#), None);
        assert_eq!(format_print("std::cout << x << std::endl;"), None);
        assert_eq!(format_print(r#"printf("%d %d\n", x);"#), None);
        assert_eq!(format_print("x = a ? 1 : 2;"), None);
    }

    #[test]
    fn separators_inside_strings_and_calls_do_not_split() {
        assert_eq!(split_args(r#""a, b", f(x, y), z"#), [r#""a, b""#, "f(x, y)", "z"]);
        assert_eq!(split_shifts(r#""<<" << (a << 1)"#), [r#""<<""#, "(a << 1)"]);
    }

    #[test]
    fn python_booleans_and_fstrings() {
        assert_eq!(rewrite_python_print("print(str(ok).lower())"), "print(ok)");
        assert_eq!(
            rewrite_python_print(r#"    print(f"ok is {str(ok).lower()}")"#),
            r#"    print("ok is {ok}")"#
        );
        assert_eq!(
            rewrite_python_print(r#"print(f"{a} and {b}")"#),
            r#"print("{a} and {b}")"#
        );
        assert_eq!(rewrite_python_print(r#"print(elf"x")"#), r#"print(elf"x")"#);
        assert_eq!(rewrite_python_print(r#"print("if")  # f"x""#), r#"print("if")  # f"x""#);
    }
}
