//! Canonical JibJab spellings.

use jibjab_languages::Operator;

pub const ELSE: &str = "<~else>>";
pub const TRY: &str = "<~try>>";
pub const END: &str = "<~>>";
pub const YES: &str = "~yep";
pub const NO: &str = "~nope";
pub const NIL: &str = "~nil";
pub const NUMBER_PREFIX: char = '#';
/// One nesting level.
pub const INDENT: &str = "  ";

pub fn emit(expr: &str) -> String {
    format!("~>frob{{7a3}}::emit({expr})")
}

pub fn bind(name: &str, value: &str) -> String {
    format!("~>snag{{{name}}}::val({value})")
}

pub fn yeet(value: &str) -> String {
    format!("~>yeet{{{value}}}")
}

pub fn kaboom(value: &str) -> String {
    format!("~>kaboom{{{value}}}")
}

pub fn invoke(name: &str, args: &str) -> String {
    format!("~>invoke{{{name}}}::with({args})")
}

pub fn morph(name: &str, params: &[String]) -> String {
    format!("<~morph{{{name}({})}}>>", params.join(", "))
}

pub fn loop_range(var: &str, start: &str, end: &str) -> String {
    format!("<~loop{{{var}:{start}..{end}}}>>")
}

pub fn when(cond: &str) -> String {
    format!("<~when{{{cond}}}>>")
}

pub fn oops(var: Option<&str>) -> String {
    match var {
        Some(var) => format!("<~oops>> {var}"),
        None => "<~oops>>".to_string(),
    }
}

pub fn comment(text: &str) -> String {
    format!("@@ {}", text.trim())
}

/// The canonical token for a surface operator.
pub fn operator(op: Operator) -> &'static str {
    match op {
        Operator::Add => "<+>",
        Operator::Sub => "<->",
        Operator::Mul => "<*>",
        Operator::Div => "</>",
        Operator::Mod => "<%>",
        Operator::Eq => "<=>",
        Operator::Neq => "<!=>",
        Operator::Lt => "<lt>",
        Operator::Gt => "<gt>",
        Operator::Lte => "<lte>",
        Operator::Gte => "<gte>",
        Operator::And => "<&&>",
        Operator::Or => "<||>",
        Operator::Not => "<!>",
    }
}
