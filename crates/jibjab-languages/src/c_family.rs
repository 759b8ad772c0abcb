//! Shared syntax for the C family: C, C++, Objective-C and Objective-C++.
//!
//! The four targets print, bind and branch the same way; they differ in
//! literal spellings, exception syntax and the extra print forms they accept.

use crate::profile::{MainWrapper, Operator, Recognizers, re};
use regex::Regex;

/// A C-family type prefix: optional qualifiers, a base type, pointer/reference marks.
const TYPE: &str = r"(?:const\s+)?(?:unsigned\s+|signed\s+)?(?:long\s+long|long|int|short|double|float|char|bool|BOOL|void|size_t|auto|NSInteger|NSString|std::string|string|id)\b\s*[*&]*";

pub(crate) const OPERATORS: &[(&str, Operator)] = &[
    ("==", Operator::Eq),
    ("!=", Operator::Neq),
    ("<=", Operator::Lte),
    (">=", Operator::Gte),
    ("&&", Operator::And),
    ("||", Operator::Or),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("+", Operator::Add),
    ("-", Operator::Sub),
    ("*", Operator::Mul),
    ("/", Operator::Div),
    ("%", Operator::Mod),
    ("!", Operator::Not),
];

pub(crate) const RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void", "while",
];

pub(crate) const HEADERS: &[&str] = &["// Transpiled from JibJab", "#include", "#import"];

/// Exception syntax a C-family dialect supports.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exceptions {
    None,
    Cpp,
    ObjC,
    Both,
}

/// Print forms a C-family dialect accepts.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct PrintForms {
    pub printf: bool,
    pub cout: bool,
    pub nslog: bool,
}

pub(crate) fn forward_decl() -> Regex {
    re(&format!(
        r"^(?:static\s+|extern\s+|inline\s+)*{TYPE}\s*[A-Za-z_]\w*\s*\([^)]*\)\s*;$"
    ))
}

pub(crate) fn main_wrapper(autoreleasepool: bool) -> MainWrapper {
    let mut openers = vec![re(r"^int\s+main\s*\([^)]*\)\s*\{$")];
    if autoreleasepool {
        openers.push(re(r"^@autoreleasepool\s*\{$"));
    }
    MainWrapper {
        openers,
        exit: Some(re(r"^return\s+0\s*;$")),
    }
}

fn emit_forms(forms: PrintForms) -> Vec<Regex> {
    let mut emit = Vec::new();
    if forms.printf {
        emit.push(re(
            r#"^printf\(\s*"%[-+ #0-9.lzh]*[a-zA-Z]\\n"\s*,\s*(?:\((?:long|int|double|char\s*\*)\)\s*)?(?P<value>.+?)\s*\)\s*;$"#,
        ));
        emit.push(re(
            r#"^printf\(\s*"(?P<text>(?:[^"\\%]|\\[^n]|%%)*)\\n"\s*\)\s*;$"#,
        ));
        emit.push(re(r"^puts\(\s*(?P<value>.+?)\s*\)\s*;$"));
    }
    if forms.cout {
        emit.push(re(
            r#"^std::cout\s*<<\s*(?P<value>.+?)\s*<<\s*(?:std::endl|"\\n")\s*;$"#,
        ));
    }
    if forms.nslog {
        emit.push(re(
            r#"^NSLog\(\s*"%(?:@|l{0,2}[dfgs])"\s*,\s*(?:\((?:long|int|double)\)\s*)?(?P<value>.+?)\s*\)\s*;$"#,
        ));
    }
    emit
}

pub(crate) fn recognizers(forms: PrintForms, exceptions: Exceptions) -> Recognizers {
    let cpp = matches!(exceptions, Exceptions::Cpp | Exceptions::Both);
    let objc = matches!(exceptions, Exceptions::ObjC | Exceptions::Both);
    let try_open = match (cpp, objc) {
        (false, false) => None,
        (true, false) => Some(re(r"^try\s*\{$")),
        (false, true) => Some(re(r"^@try\s*\{$")),
        (true, true) => Some(re(r"^@?try\s*\{$")),
    };
    let catch = (cpp || objc).then(|| {
        re(r"^(?P<close>\})?\s*@?catch\s*(?:\(\s*\.\.\.\s*\)|\(\s*(?:[\w:]+\s*[*&]?\s+)*[*&]?(?P<var>\w+)\s*\))?\s*\{$")
    });
    let throw = if cpp || objc {
        vec![re(r"^@?throw\s+(?P<value>.+?)\s*;$")]
    } else {
        Vec::new()
    };

    Recognizers {
        closer: Some(re(r"^\}\s*;?$")),
        func_def: re(&format!(
            r"^(?:static\s+|inline\s+)*{TYPE}\s*(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)\s*\{{$"
        )),
        for_loop: re(&format!(
            r"^for\s*\(\s*(?:{TYPE}\s*)?(?P<var>[A-Za-z_]\w*)\s*=\s*(?P<start>[^;]+?)\s*;\s*\w+\s*<\s*(?P<end>[^;=][^;]*?)\s*;[^)]*\)\s*\{{$"
        )),
        conditional: re(r"^if\s*\((?P<cond>.+)\)\s*\{$"),
        alternative: re(r"^(?P<close>\})?\s*else\s*\{$"),
        returns: re(r"^return\s+(?P<value>.+?)\s*;$"),
        emit: emit_forms(forms),
        bind: vec![
            re(&format!(
                r"^{TYPE}\s*(?P<name>[A-Za-z_]\w*)\s*=\s*(?P<value>.+?)\s*;$"
            )),
            re(r"^(?P<name>[A-Za-z_]\w*)\s*=\s*(?P<value>[^=].*?)\s*;$"),
        ],
        try_open,
        catch,
        throw,
    }
}
