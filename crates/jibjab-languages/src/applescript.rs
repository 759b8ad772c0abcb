//! AppleScript.

use crate::profile::{
    BlockStyle, LanguageProfile, Literals, Operator, ParamStyle, Quirks, Recognizers,
    ToolchainDefaults, re,
};
use crate::TargetId;

const OPERATORS: &[(&str, Operator)] = &[
    ("is not", Operator::Neq),
    ("≠", Operator::Neq),
    ("<=", Operator::Lte),
    (">=", Operator::Gte),
    ("≤", Operator::Lte),
    ("≥", Operator::Gte),
    ("and", Operator::And),
    ("mod", Operator::Mod),
    ("div", Operator::Div),
    ("or", Operator::Or),
    ("=", Operator::Eq),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("+", Operator::Add),
    ("-", Operator::Sub),
    ("*", Operator::Mul),
    ("/", Operator::Div),
    ("not", Operator::Not),
];

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Applescript,
        name: "AppleScript",
        extension: "applescript",
        comment_prefix: "--",
        block_style: BlockStyle::EndKeyword,
        indent_width: 4,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "missing value",
        },
        operators: OPERATORS,
        param_style: ParamStyle::Untyped,
        builtins: &["log", "count", "length", "error"],
        reserved: &[
            "set", "to", "if", "then", "else", "end", "repeat", "with", "from", "on", "return",
            "try", "error", "log", "my", "of", "is", "not",
        ],
        header_prefixes: &["-- Transpiled from JibJab"],
        forward_decl: None,
        main_wrapper: None,
        quirks: Quirks::default(),
        recognizers: Some(Recognizers {
            closer: Some(re(r"^end(?:\s+\w+)?$")),
            func_def: re(r"^on\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)$"),
            for_loop: re(
                r"^repeat\s+with\s+(?P<var>\w+)\s+from\s+(?P<start>.+?)\s+to\s+\((?P<end>.+)\s+-\s+1\)$",
            ),
            conditional: re(r"^if\s+(?P<cond>.+?)\s+then$"),
            alternative: re(r"^else$"),
            returns: re(r"^return\s+(?P<value>.+)$"),
            emit: vec![re(r"^log\s+(?P<value>.+)$")],
            bind: vec![re(r"^set\s+(?P<name>\w+)\s+to\s+(?P<value>.+)$")],
            try_open: Some(re(r"^try$")),
            catch: Some(re(r"^on\s+error(?:\s+(?P<var>\w+))?$")),
            throw: vec![re(r"^error\s+(?P<value>.+)$")],
        }),
        toolchain: ToolchainDefaults {
            compile: None,
            run: &["osascript", "{src}"],
        },
    }
}
