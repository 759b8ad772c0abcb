//! JavaScript.

use crate::c_family;
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, Operator, ParamStyle, Quirks, Recognizers,
    ToolchainDefaults, re,
};
use crate::TargetId;
use std::sync::LazyLock;

static OPERATORS: LazyLock<Vec<(&'static str, Operator)>> = LazyLock::new(|| {
    let mut ops = vec![("===", Operator::Eq), ("!==", Operator::Neq)];
    ops.extend_from_slice(c_family::OPERATORS);
    ops
});

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Js,
        name: "JavaScript",
        extension: "js",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 2,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "null",
        },
        operators: OPERATORS.as_slice(),
        param_style: ParamStyle::Untyped,
        builtins: &["parseInt", "parseFloat", "String", "Number", "Error", "Array", "Object"],
        reserved: &[
            "break", "case", "catch", "const", "continue", "else", "for", "function", "if",
            "let", "new", "return", "switch", "throw", "try", "typeof", "var", "while",
        ],
        header_prefixes: &["// Transpiled from JibJab", "\"use strict\"", "'use strict'"],
        forward_decl: None,
        main_wrapper: None,
        quirks: Quirks::default(),
        recognizers: Some(Recognizers {
            closer: Some(re(r"^\}\s*;?$")),
            func_def: re(
                r"^(?:async\s+)?function\s+(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^)]*)\)\s*\{$",
            ),
            for_loop: re(
                r"^for\s*\(\s*(?:let\s+|var\s+|const\s+)?(?P<var>[A-Za-z_$][\w$]*)\s*=\s*(?P<start>[^;]+?)\s*;\s*[\w$]+\s*<\s*(?P<end>[^;=][^;]*?)\s*;[^)]*\)\s*\{$",
            ),
            conditional: re(r"^if\s*\((?P<cond>.+)\)\s*\{$"),
            alternative: re(r"^(?P<close>\})?\s*else\s*\{$"),
            returns: re(r"^return\s+(?P<value>.+?)\s*;?$"),
            emit: vec![re(r"^console\.log\((?P<value>.*)\)\s*;?$")],
            bind: vec![
                re(r"^(?:let|const|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?P<value>.+?)\s*;?$"),
                re(r"^(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?P<value>[^=].*?)\s*;?$"),
            ],
            try_open: Some(re(r"^try\s*\{$")),
            catch: Some(re(
                r"^(?P<close>\})?\s*catch\s*(?:\(\s*(?P<var>[A-Za-z_$][\w$]*)\s*\))?\s*\{$",
            )),
            throw: vec![
                re(r"^throw\s+new\s+\w*Error\((?P<value>.*)\)\s*;?$"),
                re(r"^throw\s+(?P<value>.+?)\s*;?$"),
            ],
        }),
        toolchain: ToolchainDefaults {
            compile: None,
            run: &["node", "{src}"],
        },
    }
}
