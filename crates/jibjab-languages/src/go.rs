//! Go.

use crate::c_family;
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, MainWrapper, ParamStyle, Quirks, Recognizers,
    ToolchainDefaults, re,
};
use crate::TargetId;

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Go,
        name: "Go",
        extension: "go",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "nil",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::NameFirst,
        builtins: &["len", "panic", "append", "make", "string", "int", "float64", "errors"],
        reserved: &[
            "break", "case", "const", "continue", "defer", "else", "for", "func", "go", "if",
            "import", "package", "range", "return", "switch", "type", "var",
        ],
        header_prefixes: &["// Transpiled from JibJab", "package ", "import \""],
        forward_decl: None,
        main_wrapper: Some(MainWrapper {
            openers: vec![re(r"^func\s+main\s*\(\s*\)\s*\{$")],
            exit: None,
        }),
        quirks: Quirks {
            import_blocks: true,
            format_prints: true,
            ..Quirks::default()
        },
        recognizers: Some(Recognizers {
            closer: Some(re(r"^\}$")),
            func_def: re(
                r"^func\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:[\w\[\]*.]+|\([^)]*\))?\s*\{$",
            ),
            for_loop: re(
                r"^for\s+(?P<var>\w+)\s*:=\s*(?P<start>[^;]+?)\s*;\s*\w+\s*<\s*(?P<end>[^;=][^;]*?)\s*;[^{]*\{$",
            ),
            conditional: re(r"^if\s+(?P<cond>.+?)\s*\{$"),
            alternative: re(r"^(?P<close>\})?\s*else\s*\{$"),
            returns: re(r"^return\s+(?P<value>.+)$"),
            emit: vec![
                re(r"^fmt\.Println\((?P<value>.*)\)$"),
                re(r#"^fmt\.Printf\(\s*"%[a-z]\\n"\s*,\s*(?P<value>.+)\)$"#),
            ],
            bind: vec![
                re(r"^(?P<name>\w+)\s*:=\s*(?P<value>.+)$"),
                re(r"^var\s+(?P<name>\w+)(?:\s+[\w\[\]*]+)?\s*=\s*(?P<value>.+)$"),
                re(r"^(?P<name>\w+)\s*=\s*(?P<value>[^=].*)$"),
            ],
            try_open: None,
            catch: None,
            throw: vec![re(r"^panic\((?P<value>.*)\)$")],
        }),
        toolchain: ToolchainDefaults {
            compile: None,
            run: &["go", "run", "{src}"],
        },
    }
}
