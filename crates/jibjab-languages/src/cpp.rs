//! C++.

use crate::c_family::{self, Exceptions, PrintForms};
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, ParamStyle, Quirks, ToolchainDefaults,
};
use crate::TargetId;

pub(crate) const BUILTINS: &[&str] = &[
    "printf", "puts", "strlen", "std::to_string", "to_string", "size", "push_back", "abs",
    "runtime_error",
];

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Cpp,
        name: "C++",
        extension: "cpp",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "nullptr",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::TypeFirst,
        builtins: BUILTINS,
        reserved: c_family::RESERVED,
        header_prefixes: &["// Transpiled from JibJab", "#include", "using namespace"],
        forward_decl: Some(c_family::forward_decl()),
        main_wrapper: Some(c_family::main_wrapper(false)),
        quirks: Quirks {
            format_prints: true,
            ..Quirks::default()
        },
        recognizers: Some(c_family::recognizers(
            PrintForms {
                printf: true,
                cout: true,
                nslog: false,
            },
            Exceptions::Cpp,
        )),
        toolchain: ToolchainDefaults {
            compile: Some(&["c++", "-std=c++17", "-o", "{out}", "{src}"]),
            run: &["{out}"],
        },
    }
}
