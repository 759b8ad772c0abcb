//! C.

use crate::c_family::{self, Exceptions, PrintForms};
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, ParamStyle, Quirks, ToolchainDefaults,
};
use crate::TargetId;

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::C,
        name: "C",
        extension: "c",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "NULL",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::TypeFirst,
        builtins: &["printf", "puts", "strlen", "strcmp", "strstr", "malloc", "free", "sizeof", "abs"],
        reserved: c_family::RESERVED,
        header_prefixes: c_family::HEADERS,
        forward_decl: Some(c_family::forward_decl()),
        main_wrapper: Some(c_family::main_wrapper(false)),
        quirks: Quirks {
            format_prints: true,
            ..Quirks::default()
        },
        recognizers: Some(c_family::recognizers(
            PrintForms {
                printf: true,
                cout: false,
                nslog: false,
            },
            Exceptions::None,
        )),
        toolchain: ToolchainDefaults {
            compile: Some(&["cc", "-o", "{out}", "{src}"]),
            run: &["{out}"],
        },
    }
}
