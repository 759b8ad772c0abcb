//! Objective-C and Objective-C++.
//!
//! Both wrap top-level code in `@autoreleasepool` inside `main` and write
//! Foundation string literals. Objective-C++ also speaks C++ I/O and exceptions.

use crate::c_family::{self, Exceptions, PrintForms};
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, ParamStyle, Quirks, ToolchainDefaults,
};
use crate::TargetId;

const BUILTINS: &[&str] = &[
    "printf", "puts", "strlen", "NSLog", "abs", "stringWithFormat", "stringWithUTF8String",
];

const QUIRKS: Quirks = Quirks {
    objc_literals: true,
    single_quoted_strings: false,
    import_blocks: false,
    format_prints: true,
    python_prints: false,
};

pub(crate) fn objc_profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Objc,
        name: "Objective-C",
        extension: "m",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "YES",
            no: "NO",
            nil: "nil",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::TypeFirst,
        builtins: BUILTINS,
        reserved: c_family::RESERVED,
        header_prefixes: c_family::HEADERS,
        forward_decl: Some(c_family::forward_decl()),
        main_wrapper: Some(c_family::main_wrapper(true)),
        quirks: QUIRKS,
        recognizers: Some(c_family::recognizers(
            PrintForms {
                printf: true,
                cout: false,
                nslog: true,
            },
            Exceptions::ObjC,
        )),
        toolchain: ToolchainDefaults {
            compile: Some(&["clang", "-framework", "Foundation", "-o", "{out}", "{src}"]),
            run: &["{out}"],
        },
    }
}

pub(crate) fn objcpp_profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Objcpp,
        name: "Objective-C++",
        extension: "mm",
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "nil",
        },
        builtins: crate::cpp::BUILTINS,
        header_prefixes: &["// Transpiled from JibJab", "#include", "#import", "using namespace"],
        recognizers: Some(c_family::recognizers(
            PrintForms {
                printf: true,
                cout: true,
                nslog: true,
            },
            Exceptions::Both,
        )),
        toolchain: ToolchainDefaults {
            compile: Some(&[
                "clang++", "-std=c++17", "-framework", "Foundation", "-o", "{out}", "{src}",
            ]),
            run: &["{out}"],
        },
        ..objc_profile()
    }
}
