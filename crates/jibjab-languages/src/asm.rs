//! ARM64 assembly. Runnable, but never read back.

use crate::c_family;
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, ParamStyle, Quirks, ToolchainDefaults,
};
use crate::TargetId;

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Asm,
        name: "ARM64 Assembly",
        extension: "s",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "1",
            no: "0",
            nil: "0",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::Untyped,
        builtins: &[],
        reserved: &[],
        header_prefixes: &[],
        forward_decl: None,
        main_wrapper: None,
        quirks: Quirks::default(),
        recognizers: None,
        // Assembly builds go through the native assemble/link pipeline.
        toolchain: ToolchainDefaults {
            compile: None,
            run: &["{out}"],
        },
    }
}
