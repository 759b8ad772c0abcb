//! Swift.

use crate::c_family;
use crate::profile::{
    BlockStyle, LanguageProfile, Literals, ParamStyle, Quirks, Recognizers, ToolchainDefaults,
    re,
};
use crate::TargetId;

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Swift,
        name: "Swift",
        extension: "swift",
        comment_prefix: "//",
        block_style: BlockStyle::Braces,
        indent_width: 4,
        literals: Literals {
            yes: "true",
            no: "false",
            nil: "nil",
        },
        operators: c_family::OPERATORS,
        param_style: ParamStyle::Annotated,
        builtins: &["print", "String", "Int", "Double", "abs", "min", "max", "JJError"],
        reserved: &[
            "break", "catch", "continue", "do", "else", "for", "func", "guard", "if", "in", "let",
            "return", "switch", "throw", "try", "var", "while",
        ],
        header_prefixes: &["// Transpiled from JibJab", "import Foundation"],
        forward_decl: None,
        main_wrapper: None,
        quirks: Quirks::default(),
        recognizers: Some(Recognizers {
            closer: Some(re(r"^\}$")),
            func_def: re(
                r"^func\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:throws\s*)?(?:->\s*[\w\[\]?<>:, ]+?)?\s*\{$",
            ),
            for_loop: re(
                r"^for\s+(?P<var>\w+)\s+in\s+(?P<start>[^.]+?)\s*\.\.<\s*(?P<end>.+?)\s*\{$",
            ),
            conditional: re(r"^if\s+(?P<cond>.+?)\s*\{$"),
            alternative: re(r"^(?P<close>\})?\s*else\s*\{$"),
            returns: re(r"^return\s+(?P<value>.+)$"),
            emit: vec![re(r"^print\((?P<value>.*)\)$")],
            bind: vec![
                re(r"^(?:var|let)\s+(?P<name>\w+)\s*(?::\s*[\w\[\]?<>, ]+?)?\s*=\s*(?P<value>.+)$"),
                re(r"^(?P<name>\w+)\s*=\s*(?P<value>[^=].*)$"),
            ],
            try_open: Some(re(r"^do\s*\{$")),
            catch: Some(re(
                r"^(?P<close>\})?\s*catch(?:\s+let\s+(?P<var>\w+))?\s*\{$",
            )),
            throw: vec![
                re(r"^throw\s+\w+\((?:message:\s*)?(?P<value>.*)\)$"),
                re(r"^throw\s+(?P<value>.+)$"),
            ],
        }),
        toolchain: ToolchainDefaults {
            compile: Some(&["swiftc", "-o", "{out}", "{src}"]),
            run: &["{out}"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_ranges() {
        let p = profile();
        let r = p.recognizers.as_ref().unwrap();
        let caps = r.for_loop.captures("for i in 0..<10 {").unwrap();
        assert_eq!((&caps["var"], &caps["start"], &caps["end"]), ("i", "0", "10"));
        let caps = r.for_loop.captures("for i in 1..<(n + 1) {").unwrap();
        assert_eq!(&caps["end"], "(n + 1)");
    }

    #[test]
    fn typed_functions() {
        let p = profile();
        let r = p.recognizers.as_ref().unwrap();
        let caps = r.func_def.captures("func fib(_ n: Int) -> Int {").unwrap();
        assert_eq!((&caps["name"], &caps["params"]), ("fib", "_ n: Int"));
        assert!(r.func_def.is_match("func greet() {"));
    }
}
