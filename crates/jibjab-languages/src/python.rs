//! Python.

use crate::profile::{
    BlockStyle, LanguageProfile, Literals, Operator, ParamStyle, Quirks, Recognizers,
    ToolchainDefaults, re,
};
use crate::TargetId;

const OPERATORS: &[(&str, Operator)] = &[
    ("==", Operator::Eq),
    ("!=", Operator::Neq),
    ("<=", Operator::Lte),
    (">=", Operator::Gte),
    ("and", Operator::And),
    ("or", Operator::Or),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("+", Operator::Add),
    ("-", Operator::Sub),
    ("*", Operator::Mul),
    ("//", Operator::Div),
    ("/", Operator::Div),
    ("%", Operator::Mod),
    ("not", Operator::Not),
];

const RESERVED: &[&str] = &[
    "and", "as", "break", "class", "continue", "def", "del", "elif", "else", "except", "for",
    "from", "if", "import", "in", "is", "lambda", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

pub(crate) fn profile() -> LanguageProfile {
    LanguageProfile {
        target: TargetId::Py,
        name: "Python",
        extension: "py",
        comment_prefix: "#",
        block_style: BlockStyle::Indentation,
        indent_width: 4,
        literals: Literals {
            yes: "True",
            no: "False",
            nil: "None",
        },
        operators: OPERATORS,
        param_style: ParamStyle::Annotated,
        builtins: &[
            "print", "range", "len", "str", "int", "float", "abs", "min", "max", "round",
            "Exception", "isinstance", "list", "dict",
        ],
        reserved: RESERVED,
        header_prefixes: &["#!", "# Transpiled from JibJab"],
        forward_decl: None,
        main_wrapper: None,
        quirks: Quirks {
            single_quoted_strings: true,
            python_prints: true,
            ..Quirks::default()
        },
        recognizers: Some(Recognizers {
            closer: None,
            func_def: re(
                r"^def\s+(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)\s*(?:->\s*[^:]+)?:$",
            ),
            for_loop: re(
                r"^for\s+(?P<var>[A-Za-z_]\w*)\s+in\s+range\(\s*(?:(?P<start>[^,]+?)\s*,\s*)?(?P<end>[^,]+?)\s*\)\s*:$",
            ),
            conditional: re(r"^if\s+(?P<cond>.+?)\s*:$"),
            alternative: re(r"^else\s*:$"),
            returns: re(r"^return\s+(?P<value>.+)$"),
            emit: vec![re(r"^print\((?P<value>.*)\)$")],
            bind: vec![
                re(r"^(?P<name>[A-Za-z_]\w*)\s*=\s*(?P<value>[^=].*)$"),
                re(r"^(?P<name>[A-Za-z_]\w*)\s*:\s*[\w\[\], ]+?\s*=\s*(?P<value>[^=].*)$"),
            ],
            try_open: Some(re(r"^try\s*:$")),
            catch: Some(re(
                r"^except(?:\s+[\w.]+(?:\s+as\s+(?P<var>\w+))?)?\s*:$",
            )),
            throw: vec![
                re(r"^raise\s+[A-Za-z_][\w.]*\((?P<value>.*)\)$"),
                re(r"^raise\s+(?P<value>.+)$"),
            ],
        }),
        toolchain: ToolchainDefaults {
            compile: None,
            run: &["python3", "{src}"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_loops() {
        let p = profile();
        let r = p.recognizers.as_ref().unwrap();
        let caps = r.for_loop.captures("for i in range(1, 11):").unwrap();
        assert_eq!((&caps["var"], &caps["start"], &caps["end"]), ("i", "1", "11"));
        let caps = r.for_loop.captures("for i in range(10):").unwrap();
        assert!(caps.name("start").is_none());
        assert_eq!(&caps["end"], "10");
    }

    #[test]
    fn except_clauses() {
        let p = profile();
        let catch = p.recognizers.as_ref().unwrap().catch.as_ref().unwrap();
        assert!(catch.captures("except:").unwrap().name("var").is_none());
        let caps = catch.captures("except Exception as e:").unwrap();
        assert_eq!(&caps["var"], "e");
    }

    #[test]
    fn comparisons_are_not_bindings() {
        let p = profile();
        let bind = &p.recognizers.as_ref().unwrap().bind;
        assert!(!bind.iter().any(|re| re.is_match("x == 1")));
        assert!(bind[1].is_match("count: int = 0"));
    }
}
