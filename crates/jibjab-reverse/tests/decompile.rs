//! Decompiler tests over programs shaped like the forward transpilers' output.
//!
//! Run `cargo insta review` to update inline snapshots after intentional changes.

use jibjab_languages::TargetId;
use jibjab_reverse::{Decompiled, decompile};

fn canonical(target: TargetId, source: &str) -> String {
    match decompile(target, source) {
        Decompiled::Canonical(text) => text,
        Decompiled::Nothing => panic!("nothing produced for {target}"),
    }
}

/// Canonical form of the fibonacci program every target below encodes.
const FIBONACCI: &str = "\
<~morph{fib(n)}>>
  <~when{n <lt> #2}>>
    ~>yeet{n}
  <~>>
  ~>yeet{~>invoke{fib}::with((n <-> #1)) <+> ~>invoke{fib}::with((n <-> #2))}
<~>>

<~loop{i:#0..#15}>>
  ~>frob{7a3}::emit(~>invoke{fib}::with(i))
<~>>
";

// ============================================================================
// Whole programs
// ============================================================================

mod fibonacci {
    use super::*;

    #[test]
    fn c() {
        let src = r#"// Transpiled from JibJab
#include <stdio.h>
#include <stdlib.h>

int fib(int n);

int fib(int n) {
    if ((n < 2)) {
        return n;
    }
    return (fib((n - 1)) + fib((n - 2)));
}

int main() {
    for (int i = 0; i < 15; i++) {
        printf("%d\n", fib(i));
    }
    return 0;
}
"#;
        assert_eq!(canonical(TargetId::C, src), FIBONACCI);
    }

    #[test]
    fn python() {
        let src = r#"#!/usr/bin/env python3
# Transpiled from JibJab

def fib(n):
    if (n < 2):
        return n
    return (fib((n - 1)) + fib((n - 2)))

for i in range(0, 15):
    print(fib(i))
"#;
        assert_eq!(canonical(TargetId::Py, src), FIBONACCI);
    }

    #[test]
    fn javascript() {
        let src = r#"// Transpiled from JibJab

function fib(n) {
  if ((n < 2)) {
    return n;
  }
  return (fib((n - 1)) + fib((n - 2)));
}

for (let i = 0; i < 15; i++) {
  console.log(fib(i));
}
"#;
        assert_eq!(canonical(TargetId::Js, src), FIBONACCI);
    }

    #[test]
    fn go() {
        let src = "package main\n\nimport \"fmt\"\n\nfunc fib(n int) int {\n\tif (n < 2) {\n\t\treturn n\n\t}\n\treturn (fib((n - 1)) + fib((n - 2)))\n}\n\nfunc main() {\n\tfor i := 0; i < 15; i++ {\n\t\tfmt.Println(fib(i))\n\t}\n}\n";
        assert_eq!(canonical(TargetId::Go, src), FIBONACCI);
    }

    #[test]
    fn swift() {
        let src = r#"import Foundation

func fib(_ n: Int) -> Int {
    if (n < 2) {
        return n
    }
    return (fib((n - 1)) + fib((n - 2)))
}

for i in 0..<15 {
    print(fib(i))
}
"#;
        assert_eq!(canonical(TargetId::Swift, src), FIBONACCI);
    }

    #[test]
    fn applescript() {
        let src = r#"-- Transpiled from JibJab

on fib(n)
    if (n < 2) then
        return n
    end if
    return (fib((n - 1)) + fib((n - 2)))
end fib

repeat with i from 0 to (15 - 1)
    log fib(i)
end repeat
"#;
        assert_eq!(canonical(TargetId::Applescript, src), FIBONACCI);
    }

    #[test]
    fn objective_c() {
        let src = r#"// Transpiled from JibJab
#import <Foundation/Foundation.h>

int fib(int n);

int fib(int n) {
    if ((n < 2)) {
        return n;
    }
    return (fib((n - 1)) + fib((n - 2)));
}

int main(int argc, const char * argv[]) {
    @autoreleasepool {
        for (int i = 0; i < 15; i++) {
            printf("%d\n", fib(i));
        }
    }
    return 0;
}
"#;
        assert_eq!(canonical(TargetId::Objc, src), FIBONACCI);
    }

    #[test]
    fn cpp() {
        let src = r#"#include <iostream>
using namespace std;

int fib(int n) {
    if ((n < 2)) {
        return n;
    }
    return (fib((n - 1)) + fib((n - 2)));
}

int main() {
    for (int i = 0; i < 15; i++) {
        std::cout << fib(i) << std::endl;
    }
    return 0;
}
"#;
        assert_eq!(canonical(TargetId::Cpp, src), FIBONACCI);
    }
}

// ============================================================================
// Main wrappers
// ============================================================================

mod wrappers {
    use super::*;

    #[test]
    fn one_line_c_program() {
        let out = canonical(
            TargetId::C,
            r#"int main(){ int x = 1 + 2; printf("%d\n", x); return 0; }"#,
        );
        insta::assert_snapshot!(out, @r"
        ~>snag{x}::val(#1 <+> #2)
        ~>frob{7a3}::emit(x)
        ");
    }

    #[test]
    fn early_exit_is_kept_when_code_follows() {
        let src = "int main() {\n    return 0;\n    printf(\"%d\\n\", 1);\n}\n";
        assert_eq!(
            canonical(TargetId::C, src),
            "~>yeet{#0}\n~>frob{7a3}::emit(#1)\n"
        );
    }

    #[test]
    fn go_main_body_is_unwrapped() {
        let src = "func main() {\n\tx := 2\n\tfmt.Println(x * 3)\n}\n";
        assert_eq!(
            canonical(TargetId::Go, src),
            "~>snag{x}::val(#2)\n~>frob{7a3}::emit(x <*> #3)\n"
        );
    }

    #[test]
    fn objcpp_accepts_both_print_forms() {
        let src = "int main() {\n    @autoreleasepool {\n        std::cout << 1 << std::endl;\n        printf(\"%d\\n\", 2);\n    }\n    return 0;\n}\n";
        assert_eq!(
            canonical(TargetId::Objcpp, src),
            "~>frob{7a3}::emit(#1)\n~>frob{7a3}::emit(#2)\n"
        );
    }
}

// ============================================================================
// Conditionals
// ============================================================================

mod conditionals {
    use super::*;

    const IF_ELSE: &str = "\
<~when{x <gt> #0}>>
  ~>frob{7a3}::emit(\"pos\")
<~else>>
  ~>frob{7a3}::emit(\"neg\")
<~>>
";

    #[test]
    fn braces_combined_else() {
        let src = "if (x > 0) {\n    printf(\"%s\\n\", \"pos\");\n} else {\n    printf(\"%s\\n\", \"neg\");\n}\n";
        assert_eq!(canonical(TargetId::C, src), IF_ELSE);
    }

    #[test]
    fn python_else() {
        let src = "if x > 0:\n    print('pos')\nelse:\n    print('neg')\n";
        assert_eq!(canonical(TargetId::Py, src), IF_ELSE);
    }

    #[test]
    fn applescript_else() {
        let src = "if (x > 0) then\n    log \"pos\"\nelse\n    log \"neg\"\nend if\n";
        assert_eq!(canonical(TargetId::Applescript, src), IF_ELSE);
    }

    #[test]
    fn unterminated_blocks_are_closed() {
        let src = "if (x > 0) {\n    printf(\"%d\\n\", x);\n";
        assert_eq!(
            canonical(TargetId::C, src),
            "<~when{x <gt> #0}>>\n  ~>frob{7a3}::emit(x)\n<~>>\n"
        );
    }
}

// ============================================================================
// Exceptions
// ============================================================================

mod exceptions {
    use super::*;

    const TRY_CATCH: &str = "\
<~try>>
  ~>kaboom{\"boom\"}
<~oops>> e
  ~>frob{7a3}::emit(e)
<~>>
";

    #[test]
    fn javascript() {
        let src = "try {\n  throw new Error(\"boom\");\n} catch (e) {\n  console.log(e);\n}\n";
        assert_eq!(canonical(TargetId::Js, src), TRY_CATCH);
    }

    #[test]
    fn python() {
        let src = "try:\n    raise Exception(\"boom\")\nexcept Exception as e:\n    print(e)\n";
        assert_eq!(canonical(TargetId::Py, src), TRY_CATCH);
    }

    #[test]
    fn applescript() {
        let src = "try\n    error \"boom\"\non error e\n    log e\nend try\n";
        assert_eq!(canonical(TargetId::Applescript, src), TRY_CATCH);
    }
}

// ============================================================================
// Expressions and literals
// ============================================================================

mod expressions {
    use super::*;

    #[test]
    fn numbers_inside_strings_stay_untagged() {
        assert_eq!(
            canonical(TargetId::Py, "print(\"id 42\")\n"),
            "~>frob{7a3}::emit(\"id 42\")\n"
        );
    }

    #[test]
    fn python_range_with_one_argument_starts_at_zero() {
        assert_eq!(
            canonical(TargetId::Py, "for i in range(10):\n    print(i)\n"),
            "<~loop{i:#0..#10}>>\n  ~>frob{7a3}::emit(i)\n<~>>\n"
        );
    }

    #[test]
    fn objc_string_literals() {
        let src = "NSString *s = @\"hi\";\nNSLog(@\"%@\", s);\n";
        assert_eq!(
            canonical(TargetId::Objc, src),
            "~>snag{s}::val(\"hi\")\n~>frob{7a3}::emit(s)\n"
        );
    }

    #[test]
    fn bare_printf_literal() {
        assert_eq!(
            canonical(TargetId::C, "printf(\"hello\\n\");\n"),
            "~>frob{7a3}::emit(\"hello\")\n"
        );
    }

    #[test]
    fn comments_carry_over() {
        assert_eq!(
            canonical(TargetId::Swift, "// note\nvar x = true\n"),
            "@@ note\n~>snag{x}::val(~yep)\n"
        );
    }

    #[test]
    fn unrecognized_lines_are_rewritten_in_place() {
        assert_eq!(
            canonical(TargetId::Js, "total += step(1);\n"),
            "total += ~>invoke{step}::with(#1)\n"
        );
    }

    #[test]
    fn nested_calls_and_signed_numbers() {
        let out = canonical(TargetId::C, "int y = (a + 1) * f(-2);\n");
        assert_eq!(out, "~>snag{y}::val((a <+> #1) <*> ~>invoke{f}::with(#-2))\n");
    }
}

// ============================================================================
// Format and boolean prints
// ============================================================================

mod prints {
    use super::*;

    const PAIR: &str = "~>frob{7a3}::emit(\"{a} and {b}\")\n";

    #[test]
    fn printf_with_several_values() {
        let src = "printf(\"%d and %d\\n\", a, b);\n";
        assert_eq!(canonical(TargetId::C, src), PAIR);
    }

    #[test]
    fn go_printf() {
        let src = "func main() {\n\tfmt.Printf(\"%v and %v\\n\", a, b)\n}\n";
        assert_eq!(canonical(TargetId::Go, src), PAIR);
    }

    #[test]
    fn python_fstring() {
        assert_eq!(canonical(TargetId::Py, "print(f\"{a} and {b}\")\n"), PAIR);
    }

    #[test]
    fn cout_chain() {
        let src = "std::cout << a << \" and \" << b << std::endl;\n";
        assert_eq!(canonical(TargetId::Cpp, src), PAIR);
    }

    #[test]
    fn boolean_ternaries_print_the_variable() {
        let expected = "~>frob{7a3}::emit(done)\n";
        let c = "printf(\"%s\\n\", done ? \"true\" : \"false\");\n";
        assert_eq!(canonical(TargetId::C, c), expected);
        let cpp = "std::cout << (done ? \"true\" : \"false\") << std::endl;\n";
        assert_eq!(canonical(TargetId::Cpp, cpp), expected);
        let objc = "NSLog(@\"%@\", done ? @\"true\" : @\"false\");\n";
        assert_eq!(canonical(TargetId::Objc, objc), expected);
        assert_eq!(canonical(TargetId::Py, "print(str(done).lower())\n"), expected);
    }

    #[test]
    fn booleans_inside_interpolation() {
        let src = "print(f\"done: {str(done).lower()}\")\n";
        assert_eq!(
            canonical(TargetId::Py, src),
            "~>frob{7a3}::emit(\"done: {done}\")\n"
        );
        let src = "printf(\"done: %s\\n\", done ? \"true\" : \"false\");\n";
        assert_eq!(
            canonical(TargetId::C, src),
            "~>frob{7a3}::emit(\"done: {done}\")\n"
        );
    }

    #[test]
    fn nslog_integers() {
        let src = "int main(int argc, const char * argv[]) {\n    @autoreleasepool {\n        NSLog(@\"%ld\", (long)total);\n    }\n    return 0;\n}\n";
        assert_eq!(canonical(TargetId::Objc, src), "~>frob{7a3}::emit(total)\n");
    }
}

// ============================================================================
// Depth invariants
// ============================================================================

#[test]
fn indentation_matches_depth_everywhere() {
    let src = "int f(int a) {\n if (a > 1) {\n  for (int i = 0; i < a; i++) {\n   printf(\"%d\\n\", i);\n  }\n }\n return a;\n}\n";
    let out = canonical(TargetId::C, src);
    let mut depth = 0usize;
    for line in out.lines().filter(|l| !l.is_empty()) {
        let body = line.trim_start();
        if body == "<~>>" || body.starts_with("<~else>>") || body.starts_with("<~oops>>") {
            depth -= 1;
        }
        assert_eq!(line.len() - body.len(), depth * 2, "{line:?}");
        if body.starts_with("<~") && body != "<~>>" {
            depth += 1;
        }
    }
    assert_eq!(depth, 0);
}

#[test]
fn output_ends_with_exactly_one_newline() {
    for target in TargetId::ALL {
        if let Decompiled::Canonical(text) = decompile(target, "x = 1\n\n\n") {
            assert!(text.ends_with('\n') && !text.ends_with("\n\n"), "{target}");
        }
    }
}
