//! Decompiler throughput on generated programs of growing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jibjab_languages::TargetId;
use jibjab_reverse::{Decompiler, decompile};

/// `functions` copies of a small recursive function plus a driver loop.
fn c_program(functions: usize) -> String {
    let mut src = String::from("#include <stdio.h>\n\n");
    for i in 0..functions {
        src.push_str(&format!(
            "int fib{i}(int n) {{\n    if (n <= 1) {{\n        return n;\n    }}\n    return fib{i}(n - 1) + fib{i}(n - 2);\n}}\n\n"
        ));
    }
    src.push_str("int main() {\n");
    for i in 0..functions {
        src.push_str(&format!(
            "    for (int i = 0; i < 10; i++) {{\n        printf(\"%d\\n\", fib{i}(i));\n    }}\n"
        ));
    }
    src.push_str("    return 0;\n}\n");
    src
}

fn python_program(functions: usize) -> String {
    let mut src = String::new();
    for i in 0..functions {
        src.push_str(&format!(
            "def fib{i}(n):\n    if n <= 1:\n        return n\n    return fib{i}(n - 1) + fib{i}(n - 2)\n\n"
        ));
    }
    for i in 0..functions {
        src.push_str(&format!("for i in range(10):\n    print(fib{i}(i))\n"));
    }
    src
}

fn bench_decompile(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompile");
    for functions in [1, 16, 128] {
        for (target, src) in [
            (TargetId::C, c_program(functions)),
            (TargetId::Py, python_program(functions)),
        ] {
            group.throughput(Throughput::Bytes(src.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(target.as_str(), functions),
                &src,
                |b, src| b.iter(|| black_box(decompile(target, src))),
            );
        }
    }
    group.finish();
}

/// A binding, a branch and a print in each readable target.
const SNIPPETS: &[(TargetId, &str)] = &[
    (TargetId::Py, "x = 1 + 2\nif x > 2:\n    print(x)\n"),
    (TargetId::Js, "let x = 1 + 2;\nif (x > 2) {\n    console.log(x);\n}\n"),
    (TargetId::C, "int main() {\n    int x = 1 + 2;\n    if (x > 2) {\n        printf(\"%d\\n\", x);\n    }\n    return 0;\n}\n"),
    (TargetId::Cpp, "int main() {\n    int x = 1 + 2;\n    if (x > 2) {\n        std::cout << x << std::endl;\n    }\n    return 0;\n}\n"),
    (TargetId::Swift, "var x = 1 + 2\nif x > 2 {\n    print(x)\n}\n"),
    (TargetId::Objc, "int main() {\n    int x = 1 + 2;\n    if (x > 2) {\n        NSLog(@\"%d\", x);\n    }\n    return 0;\n}\n"),
    (TargetId::Objcpp, "int main() {\n    int x = 1 + 2;\n    if (x > 2) {\n        std::cout << x << std::endl;\n    }\n    return 0;\n}\n"),
    (TargetId::Go, "package main\n\nfunc main() {\n    x := 1 + 2\n    if x > 2 {\n        fmt.Println(x)\n    }\n}\n"),
    (TargetId::Applescript, "set x to 1 + 2\nif x > 2 then\n    log x\nend if\n"),
];

fn bench_targets(c: &mut Criterion) {
    let mut group = c.benchmark_group("targets");
    for &(target, src) in SNIPPETS {
        group.bench_with_input(BenchmarkId::from_parameter(target), src, |b, src| {
            b.iter(|| black_box(decompile(target, src)))
        });
    }
    group.finish();
}

fn bench_decompiler_reuse(c: &mut Criterion) {
    let src = c_program(16);
    let Some(decompiler) = Decompiler::for_target(TargetId::C) else {
        return;
    };
    c.bench_function("decompiler_reuse", |b| {
        b.iter(|| black_box(decompiler.decompile(&src)))
    });
}

criterion_group!(benches, bench_decompile, bench_targets, bench_decompiler_reuse);
criterion_main!(benches);
