//! Targets command - what each target supports on this machine.

use jibjab::{Config, TargetId};
use jibjab_languages::profiles;
use serde::Serialize;

#[derive(Serialize)]
struct TargetRow {
    id: TargetId,
    name: &'static str,
    extension: &'static str,
    decompile: bool,
    available: bool,
}

pub fn cmd_targets(config: &Config, json: bool) -> i32 {
    let runner = config.runner();
    let rows: Vec<TargetRow> = profiles()
        .map(|p| TargetRow {
            id: p.target,
            name: p.name,
            extension: p.extension,
            decompile: p.recognizers.is_some(),
            available: runner.is_available(p.target),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return 0;
    }

    let yes_no = |b: bool| if b { "yes" } else { "no" };
    println!(
        "{:<12} {:<16} {:<12} {:<10} {}",
        "ID", "NAME", "EXTENSION", "DECOMPILE", "AVAILABLE"
    );
    for row in &rows {
        println!(
            "{:<12} {:<16} {:<12} {:<10} {}",
            row.id.as_str(),
            row.name,
            format!(".{}", row.extension),
            yes_no(row.decompile),
            yes_no(row.available)
        );
    }
    0
}
