//! Decompile command - read target source back into canonical JibJab.

use clap::Args;
use jibjab::{Decompiled, TargetId};
use std::path::PathBuf;

#[derive(Args)]
pub struct DecompileArgs {
    /// Source file, or `-` for stdin
    pub file: PathBuf,

    /// Source language (inferred from the file extension if omitted)
    #[arg(short, long)]
    pub target: Option<TargetId>,
}

pub fn cmd_decompile(args: &DecompileArgs, json: bool) -> i32 {
    let (target, source) = match super::read_source(&args.file, args.target) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("error: {e:#}");
            return 1;
        }
    };

    let result = jibjab::decompile(target, &source);
    if json {
        let report = serde_json::json!({ "target": target, "result": &result });
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    }

    match result {
        Decompiled::Canonical(text) => {
            if !json {
                print!("{text}");
            }
            0
        }
        Decompiled::Nothing => {
            eprintln!("nothing produced from {target} source");
            1
        }
    }
}
