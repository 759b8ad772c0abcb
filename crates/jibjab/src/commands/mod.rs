//! CLI command implementations - one command per file.

pub mod decompile;
pub mod run;
pub mod targets;

use anyhow::{Context, bail};
use jibjab::TargetId;
use jibjab_languages::profile_for_extension;
use std::io::Read;
use std::path::Path;

/// Read `path` (`-` for stdin) and decide which target it is written in.
pub(crate) fn read_source(path: &Path, target: Option<TargetId>) -> anyhow::Result<(TargetId, String)> {
    let target = match target {
        Some(target) => target,
        None => infer_target(path)?,
    };
    let source = if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        source
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok((target, source))
}

fn infer_target(path: &Path) -> anyhow::Result<TargetId> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        bail!(
            "cannot tell the target of {}; pass --target",
            path.display()
        );
    };
    profile_for_extension(ext)
        .map(|p| p.target)
        .with_context(|| format!("no target uses .{ext} files; pass --target"))
}
