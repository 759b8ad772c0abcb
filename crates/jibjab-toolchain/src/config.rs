//! Toolchain command templates and where to find the tools.
//!
//! Every field is optional; unset fields fall back to the defaults carried by
//! the language profiles. Templates are argument lists whose entries may
//! contain `{src}`, `{out}`, `{obj}` and `{sdk}`.
//!
//! ```toml
//! [toolchain]
//! scratch_dir = "/tmp/jibjab"
//! search_path = ["/opt/homebrew/bin"]
//!
//! [toolchain.targets.c]
//! compile = ["gcc", "-O2", "-o", "{out}", "{src}"]
//!
//! [toolchain.native]
//! sdk_query = ["xcrun", "--show-sdk-path"]
//! ```

use jibjab_languages::{TargetId, profile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Directories searched ahead of `PATH`. `~` expands to the home directory.
const DEFAULT_SEARCH_PATH: &[&str] = &[
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/usr/local/go/bin",
    "~/.cargo/bin",
];

const DEFAULT_ASSEMBLE: &[&str] = &["as", "-arch", "arm64", "-o", "{obj}", "{src}"];
const DEFAULT_LINK: &[&str] = &[
    "ld", "-o", "{out}", "{obj}", "-lSystem", "-syslibroot", "{sdk}", "-e", "_main", "-arch",
    "arm64",
];
const DEFAULT_SDK_QUERY: &[&str] = &["xcrun", "--show-sdk-path"];

const DEFAULT_POLL_INTERVAL_MS: u64 = 300;

/// Per-target template overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetTemplates {
    pub compile: Option<Vec<String>>,
    pub run: Option<Vec<String>>,
}

/// Commands for the assemble, link, execute chain of native targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NativeConfig {
    pub assemble: Option<Vec<String>>,
    pub link: Option<Vec<String>>,
    pub sdk_query: Option<Vec<String>>,
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Where the source and build artifacts of a run are written.
    pub scratch_dir: Option<PathBuf>,
    /// Directories prepended to `PATH` when resolving and launching tools.
    pub search_path: Option<Vec<String>>,
    pub targets: BTreeMap<TargetId, TargetTemplates>,
    pub native: NativeConfig,
}

/// `[interactive]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractiveConfig {
    /// Quiet time after which a live program is assumed to wait for input.
    pub poll_interval_ms: Option<u64>,
}

fn owned(template: &[&str]) -> Vec<String> {
    template.iter().map(|arg| arg.to_string()).collect()
}

fn expand_home(dir: &str) -> PathBuf {
    match dir.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(dir)),
        None => PathBuf::from(dir),
    }
}

impl ToolchainConfig {
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("jibjab"))
    }

    /// Configured search directories, home-expanded.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        match &self.search_path {
            Some(dirs) => dirs.iter().map(|d| expand_home(d)).collect(),
            None => DEFAULT_SEARCH_PATH.iter().map(|d| expand_home(d)).collect(),
        }
    }

    /// `PATH` for child processes: the search directories, then the inherited `PATH`.
    pub fn augmented_path(&self) -> OsString {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = self
            .search_dirs()
            .into_iter()
            .chain(std::env::split_paths(&inherited));
        std::env::join_paths(dirs).unwrap_or(inherited)
    }

    pub fn compile_template(&self, target: TargetId) -> Option<Vec<String>> {
        match self.targets.get(&target).and_then(|t| t.compile.clone()) {
            Some(compile) => Some(compile),
            None => profile(target).toolchain.compile.map(owned),
        }
    }

    pub fn run_template(&self, target: TargetId) -> Vec<String> {
        self.targets
            .get(&target)
            .and_then(|t| t.run.clone())
            .unwrap_or_else(|| owned(profile(target).toolchain.run))
    }

    pub fn assemble_template(&self) -> Vec<String> {
        self.native
            .assemble
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_ASSEMBLE))
    }

    pub fn link_template(&self) -> Vec<String> {
        self.native
            .link
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_LINK))
    }

    pub fn sdk_query_template(&self) -> Vec<String> {
        self.native
            .sdk_query
            .clone()
            .unwrap_or_else(|| owned(DEFAULT_SDK_QUERY))
    }

    /// Layer `other` over `self`. Fields set in `other` win; target overrides merge per field.
    pub fn merge(self, other: Self) -> Self {
        let mut targets = self.targets;
        for (target, over) in other.targets {
            let entry = targets.entry(target).or_default();
            entry.compile = over.compile.or(entry.compile.take());
            entry.run = over.run.or(entry.run.take());
        }
        Self {
            scratch_dir: other.scratch_dir.or(self.scratch_dir),
            search_path: other.search_path.or(self.search_path),
            targets,
            native: NativeConfig {
                assemble: other.native.assemble.or(self.native.assemble),
                link: other.native.link.or(self.native.link),
                sdk_query: other.native.sdk_query.or(self.native.sdk_query),
            },
        }
    }
}

impl InteractiveConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_apply() {
        let config = ToolchainConfig::default();
        assert_eq!(
            config.compile_template(TargetId::C),
            Some(owned(&["cc", "-o", "{out}", "{src}"]))
        );
        assert_eq!(config.compile_template(TargetId::Py), None);
        assert_eq!(config.run_template(TargetId::Py), owned(&["python3", "{src}"]));
        assert_eq!(config.link_template()[0], "ld");
    }

    #[test]
    fn later_layers_override_per_field() {
        let mut global = ToolchainConfig::default();
        global.targets.insert(
            TargetId::C,
            TargetTemplates {
                compile: Some(owned(&["gcc", "-o", "{out}", "{src}"])),
                run: Some(owned(&["{out}", "--global"])),
            },
        );
        let mut project = ToolchainConfig {
            scratch_dir: Some(PathBuf::from("/tmp/project")),
            ..ToolchainConfig::default()
        };
        project.targets.insert(
            TargetId::C,
            TargetTemplates {
                compile: Some(owned(&["clang", "-o", "{out}", "{src}"])),
                run: None,
            },
        );

        let merged = global.merge(project);
        assert_eq!(merged.scratch_dir(), PathBuf::from("/tmp/project"));
        assert_eq!(merged.compile_template(TargetId::C).unwrap()[0], "clang");
        assert_eq!(merged.run_template(TargetId::C), owned(&["{out}", "--global"]));
    }

    #[test]
    fn search_path_leads_path() {
        let config = ToolchainConfig {
            search_path: Some(vec!["/opt/jj/bin".into()]),
            ..ToolchainConfig::default()
        };
        let path = config.augmented_path();
        let first = std::env::split_paths(&path).next();
        assert_eq!(first, Some(PathBuf::from("/opt/jj/bin")));
    }

    #[test]
    fn parses_toolchain_table() {
        let config: ToolchainConfig = toml::from_str(
            r#"
scratch_dir = "/tmp/jj"

[targets.c]
compile = ["gcc", "-o", "{out}", "{src}"]

[native]
sdk_query = ["xcrun", "--sdk", "macosx", "--show-sdk-path"]
"#,
        )
        .unwrap();
        assert_eq!(config.scratch_dir(), PathBuf::from("/tmp/jj"));
        assert_eq!(config.compile_template(TargetId::C).unwrap()[0], "gcc");
        assert_eq!(config.run_template(TargetId::C), owned(&["{out}"]));
        assert_eq!(config.sdk_query_template().len(), 4);
    }

    #[test]
    fn poll_interval_default() {
        assert_eq!(
            InteractiveConfig::default().poll_interval(),
            Duration::from_millis(300)
        );
    }
}
