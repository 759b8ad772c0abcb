//! The closed set of target languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the workbench can transpile to, run, and (mostly) read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetId {
    Py,
    Js,
    C,
    Cpp,
    Swift,
    Objc,
    Objcpp,
    Go,
    Applescript,
    Asm,
}

impl TargetId {
    /// Every target, in display order.
    pub const ALL: [TargetId; 10] = [
        TargetId::Py,
        TargetId::Js,
        TargetId::C,
        TargetId::Cpp,
        TargetId::Swift,
        TargetId::Objc,
        TargetId::Objcpp,
        TargetId::Go,
        TargetId::Applescript,
        TargetId::Asm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetId::Py => "py",
            TargetId::Js => "js",
            TargetId::C => "c",
            TargetId::Cpp => "cpp",
            TargetId::Swift => "swift",
            TargetId::Objc => "objc",
            TargetId::Objcpp => "objcpp",
            TargetId::Go => "go",
            TargetId::Applescript => "applescript",
            TargetId::Asm => "asm",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an identifier that names no target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target '{0}' (expected one of: py, js, c, cpp, swift, objc, objcpp, go, applescript, asm)")]
pub struct UnknownTarget(pub String);

impl FromStr for TargetId {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "py" | "python" => Ok(TargetId::Py),
            "js" | "javascript" => Ok(TargetId::Js),
            "c" => Ok(TargetId::C),
            "cpp" | "c++" => Ok(TargetId::Cpp),
            "swift" => Ok(TargetId::Swift),
            "objc" | "objective-c" => Ok(TargetId::Objc),
            "objcpp" | "objective-c++" => Ok(TargetId::Objcpp),
            "go" => Ok(TargetId::Go),
            "applescript" => Ok(TargetId::Applescript),
            "asm" | "assembly" => Ok(TargetId::Asm),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}
