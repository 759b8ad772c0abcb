//! The JibJab workbench.
//!
//! Ties the target-language profiles, the decompiler and the toolchain runner
//! together: configuration is layered from a global and a per-project TOML
//! file, and a [`Workbench`] runs a [`Document`]'s target sources and adopts
//! clean, hand-edited sources back into canonical text.

pub mod config;
mod workbench;

pub use config::{Config, ConfigError};
pub use jibjab_languages::{TargetId, UnknownTarget};
pub use jibjab_reverse::{Decompiled, decompile};
pub use jibjab_toolchain::{ExecutionRequest, RunError, RunMode, RunOutput, ToolchainRunner};
pub use workbench::{Document, ForwardTranspiler, Workbench, WorkbenchError};

