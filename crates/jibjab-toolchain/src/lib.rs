//! Building and running JibJab target programs.
//!
//! [`ToolchainRunner`] turns a target's source text into program output by
//! writing it to a scratch file and driving the target's compile and run
//! command templates. Processes are owned by a [`SessionManager`], which keeps
//! at most one child alive, drains stdout and stderr concurrently, and can
//! bridge stdin for interactive programs.

mod bridge;
mod config;
mod error;
mod pipe;
mod runner;
mod session;

pub use bridge::{InputRequest, InteractiveIo};
pub use config::{InteractiveConfig, NativeConfig, TargetTemplates, ToolchainConfig};
pub use error::{BuildStep, RunError};
pub use runner::{ExecutionRequest, Placeholders, RunMode, RunOutput, ToolchainRunner, render};
pub use session::{
    CancelScope, CommandSpec, ExitKind, SessionEvent, SessionHandle, SessionIo, SessionManager,
    SessionOutcome, SessionState,
};
