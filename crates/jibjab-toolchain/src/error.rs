use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A build stage that runs before the program itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Compile,
    Assemble,
    Link,
    /// Asking the platform for the SDK path the linker needs.
    SdkLookup,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildStep::Compile => "compile",
            BuildStep::Assemble => "assemble",
            BuildStep::Link => "link",
            BuildStep::SdkLookup => "SDK lookup",
        })
    }
}

/// Why a run produced no program output.
///
/// `Display` renders the text shown to the user.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compile error: {step} failed\n{output}")]
    Compile { step: BuildStep, output: String },

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Terminated by a signal, including cancellation.
    #[error("Stopped")]
    Stopped,
}

impl RunError {
    pub fn is_stopped(&self) -> bool {
        matches!(self, RunError::Stopped)
    }
}
