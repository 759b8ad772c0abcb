//! Compile-then-run for every target.
//!
//! The source is written to a fixed scratch file. Compiled targets build an
//! executable next to it first; interpreted targets hand the file to their
//! interpreter. Assembly goes through assemble, link and execute, asking the
//! platform for its SDK path before linking. Every step runs as a session, so
//! cancelling stops whichever step is in flight.

use crate::bridge::InteractiveIo;
use crate::config::{InteractiveConfig, ToolchainConfig};
use crate::error::{BuildStep, RunError};
use crate::session::{
    CommandSpec, ExitKind, SessionIo, SessionManager, SessionOutcome, SessionState,
};
use jibjab_languages::{TargetId, profile};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name of the scratch files.
const SCRATCH_STEM: &str = "jibjab_run";

/// How the program's stdio is connected.
#[derive(Debug)]
pub enum RunMode {
    Batch,
    Interactive(InteractiveIo),
}

/// One request to build and run a target program.
#[derive(Debug)]
pub struct ExecutionRequest {
    pub target: TargetId,
    pub source: String,
    pub mode: RunMode,
}

impl ExecutionRequest {
    pub fn batch(target: TargetId, source: impl Into<String>) -> Self {
        Self {
            target,
            source: source.into(),
            mode: RunMode::Batch,
        }
    }

    pub fn interactive(target: TargetId, source: impl Into<String>, io: InteractiveIo) -> Self {
        Self {
            target,
            source: source.into(),
            mode: RunMode::Interactive(io),
        }
    }
}

/// Output of a program that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutput {
    /// Stdout followed by stderr, trimmed.
    pub output: String,
    pub exit_code: i32,
}

/// Paths substituted into command templates.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    pub src: PathBuf,
    pub out: PathBuf,
    pub obj: PathBuf,
    pub sdk: String,
}

/// Substitute `{src}`, `{out}`, `{obj}` and `{sdk}` in every argument.
pub fn render(template: &[String], values: &Placeholders) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            arg.replace("{src}", &values.src.to_string_lossy())
                .replace("{out}", &values.out.to_string_lossy())
                .replace("{obj}", &values.obj.to_string_lossy())
                .replace("{sdk}", &values.sdk)
        })
        .collect()
}

/// Builds and runs target programs through one [`SessionManager`].
#[derive(Clone)]
pub struct ToolchainRunner {
    config: ToolchainConfig,
    interactive: InteractiveConfig,
    sessions: SessionManager,
}

impl ToolchainRunner {
    pub fn new(config: ToolchainConfig, interactive: InteractiveConfig) -> Self {
        Self {
            config,
            interactive,
            sessions: SessionManager::new(),
        }
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Stop whatever step is running.
    pub async fn cancel(&self) {
        self.sessions.cancel().await;
    }

    pub async fn status(&self) -> SessionState {
        self.sessions.status().await
    }

    /// Scratch paths for `target`.
    pub fn placeholders(&self, target: TargetId) -> Placeholders {
        let dir = self.config.scratch_dir();
        Placeholders {
            src: dir.join(format!("{SCRATCH_STEM}.{}", profile(target).extension)),
            out: dir.join(SCRATCH_STEM),
            obj: dir.join(format!("{SCRATCH_STEM}.o")),
            sdk: String::new(),
        }
    }

    /// Whether the tool that starts `target`'s pipeline is on the search path.
    pub fn is_available(&self, target: TargetId) -> bool {
        let first = match target {
            TargetId::Asm => self.config.assemble_template(),
            _ => self
                .config
                .compile_template(target)
                .unwrap_or_else(|| self.config.run_template(target)),
        };
        match first.first() {
            Some(program) => self.resolve(program).is_some(),
            None => false,
        }
    }

    /// Build and run one request.
    ///
    /// A cancel at any point, including between steps, ends the run with
    /// [`RunError::Stopped`].
    pub async fn run(&self, request: ExecutionRequest) -> Result<RunOutput, RunError> {
        let _scope = self.sessions.scope();
        let ExecutionRequest {
            target,
            source,
            mode,
        } = request;
        let mut values = self.placeholders(target);
        write_source(&values.src, &source).await?;
        info!(%target, src = %values.src.display(), "running");

        if target == TargetId::Asm {
            let query = render(&self.config.sdk_query_template(), &values);
            values.sdk = self.build_step(BuildStep::SdkLookup, &query).await?.trim().to_string();
            let assemble = render(&self.config.assemble_template(), &values);
            self.build_step(BuildStep::Assemble, &assemble).await?;
            let link = render(&self.config.link_template(), &values);
            self.build_step(BuildStep::Link, &link).await?;
        } else if let Some(compile) = self.config.compile_template(target) {
            let compile = render(&compile, &values);
            self.build_step(BuildStep::Compile, &compile).await?;
        }

        let run = render(&self.config.run_template(target), &values);
        let io = match mode {
            RunMode::Batch => SessionIo::Batch,
            RunMode::Interactive(io) => SessionIo::Interactive {
                io,
                poll_interval: self.interactive.poll_interval(),
            },
        };
        let outcome = self.execute(&run, io).await?;
        match outcome.exit {
            ExitKind::Exited(exit_code) => Ok(RunOutput {
                output: outcome.merged_output(),
                exit_code,
            }),
            ExitKind::Signaled => Err(RunError::Stopped),
        }
    }

    /// Run a build step to completion. Its stdout is returned on success.
    async fn build_step(&self, step: BuildStep, command: &[String]) -> Result<String, RunError> {
        debug!(%step, ?command, "build step");
        let outcome = self.execute(command, SessionIo::Batch).await?;
        match outcome.exit {
            ExitKind::Exited(0) => Ok(outcome.stdout),
            ExitKind::Exited(code) => {
                debug!(%step, code, "build step failed");
                Err(RunError::Compile {
                    step,
                    output: outcome.merged_output(),
                })
            }
            ExitKind::Signaled => Err(RunError::Stopped),
        }
    }

    async fn execute(&self, command: &[String], io: SessionIo) -> Result<SessionOutcome, RunError> {
        let Some((program, args)) = command.split_first() else {
            return Err(RunError::Launch {
                program: String::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "empty command template",
                ),
            });
        };
        let program = self
            .resolve(program)
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.clone());
        let spec = CommandSpec::new(program)
            .args(args.iter().cloned())
            .path_env(self.config.augmented_path());
        self.sessions.start(spec, io).await?.wait().await
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let path: OsString = self.config.augmented_path();
        let cwd = std::env::current_dir().ok()?;
        which::which_in(program, Some(path), cwd).ok()
    }
}

async fn write_source(path: &Path, source: &str) -> Result<(), RunError> {
    let write = async {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(path, source).await
    };
    write.await.map_err(|source| RunError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_substituted() {
        let values = Placeholders {
            src: PathBuf::from("/tmp/jj/jibjab_run.c"),
            out: PathBuf::from("/tmp/jj/jibjab_run"),
            obj: PathBuf::from("/tmp/jj/jibjab_run.o"),
            sdk: "/sdk".into(),
        };
        let template: Vec<String> = ["cc", "-o", "{out}", "{src}", "-L{sdk}/lib", "{obj}"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            render(&template, &values),
            [
                "cc",
                "-o",
                "/tmp/jj/jibjab_run",
                "/tmp/jj/jibjab_run.c",
                "-L/sdk/lib",
                "/tmp/jj/jibjab_run.o"
            ]
        );
    }

    #[test]
    fn scratch_files_use_target_extension() {
        let config = ToolchainConfig {
            scratch_dir: Some(PathBuf::from("/scratch")),
            ..ToolchainConfig::default()
        };
        let runner = ToolchainRunner::new(config, InteractiveConfig::default());
        let values = runner.placeholders(TargetId::Objcpp);
        assert_eq!(values.src, PathBuf::from("/scratch/jibjab_run.mm"));
        assert_eq!(values.out, PathBuf::from("/scratch/jibjab_run"));
    }

    #[test]
    fn missing_tools_are_unavailable() {
        let mut config = ToolchainConfig::default();
        config.targets.insert(
            TargetId::Py,
            crate::config::TargetTemplates {
                compile: None,
                run: Some(vec!["jibjab-no-such-interpreter".into(), "{src}".into()]),
            },
        );
        let runner = ToolchainRunner::new(config, InteractiveConfig::default());
        assert!(!runner.is_available(TargetId::Py));
    }
}
