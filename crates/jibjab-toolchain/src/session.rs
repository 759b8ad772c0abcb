//! The single active child process.
//!
//! A [`SessionManager`] owns at most one running child. Starting a new
//! session stops the previous one and waits for it to be reaped first.
//! Callers never hold the child itself: they get a [`SessionHandle`] to await
//! its outcome and act on the session through the manager.

use crate::bridge::{self, InteractiveIo};
use crate::error::RunError;
use crate::pipe::drain;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of the most recent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session has been started.
    Idle,
    Starting,
    Running,
    /// Exited on its own, whatever the exit code.
    Completed,
    /// Ended by a signal, including cancellation.
    Terminated,
    /// Could not be launched or waited on.
    Failed,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Running)
    }
}

/// How a child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "lowercase")]
pub enum ExitKind {
    Exited(i32),
    Signaled,
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub exit: ExitKind,
    pub stdout: String,
    pub stderr: String,
}

impl SessionOutcome {
    /// Stdout followed by stderr, trimmed.
    pub fn merged_output(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stderr.is_empty() && !self.stdout.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text.trim().to_string()
    }
}

/// A program and its arguments, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// `PATH` for the child; inherited when unset.
    pub path_env: Option<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            path_env: None,
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_env(mut self, path: OsString) -> Self {
        self.path_env = Some(path);
        self
    }
}

/// How a session talks to its caller.
#[derive(Debug)]
pub enum SessionIo {
    /// Stdin is closed; output is collected until exit.
    Batch,
    /// Output is streamed and input is requested when the program goes quiet.
    Interactive {
        io: InteractiveIo,
        poll_interval: Duration,
    },
}

/// Awaits one session's outcome.
#[derive(Debug)]
pub struct SessionHandle {
    id: u64,
    program: String,
    outcome: oneshot::Receiver<std::io::Result<SessionOutcome>>,
}

impl SessionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the child to be reaped and its pipes drained.
    pub async fn wait(self) -> Result<SessionOutcome, RunError> {
        match self.outcome.await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(source)) => Err(RunError::Launch {
                program: self.program,
                source,
            }),
            // The supervisor is gone without reporting, so the runtime is shutting down.
            Err(_) => Err(RunError::Stopped),
        }
    }
}

/// Time the pipes get to close after a cancelled child has been reaped.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// A state change of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    pub session: u64,
    pub state: SessionState,
}

struct Active {
    id: u64,
    cancel: Option<oneshot::Sender<()>>,
    finished: watch::Receiver<bool>,
}

struct Slot {
    next_id: u64,
    state: SessionState,
    /// Session the state belongs to.
    current: u64,
    active: Option<Active>,
    events: broadcast::Sender<SessionEvent>,
}

impl Slot {
    fn new(events: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            next_id: 1,
            state: SessionState::Idle,
            current: 0,
            active: None,
            events,
        }
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        // Nobody may be listening.
        let _ = self.events.send(SessionEvent {
            session: self.current,
            state,
        });
    }
}

/// A cancel that arrived while no child was running.
#[derive(Default)]
struct Pending {
    /// Live [`CancelScope`]s.
    scopes: usize,
    cancelled: bool,
}

/// Owns the one active child process.
#[derive(Clone)]
pub struct SessionManager {
    slot: Arc<Mutex<Slot>>,
    /// Serializes `start` so two callers cannot both launch.
    starting: Arc<Mutex<()>>,
    pending: Arc<StdMutex<Pending>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionManager {
    fn default() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            slot: Arc::new(Mutex::new(Slot::new(events.clone()))),
            starting: Arc::new(Mutex::new(())),
            pending: Arc::default(),
            events,
        }
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every state change from now on, in the order the manager made them.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Group several sessions into one cancellable unit of work.
    ///
    /// While the scope lives, a cancel that finds no running child is kept
    /// and stops the next session before it runs. Dropping the last scope
    /// forgets it.
    pub fn scope(&self) -> CancelScope {
        self.pending().scopes += 1;
        CancelScope {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Launch `spec`, first stopping and reaping any active session.
    pub async fn start(&self, spec: CommandSpec, io: SessionIo) -> Result<SessionHandle, RunError> {
        let _gate = self.starting.lock().await;
        self.stop_active().await;

        let id = {
            let mut slot = self.slot.lock().await;
            if self.take_cancelled() {
                debug!(program = %spec.program, "cancelled before launch");
                return Err(RunError::Stopped);
            }
            let id = slot.next_id;
            slot.next_id += 1;
            slot.current = id;
            slot.set_state(SessionState::Starting);
            id
        };
        debug!(session = id, program = %spec.program, "starting");

        let interactive = matches!(io, SessionIo::Interactive { .. });
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(if interactive { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a cancel also reaches whatever the program spawns.
        #[cfg(unix)]
        {
            command.process_group(0);
        }
        if let Some(path) = &spec.path_env {
            command.env("PATH", path);
        }
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                warn!(session = id, program = %spec.program, error = %source, "launch failed");
                self.take_cancelled();
                self.finish(id, SessionState::Failed).await;
                return Err(RunError::Launch {
                    program: spec.program,
                    source,
                });
            }
        };

        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let (finished_tx, finished_rx) = watch::channel(false);
        let (exited_tx, exited_rx) = watch::channel(false);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        {
            let mut slot = self.slot.lock().await;
            let cancel = if self.take_cancelled() {
                debug!(session = id, "cancelled while starting");
                let _ = cancel_tx.send(());
                None
            } else {
                Some(cancel_tx)
            };
            slot.active = Some(Active {
                id,
                cancel,
                finished: finished_rx,
            });
            if slot.current == id {
                slot.set_state(SessionState::Running);
            }
        }
        info!(session = id, program = %spec.program, "running");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (forward_tx, bridge_task) = match io {
            SessionIo::Batch => (None, None),
            SessionIo::Interactive { io, poll_interval } => {
                let (tx, rx) = mpsc::unbounded_channel();
                let task = tokio::spawn(bridge::run(io, stdin, rx, exited_rx, poll_interval));
                (Some(tx), Some(task))
            }
        };
        let stdout_task = stdout.map(|pipe| tokio::spawn(drain(pipe, forward_tx)));
        let stderr_task = stderr.map(|pipe| tokio::spawn(drain(pipe, None)));

        let manager = self.clone();
        tokio::spawn(async move {
            let (status, cancelled) = tokio::select! {
                status = child.wait() => (status, false),
                _ = &mut cancel_rx => {
                    debug!(session = id, "cancelling");
                    kill_group(&mut child);
                    (child.wait().await, true)
                }
            };
            let _ = exited_tx.send(true);

            // Something outside the group can still hold a pipe after a cancel.
            let deadline = cancelled.then(|| Instant::now() + DRAIN_GRACE);
            let stdout = join_drain(stdout_task, deadline).await;
            let stderr = join_drain(stderr_task, deadline).await;
            if let Some(task) = bridge_task {
                let _ = task.await;
            }

            let (state, result) = match status {
                Ok(status) => {
                    let exit = match status.code() {
                        Some(code) if !cancelled => ExitKind::Exited(code),
                        _ => ExitKind::Signaled,
                    };
                    let state = match exit {
                        ExitKind::Exited(_) => SessionState::Completed,
                        ExitKind::Signaled => SessionState::Terminated,
                    };
                    info!(session = id, ?exit, "finished");
                    (state, Ok(SessionOutcome { exit, stdout, stderr }))
                }
                Err(e) => {
                    warn!(session = id, error = %e, "wait failed");
                    (SessionState::Failed, Err(e))
                }
            };
            manager.finish(id, state).await;
            // The caller may have dropped its handle.
            let _ = outcome_tx.send(result);
            let _ = finished_tx.send(true);
        });

        Ok(SessionHandle {
            id,
            program: spec.program,
            outcome: outcome_rx,
        })
    }

    /// Signal the active session to stop.
    ///
    /// With no child running this does nothing, unless a session is being
    /// launched or a [`CancelScope`] is open; then the next launch is stopped.
    pub async fn cancel(&self) {
        let mut slot = self.slot.lock().await;
        let mut pending = self.pending();
        let between = slot.active.is_none() && slot.state == SessionState::Starting;
        if let Some(cancel) = slot.active.as_mut().and_then(|a| a.cancel.take()) {
            debug!(session = slot.current, "cancel requested");
            let _ = cancel.send(());
        } else if between || pending.scopes > 0 {
            debug!("cancel requested with no child running, holding it");
        }
        if between || pending.scopes > 0 {
            pending.cancelled = true;
        }
    }

    pub async fn status(&self) -> SessionState {
        self.slot.lock().await.state
    }

    /// Cancel the active session and wait until it has been reaped.
    async fn stop_active(&self) {
        let finished = {
            let mut slot = self.slot.lock().await;
            match slot.active.as_mut() {
                Some(active) => {
                    if let Some(cancel) = active.cancel.take() {
                        let _ = cancel.send(());
                    }
                    Some(active.finished.clone())
                }
                None => None,
            }
        };
        if let Some(mut finished) = finished {
            debug!("waiting for previous session to stop");
            let _ = finished.wait_for(|done| *done).await;
        }
    }

    /// Record the final state of session `id`, unless a newer one has taken over.
    async fn finish(&self, id: u64, state: SessionState) {
        let mut slot = self.slot.lock().await;
        if slot.active.as_ref().is_some_and(|a| a.id == id) {
            slot.active = None;
        }
        if slot.current == id {
            slot.set_state(state);
        }
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a held cancel applies to the launch in progress. Outside a
    /// scope it is used up here.
    fn take_cancelled(&self) -> bool {
        let mut pending = self.pending();
        let cancelled = pending.cancelled;
        if pending.scopes == 0 {
            pending.cancelled = false;
        }
        cancelled
    }
}

/// Keeps a cancel alive across the sessions of one unit of work.
///
/// See [`SessionManager::scope`].
#[must_use = "the scope ends when dropped"]
pub struct CancelScope {
    pending: Arc<StdMutex<Pending>>,
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.scopes = pending.scopes.saturating_sub(1);
        if pending.scopes == 0 {
            pending.cancelled = false;
        }
    }
}

/// Kill the child and, on unix, the rest of its process group.
fn kill_group(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) {
            // SAFETY: kill(2) only sends a signal. The child is not reaped yet, so
            // its pid still names the group it leads and cannot have been reused.
            if unsafe { libc::kill(-pid, libc::SIGKILL) } == 0 {
                return;
            }
            debug!(pid, error = %std::io::Error::last_os_error(), "group kill failed");
        }
    }
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "kill failed, child already gone");
    }
}

async fn join_drain(
    task: Option<tokio::task::JoinHandle<Vec<u8>>>,
    deadline: Option<Instant>,
) -> String {
    let Some(mut task) = task else {
        return String::new();
    };
    let joined = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("pipe still open after cancel, abandoning its output");
                task.abort();
                return String::new();
            }
        },
        None => task.await,
    };
    match joined {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(error = %e, "pipe reader failed");
            String::new()
        }
    }
}
