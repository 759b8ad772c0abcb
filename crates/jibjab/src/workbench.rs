//! Keeping canonical text and target sources in step.
//!
//! A [`Document`] is the canonical program plus the source of every target
//! it has been rendered into. Target sources start as forward translations
//! and may then be edited by hand. When an edited target runs cleanly, the
//! [`Workbench`] reads it back and the result becomes the new canonical text.

use crate::Config;
use jibjab_languages::TargetId;
use jibjab_reverse::Decompiled;
use jibjab_toolchain::{ExecutionRequest, RunError, RunMode, RunOutput, ToolchainRunner};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Renders canonical text into a target language.
///
/// The compiler that does this lives outside this workspace.
pub trait ForwardTranspiler {
    fn transpile(&self, canonical: &str, target: TargetId) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TargetSource {
    text: String,
    edited: bool,
}

/// Canonical text and the per-target sources derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    canonical: String,
    targets: BTreeMap<TargetId, TargetSource>,
}

impl Document {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            targets: BTreeMap::new(),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Replace the canonical text. Sources not edited by hand are discarded for reseeding.
    pub fn set_canonical(&mut self, text: impl Into<String>) {
        self.canonical = text.into();
        self.targets.retain(|_, source| source.edited);
    }

    pub fn source(&self, target: TargetId) -> Option<&str> {
        self.targets.get(&target).map(|s| s.text.as_str())
    }

    pub fn is_edited(&self, target: TargetId) -> bool {
        self.targets.get(&target).is_some_and(|s| s.edited)
    }

    /// Fill every target without an edited source from the canonical text.
    pub fn seed(&mut self, transpiler: &dyn ForwardTranspiler) {
        for target in TargetId::ALL {
            if self.is_edited(target) {
                continue;
            }
            match transpiler.transpile(&self.canonical, target) {
                Some(text) => {
                    self.targets.insert(target, TargetSource { text, edited: false });
                }
                None => {
                    debug!(%target, "no forward translation");
                    self.targets.remove(&target);
                }
            }
        }
    }

    /// Record a hand edit of `target`'s source.
    pub fn edit(&mut self, target: TargetId, text: impl Into<String>) {
        self.targets.insert(
            target,
            TargetSource {
                text: text.into(),
                edited: true,
            },
        );
    }

    /// Adopt a decompilation of `target` as the canonical text.
    ///
    /// Returns whether anything changed. `Nothing` keeps the current canonical
    /// text and leaves the edit pending.
    pub fn apply(&mut self, target: TargetId, decompiled: Decompiled) -> bool {
        let Some(text) = decompiled.into_text() else {
            return false;
        };
        self.canonical = text;
        self.targets
            .retain(|other, source| *other == target || source.edited);
        if let Some(source) = self.targets.get_mut(&target) {
            source.edited = false;
        }
        true
    }

    /// Decompile an edited target in place. Unedited targets are left alone.
    pub fn reconcile(&mut self, target: TargetId) -> bool {
        if !self.is_edited(target) {
            return false;
        }
        let decompiled = match self.source(target) {
            Some(source) => jibjab_reverse::decompile(target, source),
            None => return false,
        };
        self.apply(target, decompiled)
    }
}

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("no {0} source to run")]
    MissingSource(TargetId),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Runs and reads back target programs off the caller's task.
#[derive(Clone)]
pub struct Workbench {
    runner: ToolchainRunner,
}

impl Workbench {
    pub fn new(runner: ToolchainRunner) -> Self {
        Self { runner }
    }

    /// A workbench driven by `config`'s toolchain settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.runner())
    }

    pub fn runner(&self) -> &ToolchainRunner {
        &self.runner
    }

    /// Start a run on its own task.
    pub fn spawn_run(&self, request: ExecutionRequest) -> JoinHandle<Result<RunOutput, RunError>> {
        let runner = self.runner.clone();
        tokio::spawn(async move { runner.run(request).await })
    }

    /// Decompile on the blocking pool.
    pub async fn decompile(&self, target: TargetId, source: String) -> Decompiled {
        match tokio::task::spawn_blocking(move || jibjab_reverse::decompile(target, &source)).await {
            Ok(decompiled) => decompiled,
            Err(e) => {
                warn!(%target, error = %e, "decompile worker failed");
                Decompiled::Nothing
            }
        }
    }

    /// Run `target`'s source from `document`. After a clean exit an edited
    /// source is read back into the document's canonical text.
    pub async fn run_document(
        &self,
        document: &mut Document,
        target: TargetId,
        mode: RunMode,
    ) -> Result<RunOutput, WorkbenchError> {
        let source = document
            .source(target)
            .ok_or(WorkbenchError::MissingSource(target))?
            .to_string();
        let request = ExecutionRequest {
            target,
            source: source.clone(),
            mode,
        };
        let output = joined(self.spawn_run(request).await)?;

        if output.exit_code == 0 && document.is_edited(target) {
            let decompiled = self.decompile(target, source).await;
            if document.apply(target, decompiled) {
                info!(%target, "canonical text updated from edited source");
            } else {
                info!(%target, "nothing produced, canonical text kept");
            }
        }
        Ok(output)
    }

    pub async fn cancel(&self) {
        self.runner.cancel().await;
    }
}

/// Unwrap a finished run task. A panic in the task is re-raised here.
fn joined(
    result: Result<Result<RunOutput, RunError>, JoinError>,
) -> Result<RunOutput, WorkbenchError> {
    match result {
        Ok(result) => Ok(result?),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            warn!(error = %e, "run task was cancelled");
            Err(RunError::Stopped.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders canonical text verbatim, prefixed by the target id.
    struct Tagging;

    impl ForwardTranspiler for Tagging {
        fn transpile(&self, canonical: &str, target: TargetId) -> Option<String> {
            (target != TargetId::Asm).then(|| format!("{target}:{canonical}"))
        }
    }

    #[test]
    fn seed_fills_unedited_targets() {
        let mut doc = Document::new("~>frob{7a3}::emit(#1)\n");
        doc.edit(TargetId::Py, "print(2)\n");
        doc.seed(&Tagging);
        assert_eq!(doc.source(TargetId::Py), Some("print(2)\n"));
        assert!(doc.is_edited(TargetId::Py));
        assert_eq!(doc.source(TargetId::C), Some("c:~>frob{7a3}::emit(#1)\n"));
        assert_eq!(doc.source(TargetId::Asm), None);
    }

    #[test]
    fn reconcile_adopts_an_edited_target() {
        let mut doc = Document::new("~>frob{7a3}::emit(#1)\n");
        doc.seed(&Tagging);
        doc.edit(TargetId::Py, "print(2)\n");

        assert!(doc.reconcile(TargetId::Py));
        assert_eq!(doc.canonical(), "~>frob{7a3}::emit(#2)\n");
        assert!(!doc.is_edited(TargetId::Py));
        assert_eq!(doc.source(TargetId::Py), Some("print(2)\n"));
        // Stale translations are dropped so the next seed refreshes them.
        assert_eq!(doc.source(TargetId::C), None);
    }

    #[test]
    fn nothing_produced_keeps_canonical_text() {
        let mut doc = Document::new("~>frob{7a3}::emit(#1)\n");
        doc.edit(TargetId::Asm, ".global _main\n");
        assert!(!doc.reconcile(TargetId::Asm));
        assert_eq!(doc.canonical(), "~>frob{7a3}::emit(#1)\n");
        assert!(doc.is_edited(TargetId::Asm));
    }

    #[test]
    fn unedited_targets_are_not_reconciled() {
        let mut doc = Document::new("x");
        doc.seed(&Tagging);
        assert!(!doc.reconcile(TargetId::Js));
        assert_eq!(doc.canonical(), "x");
    }

    #[test]
    fn set_canonical_keeps_hand_edits() {
        let mut doc = Document::new("a");
        doc.seed(&Tagging);
        doc.edit(TargetId::Go, "func main() {}\n");
        doc.set_canonical("b");
        assert_eq!(doc.source(TargetId::Js), None);
        assert!(doc.is_edited(TargetId::Go));
    }

    #[tokio::test]
    #[should_panic(expected = "runner blew up")]
    async fn panicking_run_task_is_not_reported_as_stopped() {
        async fn exploding_run() -> Result<RunOutput, RunError> {
            panic!("runner blew up")
        }
        let _ = joined(tokio::spawn(exploding_run()).await);
    }

    #[tokio::test]
    async fn aborted_run_task_is_stopped() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(RunOutput {
                output: String::new(),
                exit_code: 0,
            })
        });
        task.abort();
        let err = joined(task.await).unwrap_err();
        assert!(matches!(err, WorkbenchError::Run(RunError::Stopped)), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_run_of_an_edited_target_updates_the_document() {
        use jibjab_toolchain::{InteractiveConfig, TargetTemplates, ToolchainConfig};

        let scratch = tempfile::TempDir::new().unwrap();
        let mut config = ToolchainConfig {
            scratch_dir: Some(scratch.path().to_path_buf()),
            ..ToolchainConfig::default()
        };
        config.targets.insert(
            TargetId::Py,
            TargetTemplates {
                compile: None,
                run: Some(vec!["/bin/sh".into(), "-c".into(), "echo ran".into()]),
            },
        );
        let workbench = Workbench::new(ToolchainRunner::new(config, InteractiveConfig::default()));

        let mut doc = Document::new("");
        doc.edit(TargetId::Py, "x = 4\nprint(x)\n");
        let out = workbench
            .run_document(&mut doc, TargetId::Py, RunMode::Batch)
            .await
            .unwrap();
        assert_eq!(out.output, "ran");
        assert_eq!(doc.canonical(), "~>snag{x}::val(#4)\n~>frob{7a3}::emit(x)\n");

        let missing = workbench
            .run_document(&mut doc, TargetId::C, RunMode::Batch)
            .await
            .unwrap_err();
        assert!(matches!(missing, WorkbenchError::MissingSource(TargetId::C)));
    }
}
