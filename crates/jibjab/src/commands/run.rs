//! Run command - build and run a target source file.

use clap::Args;
use jibjab::{
    Config, Document, ExecutionRequest, RunMode, RunOutput, TargetId, Workbench, WorkbenchError,
};
use jibjab_toolchain::{InputRequest, InteractiveIo};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Exit code after the run was stopped by Ctrl-C.
const STOPPED_EXIT: i32 = 130;

#[derive(Args)]
pub struct RunArgs {
    /// Source file, or `-` for stdin
    pub file: PathBuf,

    /// Source language (inferred from the file extension if omitted)
    #[arg(short, long)]
    pub target: Option<TargetId>,

    /// Stream output and answer the program's input prompts from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// After a clean run, write the decompiled canonical text to this file
    #[arg(long, value_name = "FILE")]
    pub sync: Option<PathBuf>,
}

pub async fn cmd_run(args: &RunArgs, config: &Config, json: bool) -> i32 {
    if args.interactive && args.file == Path::new("-") {
        eprintln!("error: --interactive reads answers from stdin; pass a source file");
        return 1;
    }
    let (target, source) = match super::read_source(&args.file, args.target) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("error: {e:#}");
            return 1;
        }
    };

    let workbench = Workbench::from_config(config);
    let interrupt = {
        let workbench = workbench.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupted, stopping run");
                workbench.cancel().await;
            }
        })
    };

    let (mode, relay_task) = if args.interactive {
        let (io, output, input) = InteractiveIo::channel();
        (RunMode::Interactive(io), Some(tokio::spawn(relay(output, input))))
    } else {
        (RunMode::Batch, None)
    };

    let result = match &args.sync {
        Some(path) => run_and_sync(&workbench, target, source, mode, path).await,
        None => workbench
            .runner()
            .run(ExecutionRequest {
                target,
                source,
                mode,
            })
            .await
            .map_err(WorkbenchError::from),
    };
    if let Some(relay_task) = relay_task {
        let _ = relay_task.await;
    }
    interrupt.abort();

    match result {
        Ok(output) => {
            report(&output, args.interactive, json);
            output.exit_code
        }
        Err(WorkbenchError::Run(e)) if e.is_stopped() => {
            println!("Stopped");
            STOPPED_EXIT
        }
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

/// Run `source` as a hand edit of `target` and write the canonical text it
/// reads back to `path`. An existing file seeds the canonical text.
async fn run_and_sync(
    workbench: &Workbench,
    target: TargetId,
    source: String,
    mode: RunMode,
    path: &Path,
) -> Result<RunOutput, WorkbenchError> {
    let mut document = Document::new(std::fs::read_to_string(path).unwrap_or_default());
    document.edit(target, source);
    let output = workbench.run_document(&mut document, target, mode).await?;
    if output.exit_code != 0 {
        return Ok(output);
    }
    if document.is_edited(target) {
        warn!(path = %path.display(), "nothing produced, left unchanged");
    } else if let Err(e) = std::fs::write(path, document.canonical()) {
        warn!(path = %path.display(), error = %e, "failed to write canonical text");
    } else {
        info!(path = %path.display(), "wrote canonical text");
    }
    Ok(output)
}

fn report(output: &RunOutput, streamed: bool, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(output).unwrap_or_default());
    } else if !streamed && !output.output.is_empty() {
        println!("{}", output.output);
    }
}

/// Echo program output and answer input requests with lines from stdin.
async fn relay(
    mut output: mpsc::UnboundedReceiver<String>,
    mut input: mpsc::Receiver<InputRequest>,
) {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut output_open = true;
    let mut input_open = true;

    while output_open || input_open {
        tokio::select! {
            chunk = output.recv(), if output_open => match chunk {
                Some(chunk) => {
                    let _ = stdout.write_all(chunk.as_bytes()).await;
                    let _ = stdout.flush().await;
                }
                None => output_open = false,
            },
            request = input.recv(), if input_open => match request {
                Some(mut request) => {
                    let line = tokio::select! {
                        line = stdin.next_line() => line.ok().flatten(),
                        _ = request.closed() => continue,
                    };
                    request.respond(line);
                }
                None => input_open = false,
            },
        }
    }
}
