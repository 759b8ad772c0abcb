//! Relaying a live program's output and feeding it input on demand.
//!
//! A program is assumed to wait for input when it is still running and has
//! printed nothing for one poll interval. A program that is merely slow gets
//! asked anyway; callers may answer `None` to close its stdin.

use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::ChildStdin;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

/// Caller side of an interactive session.
#[derive(Debug, Clone)]
pub struct InteractiveIo {
    /// Program output as it arrives.
    pub output: mpsc::UnboundedSender<String>,
    /// Requests for a line of input.
    pub input: mpsc::Sender<InputRequest>,
}

impl InteractiveIo {
    /// A bridge endpoint plus the receivers the caller listens on.
    pub fn channel() -> (
        Self,
        mpsc::UnboundedReceiver<String>,
        mpsc::Receiver<InputRequest>,
    ) {
        let (output, output_rx) = mpsc::unbounded_channel();
        let (input, input_rx) = mpsc::channel(1);
        (Self { output, input }, output_rx, input_rx)
    }
}

/// One request for input. Answering consumes it, so it resolves at most once.
#[derive(Debug)]
pub struct InputRequest {
    /// Last line of output printed since the previous request.
    pub prompt: String,
    reply: oneshot::Sender<Option<String>>,
}

impl InputRequest {
    /// Answer with a line, or `None` to close the program's stdin.
    pub fn respond(self, line: Option<String>) {
        // The session may have ended while the caller was typing.
        let _ = self.reply.send(line);
    }

    /// Resolves once the session no longer wants an answer.
    pub async fn closed(&mut self) {
        self.reply.closed().await;
    }
}

/// Forward output, and ask for input whenever the program goes quiet.
///
/// `exited` turns true once the child has been reaped. From then on no more
/// input is requested and any outstanding request is dropped, which releases
/// the caller waiting on it. Output is forwarded until the pipe closes.
pub(crate) async fn run(
    io: InteractiveIo,
    mut stdin: Option<ChildStdin>,
    mut output: mpsc::UnboundedReceiver<String>,
    mut exited: watch::Receiver<bool>,
    poll: Duration,
) {
    let mut since_prompt = String::new();
    let mut alive = true;
    loop {
        tokio::select! {
            chunk = output.recv() => match chunk {
                Some(text) => {
                    since_prompt.push_str(&text);
                    let _ = io.output.send(text);
                }
                None => break,
            },
            _ = reaped(&mut exited), if alive => {
                alive = false;
                stdin = None;
            }
            _ = tokio::time::sleep(poll), if alive && stdin.is_some() => {
                let prompt = last_line(&since_prompt).to_string();
                since_prompt.clear();
                let (reply, answer) = oneshot::channel();
                let sent = tokio::select! {
                    sent = io.input.send(InputRequest { prompt, reply }) => sent.is_ok(),
                    _ = reaped(&mut exited) => {
                        alive = false;
                        stdin = None;
                        continue;
                    }
                };
                if !sent {
                    debug!("input requests are no longer read, closing stdin");
                    stdin = None;
                    continue;
                }
                let line = tokio::select! {
                    line = answer => line.ok().flatten(),
                    _ = reaped(&mut exited) => {
                        alive = false;
                        stdin = None;
                        continue;
                    }
                };
                match (line, stdin.as_mut()) {
                    (Some(line), Some(pipe)) => {
                        let written = async {
                            pipe.write_all(line.as_bytes()).await?;
                            pipe.write_all(b"\n").await?;
                            pipe.flush().await
                        };
                        if let Err(e) = written.await {
                            debug!(error = %e, "stdin closed by program");
                            stdin = None;
                        }
                    }
                    _ => {
                        debug!("no input supplied, closing stdin");
                        stdin = None;
                    }
                }
            }
        }
    }
}

/// Resolves once the child has been reaped, or the session is gone.
async fn reaped(exited: &mut watch::Receiver<bool>) {
    let _ = exited.wait_for(|done| *done).await;
}

fn last_line(text: &str) -> &str {
    text.trim_end_matches('\n')
        .rsplit('\n')
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_last_printed_line() {
        assert_eq!(last_line("Welcome\nName? "), "Name? ");
        assert_eq!(last_line("Age:\n"), "Age:");
        assert_eq!(last_line(""), "");
    }

    #[tokio::test]
    async fn dropping_a_request_releases_the_waiter() {
        let (reply, answer) = oneshot::channel();
        let mut request = InputRequest {
            prompt: String::new(),
            reply,
        };
        drop(answer);
        request.closed().await;
        request.respond(Some("late".into()));
    }
}
