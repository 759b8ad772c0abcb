//! Draining a child's output pipe.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

const CHUNK: usize = 8 * 1024;

/// Read `pipe` to end of file.
///
/// Every chunk is optionally forwarded as text while it arrives. Multi-byte
/// characters split across reads are held back until complete. Read errors end
/// the drain early with whatever was collected.
pub(crate) async fn drain<R>(mut pipe: R, forward: Option<mpsc::UnboundedSender<String>>) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let mut pending = Vec::new();
    let mut buf = vec![0u8; CHUNK];
    loop {
        let n = match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "pipe read failed");
                break;
            }
        };
        collected.extend_from_slice(&buf[..n]);
        if let Some(tx) = &forward {
            pending.extend_from_slice(&buf[..n]);
            let text = take_complete(&mut pending);
            if !text.is_empty() {
                // A closed receiver only means nobody is watching any more.
                let _ = tx.send(text);
            }
        }
    }
    if let Some(tx) = &forward
        && !pending.is_empty()
    {
        let _ = tx.send(String::from_utf8_lossy(&pending).into_owned());
    }
    collected
}

/// Decode the longest complete prefix of `bytes`, leaving an unfinished character behind.
fn take_complete(bytes: &mut Vec<u8>) -> String {
    let keep_from = match std::str::from_utf8(bytes) {
        Ok(_) => bytes.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => bytes.len(),
    };
    let rest = bytes.split_off(keep_from);
    let text = String::from_utf8_lossy(bytes).into_owned();
    *bytes = rest;
    text
}
