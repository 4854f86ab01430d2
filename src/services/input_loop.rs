// src/services/input_loop.rs
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::services::chat_client::ChatClient;
use crate::services::renderer::RenderSink;

pub const QUIT_COMMAND: &str = "/quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    EndOfInput,
    ReadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub exit: LoopExit,
    /// Lines handed to `submit`, blank ones included.
    pub submitted: usize,
    /// Lines dropped because they were not valid UTF-8.
    pub skipped: usize,
}

/// Feed each input line to the client as its own task until `/quit`, end of
/// input or a read failure, then wait for every in-flight submission.
pub async fn run<R, S>(mut reader: R, client: Arc<ChatClient<S>>) -> LoopSummary
where
    R: AsyncBufRead + Unpin,
    S: RenderSink + ?Sized + 'static,
{
    let mut in_flight = JoinSet::new();
    let mut buf = Vec::new();
    let mut submitted = 0;
    let mut skipped = 0;

    let exit = loop {
        tokio::select! {
            // read_until keeps partial bytes in `buf` if the other branch wins
            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) if buf.is_empty() => break LoopExit::EndOfInput,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "failed to read input; stopping");
                        break LoopExit::ReadFailed;
                    }
                }
                let raw = std::mem::take(&mut buf);
                let line = match String::from_utf8(raw) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "skipping input line that is not valid UTF-8");
                        skipped += 1;
                        continue;
                    }
                };
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if line.trim() == QUIT_COMMAND {
                    break LoopExit::Quit;
                }
                submitted += 1;
                // earlier submissions keep running; nothing is cancelled
                let client = client.clone();
                in_flight.spawn(async move { client.submit(&line).await });
            }
            Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = done {
                    warn!(error = %e, "submission task failed");
                }
            }
        }
    };

    debug!(?exit, pending = in_flight.len(), "input closed; draining submissions");
    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            warn!(error = %e, "submission task failed");
        }
    }

    LoopSummary { exit, submitted, skipped }
}
