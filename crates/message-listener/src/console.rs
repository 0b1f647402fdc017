//! Line-based console transport.
//!
//! A line starting with `@user_id ` is sent as that user. Any other line is
//! taken whole as text from [`CONSOLE_USER`], so phrases like `Цель: 75`
//! keep their colon.

use async_trait::async_trait;
use brain_core::InboundMessage;
use chrono::Utc;
use futures::stream::{self, Stream};
use orchestrator::{MessageSender, OrchestratorError};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::Mutex;
use tracing::warn;

/// Sender id for lines without a user prefix.
pub const CONSOLE_USER: &str = "console";

/// Parse one console line. Blank lines yield `None`.
pub fn parse_console_line(line: &str) -> Option<InboundMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let timestamp = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();

    if let Some((user, text)) = line
        .strip_prefix('@')
        .and_then(|rest| rest.split_once(char::is_whitespace))
    {
        let text = text.trim();
        if !user.is_empty() && !text.is_empty() {
            return Some(InboundMessage::direct(user, text, timestamp));
        }
    }

    Some(InboundMessage::direct(CONSOLE_USER, line, timestamp))
}

/// Messages read line by line from `reader` until EOF.
pub fn line_messages<R>(reader: R) -> impl Stream<Item = InboundMessage> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(message) = parse_console_line(&line) {
                        return Some((message, lines));
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    return None;
                }
            }
        }
    })
}

/// Messages typed on standard input.
pub fn stdin_messages() -> impl Stream<Item = InboundMessage> + Send {
    line_messages(BufReader::new(io::stdin()))
}

/// Writes replies as `[recipient] text` lines.
pub struct ConsoleSender<W> {
    out: Mutex<W>,
}

impl ConsoleSender<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> ConsoleSender<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> MessageSender for ConsoleSender<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), OrchestratorError> {
        let mut out = self.out.lock().await;
        let line = format!("[{}] {}\n", recipient, text);

        out.write_all(line.as_bytes())
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}
