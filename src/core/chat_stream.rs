//! Streaming consumption of chat replies.
//!
//! One outbound request per user turn. The reply body is pulled chunk by
//! chunk, decoded as UTF-8, and concatenated in arrival order. The body has
//! no framing, so the full concatenation is the assistant's reply.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::message::Message;
use crate::core::session::{PendingTurn, Session};

/// Raw body chunks of one reply, in arrival order.
pub type ReplyStream = BoxStream<'static, Result<Vec<u8>, TurnError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The request could not be sent or no response headers arrived.
    Request(String),
    /// The endpoint answered with a non-success status.
    Status { status: u16 },
    /// Reading the response body failed part way through.
    Read(String),
    /// No progress within the configured idle timeout.
    Timeout(Duration),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Request(reason) => write!(f, "request failed: {reason}"),
            TurnError::Status { status } => write!(f, "endpoint returned status {status}"),
            TurnError::Read(reason) => write!(f, "reading reply failed: {reason}"),
            TurnError::Timeout(limit) => {
                write!(f, "no data from endpoint within {}s", limit.as_secs_f32())
            }
        }
    }
}

impl std::error::Error for TurnError {}

/// The outbound half of a turn: ship the conversation, get a body stream.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open(&self, messages: &[Message]) -> Result<ReplyStream, TurnError>;
}

/// Posts the conversation as a JSON array to a fixed endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open(&self, messages: &[Message]) -> Result<ReplyStream, TurnError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(messages)
            .send()
            .await
            .map_err(|e| TurnError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(
                status = status.as_u16(),
                body = %body.trim(),
                "chat endpoint returned an error status"
            );
            return Err(TurnError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| TurnError::Read(e.to_string()))
            })
            .boxed())
    }
}

/// Incremental UTF-8 decoder that keeps a split multi-byte sequence until
/// its remaining bytes arrive. Invalid bytes decode to U+FFFD.
#[derive(Debug, Default)]
pub struct ReplyDecoder {
    text: String,
    pending: Vec<u8>,
}

impl ReplyDecoder {
    /// Feed one chunk and return the text it completed.
    pub fn push(&mut self, bytes: &[u8]) -> &str {
        let start = self.text.len();
        self.pending.extend_from_slice(bytes);

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    self.text
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match err.error_len() {
                        Some(len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + len);
                        }
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }

        &self.text[start..]
    }

    /// Flush a dangling partial sequence at end of stream.
    pub fn finish(&mut self) -> &str {
        let start = self.text.len();
        if !self.pending.is_empty() {
            self.text.push_str(&String::from_utf8_lossy(&self.pending));
            self.pending.clear();
        }
        &self.text[start..]
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, TurnError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TurnError::Timeout(limit)),
        None => Ok(fut.await),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    /// Newly decoded text, for live preview only.
    Chunk(String),
    Error(TurnError),
    /// The stream completed; carries the full reply.
    End(String),
}

/// Result of [`ChatStreamService::send_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Blank input or a turn already in flight; nothing changed.
    Rejected,
    Completed,
    Failed,
}

#[derive(Clone)]
pub struct ChatStreamService {
    transport: Arc<dyn ChatTransport>,
    idle_timeout: Option<Duration>,
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        idle_timeout: Option<Duration>,
    ) -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                transport,
                idle_timeout,
                tx,
            },
            rx,
        )
    }

    /// Send `messages` and pull the reply to completion.
    ///
    /// `on_chunk` sees each decoded piece in arrival order; the returned
    /// string is their concatenation. The idle timeout bounds the wait for
    /// the response headers and for every chunk.
    pub async fn stream_reply<F>(
        &self,
        messages: &[Message],
        mut on_chunk: F,
    ) -> Result<String, TurnError>
    where
        F: FnMut(&str) + Send,
    {
        let mut stream = within(self.idle_timeout, self.transport.open(messages)).await??;
        let mut decoder = ReplyDecoder::default();

        while let Some(chunk) = within(self.idle_timeout, stream.next()).await? {
            let chunk = chunk?;
            let text = decoder.push(&chunk);
            if !text.is_empty() {
                on_chunk(text);
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            on_chunk(tail);
        }

        debug!(bytes = decoder.text().len(), "reply stream completed");
        Ok(decoder.into_text())
    }

    /// Run a whole turn against `session` and wait for it to resolve.
    pub async fn send_turn<F>(&self, session: &mut Session, text: &str, on_chunk: F) -> TurnStatus
    where
        F: FnMut(&str) + Send,
    {
        let Some(turn) = session.begin_turn(text) else {
            return TurnStatus::Rejected;
        };

        let outcome = self.stream_reply(&turn.payload, on_chunk).await;
        let status = match &outcome {
            Ok(_) => TurnStatus::Completed,
            Err(err) => {
                warn!(turn_id = turn.id, error = %err, "chat turn failed");
                TurnStatus::Failed
            }
        };
        session.finish_turn(turn.id, outcome);
        status
    }

    /// Run a turn in the background, reporting through the service channel.
    pub fn spawn_turn(&self, turn: PendingTurn) {
        let service = self.clone();
        tokio::spawn(async move {
            let PendingTurn { id, payload } = turn;
            let chunk_tx = service.tx.clone();

            let outcome = service
                .stream_reply(&payload, |text| {
                    let _ = chunk_tx.send((StreamMessage::Chunk(text.to_string()), id));
                })
                .await;

            let message = match outcome {
                Ok(reply) => StreamMessage::End(reply),
                Err(err) => {
                    warn!(turn_id = id, error = %err, "chat turn failed");
                    StreamMessage::Error(err)
                }
            };
            let _ = service.tx.send((message, id));
        });
    }
}
