//! Consumer for the chat streaming endpoint.
//!
//! The response body is raw assistant text with no framing except an
//! optional `conversation_id:<digits>\n` prefix that the server writes
//! when it creates a new conversation. The consumer decodes the body
//! incrementally, strips that prefix and renders the cumulative text
//! after every chunk.

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::decoder::Utf8Decoder;
use super::error::{DecodeError, StreamError};
use super::header::parse_header;

/// Appended to the response text when the user stops a turn.
pub const STOPPED_SUFFIX: &str = " [Stopped]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The server bound this turn to a new conversation
    ConversationId(i64),
    /// Text appended to the response
    Text(String),
}

/// Receives the results of a stream as they happen.
pub trait StreamSink {
    fn conversation_acquired(&mut self, conversation_id: i64);

    /// Called with the full response text so far, after every chunk.
    fn render(&mut self, text: &str);
}

#[derive(Debug)]
pub enum StreamOutcome {
    Completed {
        text: String,
        conversation_id: Option<i64>,
    },
    Stopped {
        text: String,
        conversation_id: Option<i64>,
    },
    Failed {
        partial: String,
        conversation_id: Option<i64>,
        error: StreamError,
    },
}

impl StreamOutcome {
    /// Conversation id acquired from the stream header, if any.
    pub fn conversation_id(&self) -> Option<i64> {
        match self {
            StreamOutcome::Completed {
                conversation_id, ..
            }
            | StreamOutcome::Stopped {
                conversation_id, ..
            }
            | StreamOutcome::Failed {
                conversation_id, ..
            } => *conversation_id,
        }
    }
}

/// State for one in-flight response. Created per turn and consumed by
/// [`StreamSession::consume`].
#[derive(Debug)]
pub struct StreamSession {
    cancel: CancellationToken,
    decoder: Utf8Decoder,
    response: String,
    header_window: bool,
    conversation_id: Option<i64>,
    chunks: usize,
}

impl StreamSession {
    pub fn new(conversation_known: bool) -> Self {
        Self::with_cancel(conversation_known, CancellationToken::new())
    }

    pub fn with_cancel(conversation_known: bool, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            decoder: Utf8Decoder::new(),
            response: String::new(),
            header_window: !conversation_known,
            conversation_id: None,
            chunks: 0,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn conversation_id(&self) -> Option<i64> {
        self.conversation_id
    }

    /// Feed the next raw chunk and return what changed.
    ///
    /// The header is only looked for in the first chunk that decodes to
    /// non-empty text, and only when no conversation is known yet.
    ///
    /// When the chunk holds invalid UTF-8, the text before the bad bytes
    /// is still added to the response before the error is returned.
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>, DecodeError> {
        let mut text = String::new();
        let decoded = self.decoder.decode(bytes, &mut text);
        let events = self.accept(text);
        decoded.map(|_| events)
    }

    fn accept(&mut self, mut text: String) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if text.is_empty() {
            return events;
        }
        self.chunks += 1;

        if self.header_window {
            self.header_window = false;
            if let Some(header) = parse_header(&text) {
                tracing::debug!("Started new conversation: {}", header.conversation_id);
                self.conversation_id = Some(header.conversation_id);
                events.push(StreamEvent::ConversationId(header.conversation_id));
                text.drain(..header.len);
            }
        }

        if !text.is_empty() {
            self.response.push_str(&text);
            events.push(StreamEvent::Text(text));
        }

        events
    }

    /// Read `stream` to the end, rendering into `sink` after every
    /// chunk. Cancellation is observed whenever the loop waits for the
    /// next chunk.
    pub async fn consume<S, B, E, K>(mut self, stream: S, sink: &mut K) -> StreamOutcome
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        K: StreamSink + ?Sized,
    {
        let cancel = self.cancel.clone();
        let mut stream = std::pin::pin!(stream);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.stop(sink),
                next = stream.next() => next,
            };

            match next {
                None => break,
                Some(Err(e)) => return self.fail(StreamError::Read(e.into())),
                Some(Ok(chunk)) => match self.ingest(chunk.as_ref()) {
                    Ok(events) => self.dispatch(events, sink),
                    Err(e) => return self.fail(e.into()),
                },
            }
        }

        if let Err(e) = std::mem::take(&mut self.decoder).finish() {
            return self.fail(e.into());
        }

        tracing::debug!(
            "Stream complete after {} chunk(s), {} bytes of text",
            self.chunks,
            self.response.len()
        );
        StreamOutcome::Completed {
            text: self.response,
            conversation_id: self.conversation_id,
        }
    }

    fn dispatch<K: StreamSink + ?Sized>(&self, events: Vec<StreamEvent>, sink: &mut K) {
        for event in events {
            match event {
                StreamEvent::ConversationId(id) => sink.conversation_acquired(id),
                StreamEvent::Text(_) => sink.render(&self.response),
            }
        }
    }

    fn stop<K: StreamSink + ?Sized>(mut self, sink: &mut K) -> StreamOutcome {
        tracing::info!("Stream stopped by user after {} chunk(s)", self.chunks);
        self.response.push_str(STOPPED_SUFFIX);
        sink.render(&self.response);
        StreamOutcome::Stopped {
            text: self.response,
            conversation_id: self.conversation_id,
        }
    }

    fn fail(self, error: StreamError) -> StreamOutcome {
        tracing::error!("{}", error);
        StreamOutcome::Failed {
            partial: self.response,
            conversation_id: self.conversation_id,
            error,
        }
    }
}
