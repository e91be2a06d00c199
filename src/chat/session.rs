//! Drives chat turns end to end.
//!
//! A `ChatSession` owns the message history and the conversation id of
//! one chat surface. `send` takes `&mut self`, so a second turn cannot
//! start while the first one is still streaming. The only way to reach
//! an in-flight turn from elsewhere is the [`StopHandle`].

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use super::backend::ChatBackend;
use super::models::{ChatRequest, Message, Role};
use super::stream::{STOPPED_SUFFIX, StreamOutcome, StreamSession};
use super::view::{ChatView, ViewSink};
use crate::settings::GenerationSettings;

/// Input for a single turn.
#[derive(Clone, Debug)]
pub struct Turn {
    pub agent: Option<String>,
    pub message: String,
    pub mode: Option<String>,
    pub settings: GenerationSettings,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    EmptyMessage,
    NoAgent,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Validation failed, nothing changed
    Rejected(Rejection),
    Completed { text: String },
    Stopped { text: String },
    Failed { error: String },
}

/// Cancels the turn that is currently streaming, if any.
#[derive(Clone, Default, Debug)]
pub struct StopHandle(Arc<Mutex<Option<CancellationToken>>>);

impl StopHandle {
    /// Returns false when no turn was active.
    pub fn stop(&self) -> bool {
        let active = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn arm(&self, token: CancellationToken) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn release(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Restores the view and releases the stop handle when a turn ends,
/// including when the turn future is dropped before it finishes.
struct TurnGuard<'a, V: ChatView + ?Sized> {
    view: &'a mut V,
    stop: StopHandle,
}

impl<V: ChatView + ?Sized> Drop for TurnGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_sending_enabled(true);
        self.view.set_stop_visible(false);
        self.stop.release();
        self.view.focus_input();
    }
}

fn error_markdown(partial: &str, error: &str) -> String {
    let block = format!("**Error:**\n\nSorry, an error occurred: {}", error);
    if partial.is_empty() {
        block
    } else {
        format!("{}\n\n{}", partial, block)
    }
}

pub struct ChatSession<B> {
    backend: B,
    history: Vec<Message>,
    conversation_id: Option<i64>,
    stop: StopHandle,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            history: Vec::new(),
            conversation_id: None,
            stop: StopHandle::default(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn conversation_id(&self) -> Option<i64> {
        self.conversation_id
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one turn: send the message, stream the reply into `view` and
    /// record the result in the history.
    ///
    /// Whatever the outcome, sending is enabled again when this returns,
    /// or when the returned future is dropped mid-turn.
    pub async fn send<V: ChatView + ?Sized>(&mut self, turn: Turn, view: &mut V) -> TurnOutcome {
        let text = turn.message.trim();
        if text.is_empty() {
            return TurnOutcome::Rejected(Rejection::EmptyMessage);
        }
        let Some(agent) = turn.agent.as_deref().filter(|a| !a.trim().is_empty()) else {
            return TurnOutcome::Rejected(Rejection::NoAgent);
        };

        let user_msg = Message::user(text);
        view.render_message(Role::User, text);
        self.history.push(user_msg.clone());
        view.set_sending_enabled(false);
        view.set_stop_visible(true);
        view.show_pending();

        let cancel = CancellationToken::new();
        self.stop.arm(cancel.clone());

        let mut guard = TurnGuard {
            view,
            stop: self.stop.clone(),
        };
        self.run_turn(agent, user_msg, &turn, cancel, &mut *guard.view)
            .await
    }

    async fn run_turn<V: ChatView + ?Sized>(
        &mut self,
        agent: &str,
        user_msg: Message,
        turn: &Turn,
        cancel: CancellationToken,
        view: &mut V,
    ) -> TurnOutcome {
        let request = ChatRequest {
            agent: agent.to_string(),
            messages: self.context_messages(&turn.settings),
            message: user_msg,
            stream: true,
            settings: turn.settings.clone(),
            mode: turn.mode.clone().filter(|m| !m.is_empty()),
            conversation_id: self.conversation_id,
        };
        tracing::debug!(
            "Sending turn to agent {} with {} message(s), conversation {:?}",
            request.agent,
            request.messages.len(),
            request.conversation_id
        );

        let started = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.backend.stream_chat(&request) => Some(result),
        };

        let body = match started {
            None => {
                // Stopped before the server answered
                let text = STOPPED_SUFFIX.to_string();
                view.render_assistant(&text);
                self.history.push(Message::assistant(&text));
                return TurnOutcome::Stopped { text };
            }
            Some(Err(e)) => {
                tracing::error!("Error sending message: {:#}", e);
                let error = e.to_string();
                view.render_error(&error_markdown("", &error));
                return TurnOutcome::Failed { error };
            }
            Some(Ok(body)) => body,
        };

        let stream_session = StreamSession::with_cancel(self.conversation_id.is_some(), cancel);
        let outcome = {
            let mut sink = ViewSink::new(&mut *view);
            stream_session.consume(body, &mut sink).await
        };

        if let Some(conversation_id) = outcome.conversation_id() {
            self.bind_conversation(conversation_id, view).await;
        }

        match outcome {
            StreamOutcome::Completed { text, .. } => {
                self.history.push(Message::assistant(&text));
                TurnOutcome::Completed { text }
            }
            StreamOutcome::Stopped { text, .. } => {
                self.history.push(Message::assistant(&text));
                TurnOutcome::Stopped { text }
            }
            StreamOutcome::Failed { partial, error, .. } => {
                let error = error.to_string();
                view.render_error(&error_markdown(&partial, &error));
                TurnOutcome::Failed { error }
            }
        }
    }

    /// History sent as context, with the configured system prompt first.
    fn context_messages(&self, settings: &GenerationSettings) -> Vec<Message> {
        let system_prompt = settings.system_prompt.trim();
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        if !system_prompt.is_empty() {
            messages.push(Message::system(system_prompt));
        }
        messages.extend(self.history.iter().cloned());
        messages
    }

    async fn bind_conversation<V: ChatView + ?Sized>(&mut self, conversation_id: i64, view: &mut V) {
        self.conversation_id = Some(conversation_id);
        view.set_active_conversation(Some(conversation_id));
        self.refresh_conversations(view).await;
    }

    /// Fetch the conversation list and hand it to the view. Failures
    /// are shown in the list, never raised.
    pub async fn refresh_conversations<V: ChatView + ?Sized>(&self, view: &mut V) {
        match self.backend.list_conversations().await {
            Ok(conversations) => view.show_conversations(&conversations, self.conversation_id),
            Err(e) => {
                tracing::error!("Could not load conversations: {:#}", e);
                view.show_conversations_error("Could not load history.");
            }
        }
    }

    /// Forget the history and start over without a conversation.
    pub fn new_chat<V: ChatView + ?Sized>(&mut self, view: &mut V) {
        self.history.clear();
        self.conversation_id = None;
        view.clear();
        view.set_active_conversation(None);
        tracing::info!("New chat started");
    }

    /// Replace the session with a stored conversation. Opening the
    /// conversation that is already active does nothing.
    pub async fn open_conversation<V: ChatView + ?Sized>(
        &mut self,
        conversation_id: i64,
        view: &mut V,
    ) -> anyhow::Result<()> {
        if self.conversation_id == Some(conversation_id) {
            return Ok(());
        }

        let conversation = self
            .backend
            .fetch_conversation(conversation_id)
            .await
            .inspect_err(|e| {
                tracing::error!("Failed to load conversation {}: {:#}", conversation_id, e)
            })?;

        view.clear();
        for msg in conversation.messages.iter() {
            view.render_message(msg.role, &msg.content);
        }
        self.history = conversation.messages;
        self.conversation_id = Some(conversation.id);
        view.set_active_conversation(Some(conversation.id));

        Ok(())
    }
}
