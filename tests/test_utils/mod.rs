//! Test utilities for integration tests
#![allow(dead_code)]

use agentchat::chat::{ChatView, ConversationSummary, Role};
use agentchat::client::ApiClient;

/// Client pointed at a mock server.
pub fn test_client(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(&server.url())
}

/// Everything a chat session asked the view to do, in order.
#[derive(Default)]
pub struct RecordingView {
    pub calls: Vec<String>,
    pub assistant: Vec<String>,
    pub errors: Vec<String>,
    pub conversations: Vec<ConversationSummary>,
    pub active: Option<i64>,
    pub sending_enabled: bool,
}

impl ChatView for RecordingView {
    fn render_message(&mut self, role: Role, content: &str) {
        self.calls.push(format!("message {}: {}", role, content));
    }

    fn show_pending(&mut self) {
        self.calls.push("pending".to_string());
    }

    fn render_assistant(&mut self, markdown: &str) {
        self.assistant.push(markdown.to_string());
    }

    fn render_error(&mut self, markdown: &str) {
        self.errors.push(markdown.to_string());
    }

    fn set_sending_enabled(&mut self, enabled: bool) {
        self.sending_enabled = enabled;
        self.calls.push(format!("sending {}", enabled));
    }

    fn set_stop_visible(&mut self, visible: bool) {
        self.calls.push(format!("stop {}", visible));
    }

    fn focus_input(&mut self) {
        self.calls.push("focus".to_string());
    }

    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: Option<i64>) {
        self.conversations = conversations.to_vec();
        self.calls.push(format!("conversations {:?}", active));
    }

    fn show_conversations_error(&mut self, message: &str) {
        self.calls.push(format!("conversations error {}", message));
    }

    fn set_active_conversation(&mut self, conversation_id: Option<i64>) {
        self.active = conversation_id;
    }

    fn clear(&mut self) {
        self.calls.push("clear".to_string());
    }
}
