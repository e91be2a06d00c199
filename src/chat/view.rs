use super::models::{ConversationSummary, Role};
use super::stream::StreamSink;

/// Everything a chat session shows to the user.
///
/// Text handed to `render_assistant` and `render_error` is Markdown and
/// always the complete content of the assistant turn so far, not a
/// delta. Implementations decide how to draw it.
pub trait ChatView {
    /// Show a finished message, e.g. the user's prompt or one loaded
    /// from a stored conversation.
    fn render_message(&mut self, role: Role, content: &str);

    /// Placeholder for an assistant turn that has not produced text yet.
    fn show_pending(&mut self);

    fn render_assistant(&mut self, markdown: &str);

    /// Replace the assistant turn with an error.
    fn render_error(&mut self, markdown: &str);

    fn set_sending_enabled(&mut self, enabled: bool);

    fn set_stop_visible(&mut self, visible: bool);

    fn focus_input(&mut self);

    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: Option<i64>);

    fn show_conversations_error(&mut self, message: &str);

    fn set_active_conversation(&mut self, conversation_id: Option<i64>);

    fn clear(&mut self);
}

/// Renders a streaming response into the assistant turn of a view.
pub struct ViewSink<'a, V: ?Sized> {
    view: &'a mut V,
}

impl<'a, V: ChatView + ?Sized> ViewSink<'a, V> {
    pub fn new(view: &'a mut V) -> Self {
        Self { view }
    }
}

impl<V: ChatView + ?Sized> StreamSink for ViewSink<'_, V> {
    fn conversation_acquired(&mut self, conversation_id: i64) {
        tracing::info!("Started new conversation: {}", conversation_id);
    }

    fn render(&mut self, text: &str) {
        self.view.render_assistant(text);
    }
}
