//! Chat view that writes to a terminal.
//!
//! Terminals can only append, so each render writes the part of the
//! response that has not been printed yet. When a render does not
//! extend what is on screen (an error replacing the response) the new
//! text is printed on a fresh line.

use std::io::Write;

use crate::chat::{ChatView, ConversationSummary, Role};

pub struct TerminalView<W: Write> {
    out: W,
    printed: String,
    echo_user: bool,
    sending_enabled: bool,
}

impl<W: Write> TerminalView<W> {
    /// `echo_user` controls whether user messages are printed. At an
    /// interactive prompt they are already on screen.
    pub fn new(out: W, echo_user: bool) -> Self {
        Self {
            out,
            printed: String::new(),
            echo_user,
            sending_enabled: true,
        }
    }

    pub fn set_echo_user(&mut self, echo_user: bool) {
        self.echo_user = echo_user;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::error!("Failed writing to terminal: {}", e);
        }
    }

    fn update(&mut self, text: &str) {
        match text.strip_prefix(self.printed.as_str()) {
            Some(rest) => {
                let rest = rest.to_string();
                self.write(&rest);
            }
            None => {
                let text = format!("\n{}", text);
                self.write(&text);
            }
        }
        self.printed = text.to_string();
    }

    fn end_turn(&mut self) {
        if !self.printed.is_empty() {
            self.write("\n\n");
            self.printed.clear();
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_message(&mut self, role: Role, content: &str) {
        if role == Role::User && !self.echo_user {
            return;
        }
        let line = format!("{}: {}\n\n", role, content);
        self.write(&line);
    }

    fn show_pending(&mut self) {
        self.printed.clear();
    }

    fn render_assistant(&mut self, markdown: &str) {
        self.update(markdown);
    }

    fn render_error(&mut self, markdown: &str) {
        self.update(markdown);
    }

    fn set_sending_enabled(&mut self, enabled: bool) {
        if enabled && !self.sending_enabled {
            self.end_turn();
        }
        self.sending_enabled = enabled;
    }

    // Ctrl-C is the stop control, there is nothing to show
    fn set_stop_visible(&mut self, _visible: bool) {}

    fn focus_input(&mut self) {}

    fn show_conversations(&mut self, conversations: &[ConversationSummary], active: Option<i64>) {
        if conversations.is_empty() {
            self.write("No conversations yet.\n");
            return;
        }
        let mut listing = String::new();
        for conversation in conversations {
            let marker = if Some(conversation.id) == active { "*" } else { " " };
            listing.push_str(&format!(
                "{} {:>5}  {}\n",
                marker,
                conversation.id,
                conversation.title.as_deref().unwrap_or("(untitled)")
            ));
        }
        self.write(&listing);
    }

    fn show_conversations_error(&mut self, message: &str) {
        let line = format!("{}\n", message);
        self.write(&line);
    }

    fn set_active_conversation(&mut self, conversation_id: Option<i64>) {
        tracing::debug!("Active conversation: {:?}", conversation_id);
    }

    fn clear(&mut self) {
        self.printed.clear();
        self.write("\n--- new chat ---\n\n");
    }
}
