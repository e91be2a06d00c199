//! Message types shared by the chat session and the API client.
use serde::{Deserialize, Serialize};

use crate::settings::GenerationSettings;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: &str) -> Self {
        Self::new(Role::System, content)
    }
}

/// Body of `POST /chat`.
#[derive(Clone, Serialize, Debug)]
pub struct ChatRequest {
    pub agent: String,
    pub messages: Vec<Message>,
    pub message: Message,
    pub stream: bool,
    pub settings: GenerationSettings,
    pub mode: Option<String>,
    pub conversation_id: Option<i64>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ConversationSummary {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_role_deserialization() {
        let json = r#""assistant""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::Assistant);

        // Tool messages are not part of this protocol
        assert!(serde_json::from_str::<Role>(r#""tool""#).is_err());
    }

    #[test]
    fn test_message_new() {
        let msg = Message::user("Hello world");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"user","content":"Hello world"}"#
        );
    }

    #[test]
    fn test_chat_request_serializes_nulls() {
        let request = ChatRequest {
            agent: "gemini".to_string(),
            messages: vec![Message::user("Hi")],
            message: Message::user("Hi"),
            stream: true,
            settings: GenerationSettings::default(),
            mode: None,
            conversation_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["agent"], "gemini");
        assert_eq!(json["stream"], true);
        assert!(json["mode"].is_null());
        assert!(json["conversation_id"].is_null());
        assert_eq!(json["message"]["role"], "user");
        assert_eq!(json["settings"]["max_tokens"], 4096);
    }

    #[test]
    fn test_conversation_deserialization() {
        let json = r#"{"id": 3, "messages": [{"role": "user", "content": "Hi"}]}"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conversation.id, 3);
        assert_eq!(conversation.title, None);
        assert_eq!(conversation.messages, vec![Message::user("Hi")]);
    }
}
