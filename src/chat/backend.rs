use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use super::models::{ChatRequest, Conversation, ConversationSummary};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Raw response body of the chat streaming endpoint.
pub type ByteStream = BoxStream<'static, Result<Bytes, BoxError>>;

/// The server calls a chat session depends on.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issue a chat request. Fails before any body is read when the
    /// server rejects the request.
    async fn stream_chat(&self, request: &ChatRequest) -> anyhow::Result<ByteStream>;

    async fn list_conversations(&self) -> anyhow::Result<Vec<ConversationSummary>>;

    async fn fetch_conversation(&self, conversation_id: i64) -> anyhow::Result<Conversation>;
}
