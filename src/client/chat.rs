//! The chat streaming endpoint
use async_trait::async_trait;
use futures_util::StreamExt;

use super::{ApiClient, check_response};
use crate::chat::{BoxError, ByteStream, ChatBackend, ChatRequest, Conversation, ConversationSummary};

#[async_trait]
impl ChatBackend for ApiClient {
    async fn stream_chat(&self, request: &ChatRequest) -> anyhow::Result<ByteStream> {
        // No timeout here: a long answer streams for as long as it takes
        let response = self
            .http
            .post(self.url("/chat"))
            .json(request)
            .send()
            .await?;
        let response = check_response(response).await?;

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Box::new(e) as BoxError))
            .boxed();
        Ok(body)
    }

    async fn list_conversations(&self) -> anyhow::Result<Vec<ConversationSummary>> {
        Ok(ApiClient::list_conversations(self).await?)
    }

    async fn fetch_conversation(&self, conversation_id: i64) -> anyhow::Result<Conversation> {
        Ok(ApiClient::fetch_conversation(self, conversation_id).await?)
    }
}
