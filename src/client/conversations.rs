//! Conversation endpoints
use super::{ApiClient, ApiResult};
use crate::chat::{Conversation, ConversationSummary};

impl ApiClient {
    pub async fn list_conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        self.get_json("/api/conversations").await
    }

    pub async fn fetch_conversation(&self, conversation_id: i64) -> ApiResult<Conversation> {
        self.get_json(&format!("/api/conversations/{}", conversation_id))
            .await
    }

    pub async fn delete_conversation(&self, conversation_id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/api/conversations/{}", conversation_id));
        let response = self.http.delete(url).timeout(self.timeout).send().await?;
        super::check_response(response).await?;
        Ok(())
    }
}
