//! Agent directory endpoints
use super::{AgentDetail, AgentUpdate, ApiClient, ApiResult, MessageResponse, NewAgent, segment};

impl ApiClient {
    /// Names of all configured agents
    pub async fn list_agents(&self) -> ApiResult<Vec<String>> {
        self.get_json("/api/agents").await
    }

    pub async fn fetch_agent(&self, name: &str) -> ApiResult<AgentDetail> {
        self.get_json(&format!("/api/agents/{}", segment(name))).await
    }

    /// Fails with `ApiError::Conflict` when the name is already taken.
    pub async fn create_agent(&self, agent: &NewAgent) -> ApiResult<MessageResponse> {
        self.send_json(self.http.post(self.url("/api/agents")).json(agent))
            .await
    }

    pub async fn update_agent(&self, name: &str, update: &AgentUpdate) -> ApiResult<MessageResponse> {
        let url = self.url(&format!("/api/agents/{}", segment(name)));
        self.send_json(self.http.put(url).json(update)).await
    }

    pub async fn delete_agent(&self, name: &str) -> ApiResult<MessageResponse> {
        let url = self.url(&format!("/api/agents/{}", segment(name)));
        self.send_json(self.http.delete(url)).await
    }

    /// Models available for an agent type, e.g. `ollama`. An empty list
    /// means the server cannot enumerate them and any name is accepted.
    pub async fn list_models(&self, agent_type: &str) -> ApiResult<Vec<String>> {
        self.get_json(&format!("/api/models/{}", segment(agent_type)))
            .await
    }
}
