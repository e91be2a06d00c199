//! Document question answering endpoints
use reqwest::multipart::{Form, Part};

use super::{ApiClient, ApiResult, DocumentAnswer, DocumentId, DocumentQuery, DocumentUpload};

impl ApiClient {
    /// Upload a document for the agent to index. The returned id is
    /// used for every question about it.
    pub async fn upload_document(
        &self,
        agent: &str,
        file_name: &str,
        document: Vec<u8>,
    ) -> ApiResult<DocumentUpload> {
        let form = Form::new()
            .part("document", Part::bytes(document).file_name(file_name.to_string()))
            .text("agent", agent.to_string());
        self.send_json(self.http.post(self.url("/api/documents/upload")).multipart(form))
            .await
    }

    pub async fn query_document(
        &self,
        agent: &str,
        doc_id: &DocumentId,
        question: &str,
    ) -> ApiResult<DocumentAnswer> {
        let payload = DocumentQuery {
            doc_id,
            question,
            agent,
        };
        self.send_json(self.http.post(self.url("/api/documents/query")).json(&payload))
            .await
    }
}
