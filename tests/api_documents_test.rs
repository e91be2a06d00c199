//! Integration tests for the document question answering endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use agentchat::client::{ApiError, DocumentId};
    use mockito::Matcher;
    use serde_json::json;

    use crate::test_utils::test_client;

    /// Tests uploading a document as multipart and asking about it
    #[tokio::test]
    async fn it_uploads_and_queries_a_document() {
        let mut server = mockito::Server::new_async().await;
        let upload = server
            .mock("POST", "/api/documents/upload")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="document"; filename="report.pdf""#.to_string()),
                Matcher::Regex(r#"name="agent"\r\n\r\nreader"#.to_string()),
            ]))
            .with_body(r#"{"doc_id": "doc-123"}"#)
            .create_async()
            .await;
        let query = server
            .mock("POST", "/api/documents/query")
            .match_body(Matcher::Json(json!({
                "doc_id": "doc-123",
                "question": "What is the total?",
                "agent": "reader"
            })))
            .with_body(r#"{"answer": "The total is **42**."}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let uploaded = client
            .upload_document("reader", "report.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        assert_eq!(uploaded.doc_id, DocumentId::Text("doc-123".to_string()));

        let answer = client
            .query_document("reader", &uploaded.doc_id, "What is the total?")
            .await
            .unwrap();
        assert_eq!(answer.answer, "The total is **42**.");

        upload.assert_async().await;
        query.assert_async().await;
    }

    /// Tests a numeric document id is sent back as a number
    #[tokio::test]
    async fn it_sends_numeric_ids_back_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let query = server
            .mock("POST", "/api/documents/query")
            .match_body(Matcher::PartialJson(json!({"doc_id": 7})))
            .with_body(r#"{"answer": "Yes."}"#)
            .create_async()
            .await;

        let answer = test_client(&server)
            .query_document("reader", &DocumentId::Number(7), "Is it signed?")
            .await
            .unwrap();
        assert_eq!(answer.answer, "Yes.");
        query.assert_async().await;
    }

    /// Tests an upload failure surfaces the server's error message
    #[tokio::test]
    async fn it_reports_upload_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/documents/upload")
            .with_status(400)
            .with_body(r#"{"error": "Unsupported file type"}"#)
            .create_async()
            .await;

        let err = test_client(&server)
            .upload_document("reader", "notes.xyz", b"data".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert_eq!(err.to_string(), "Unsupported file type");
    }
}
