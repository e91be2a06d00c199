//! One-off code generation.
//!
//! A code turn is a single streamed chat request with a fixed prompt. It
//! has no history, no mode and never continues a conversation.

use tokio_util::sync::CancellationToken;

use super::backend::ChatBackend;
use super::models::{ChatRequest, Message};
use super::stream::{StreamOutcome, StreamSession, StreamSink};
use crate::settings::GenerationSettings;

pub fn code_prompt(language: &str, task: &str) -> String {
    format!(
        "You are an expert programmer. Generate a high-quality, production-ready code snippet in {} for the following task. Only output the code, with no extra explanation or markdown formatting.\n\nTask: {}",
        language, task
    )
}

pub fn code_request(
    agent: &str,
    language: &str,
    task: &str,
    settings: GenerationSettings,
) -> ChatRequest {
    let message = Message::user(&code_prompt(language, task));
    ChatRequest {
        agent: agent.to_string(),
        messages: vec![message.clone()],
        message,
        stream: true,
        settings,
        mode: None,
        conversation_id: None,
    }
}

/// Send a code request and stream the generated code into `sink`.
/// Errors before the response starts are returned, everything after
/// is reported in the outcome.
pub async fn generate_code<B, K>(
    backend: &B,
    request: &ChatRequest,
    cancel: CancellationToken,
    sink: &mut K,
) -> anyhow::Result<StreamOutcome>
where
    B: ChatBackend + ?Sized,
    K: StreamSink + ?Sized,
{
    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("Code generation stopped before the server answered");
            return Ok(StreamOutcome::Stopped {
                text: String::new(),
                conversation_id: None,
            });
        }
        body = backend.stream_chat(request) => body?,
    };

    // The server may still open a conversation for the request, its
    // header must not end up in the code
    let session = StreamSession::with_cancel(false, cancel);
    Ok(session.consume(body, sink).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_request_is_standalone() {
        let request = code_request("coder", "Rust", "reverse a string", GenerationSettings::default());
        assert_eq!(request.mode, None);
        assert_eq!(request.conversation_id, None);
        assert_eq!(request.messages, vec![request.message.clone()]);
        assert!(request.message.content.contains("snippet in Rust for"));
        assert!(request.message.content.ends_with("\n\nTask: reverse a string"));
    }
}
