//! Request and response bodies of the JSON endpoints.
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reply of the agent mutation endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentMode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub generation_model: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentDetail {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub config: Option<AgentConfig>,
    /// Mode id to mode
    #[serde(default)]
    pub modes: BTreeMap<String, AgentMode>,
}

impl AgentDetail {
    /// The configured model, which older agents only carry in `config`.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty()).or_else(|| {
            self.config
                .as_ref()
                .and_then(|c| c.generation_model.as_deref())
        })
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewAgent {
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub description: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgentUpdate {
    pub description: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ImageSettings {
    pub number_of_images: u32,
    pub aspect_ratio: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ImageRequest<'a> {
    pub agent: &'a str,
    pub prompt: &'a str,
    pub settings: &'a ImageSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImageResponse {
    /// Base64 encoded PNG data
    pub images: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VideoSettings {
    pub duration_seconds: u32,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct VideoRequest<'a> {
    pub agent: &'a str,
    pub prompt: &'a str,
    pub settings: &'a VideoSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct VideoOperation {
    pub operation_name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VideoStatus {
    Processing,
    Complete {
        url: String,
    },
    Failed {
        #[serde(default)]
        error: Option<String>,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoboticsResponse {
    /// JSON text produced by the model
    pub result: String,
}

/// Id the server assigns to an uploaded document. Passed back verbatim
/// when asking questions about it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DocumentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(id) => write!(f, "{}", id),
            DocumentId::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for DocumentId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(DocumentId::Number)
            .unwrap_or_else(|_| DocumentId::Text(s.to_string())))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DocumentUpload {
    pub doc_id: DocumentId,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct DocumentQuery<'a> {
    pub doc_id: &'a DocumentId,
    pub question: &'a str,
    pub agent: &'a str,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DocumentAnswer {
    /// Markdown
    pub answer: String,
}

/// A point found in an image, `[y, x]` on a 0..1000 grid.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PointAnnotation {
    pub point: [f64; 2],
    #[serde(default)]
    pub label: Option<String>,
}

impl PointAnnotation {
    /// Position scaled to an image of the given size, as `(x, y)`.
    pub fn to_pixels(&self, width: u32, height: u32) -> (f64, f64) {
        let [y, x] = self.point;
        (x / 1000.0 * width as f64, y / 1000.0 * height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_detail_with_modes() {
        let json = r#"{
            "name": "gemini",
            "description": "General purpose",
            "config": {"generation_model": "gemini-2.0-flash"},
            "modes": {
                "code": {"name": "Code Assistant", "prompt": "You write code."},
                "brief": {"name": "Brief"}
            }
        }"#;
        let agent: AgentDetail = serde_json::from_str(json).unwrap();
        assert_eq!(agent.model_name(), Some("gemini-2.0-flash"));
        assert_eq!(agent.modes.len(), 2);
        assert_eq!(agent.modes["code"].name, "Code Assistant");
    }

    #[test]
    fn test_agent_detail_prefers_model_field() {
        let json = r#"{"name": "a", "model": "llama3", "config": {"generation_model": "x"}}"#;
        let agent: AgentDetail = serde_json::from_str(json).unwrap();
        assert_eq!(agent.model_name(), Some("llama3"));
        assert!(agent.modes.is_empty());
    }

    #[test]
    fn test_new_agent_serializes_type() {
        let agent = NewAgent {
            name: "helper".to_string(),
            agent_type: "ollama".to_string(),
            description: String::new(),
            model: "llama3".to_string(),
            system_prompt: String::new(),
        };
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["type"], "ollama");
        assert!(json.get("agent_type").is_none());
    }

    #[test]
    fn test_video_status_deserialization() {
        let processing: VideoStatus = serde_json::from_str(r#"{"status":"processing"}"#).unwrap();
        assert_eq!(processing, VideoStatus::Processing);

        let complete: VideoStatus =
            serde_json::from_str(r#"{"status":"complete","url":"/static/v.mp4"}"#).unwrap();
        assert_eq!(
            complete,
            VideoStatus::Complete {
                url: "/static/v.mp4".to_string()
            }
        );

        let failed: VideoStatus =
            serde_json::from_str(r#"{"status":"failed","error":"quota"}"#).unwrap();
        assert_eq!(
            failed,
            VideoStatus::Failed {
                error: Some("quota".to_string())
            }
        );
    }

    #[test]
    fn test_document_id_keeps_its_json_type() {
        let upload: DocumentUpload = serde_json::from_str(r#"{"doc_id": "a1b2"}"#).unwrap();
        assert_eq!(upload.doc_id, DocumentId::Text("a1b2".to_string()));
        let upload: DocumentUpload = serde_json::from_str(r#"{"doc_id": 17}"#).unwrap();
        assert_eq!(upload.doc_id, DocumentId::Number(17));
        assert_eq!(serde_json::to_string(&upload.doc_id).unwrap(), "17");

        assert_eq!("17".parse::<DocumentId>().unwrap(), DocumentId::Number(17));
        assert_eq!(
            "a1b2".parse::<DocumentId>().unwrap().to_string(),
            "a1b2"
        );
    }

    #[test]
    fn test_point_to_pixels() {
        let point = PointAnnotation {
            point: [500.0, 250.0],
            label: None,
        };
        assert_eq!(point.to_pixels(800, 600), (200.0, 300.0));
    }
}
