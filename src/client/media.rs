//! Image, video and robotics endpoints.
use std::time::Duration;

use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{
    ApiClient, ApiResult, ImageRequest, ImageResponse, ImageSettings, PointAnnotation,
    RoboticsResponse, VideoOperation, VideoRequest, VideoSettings, VideoStatus, segment,
};

impl ApiClient {
    pub async fn generate_images(
        &self,
        agent: &str,
        prompt: &str,
        settings: &ImageSettings,
    ) -> ApiResult<ImageResponse> {
        let payload = ImageRequest {
            agent,
            prompt,
            settings,
        };
        self.send_json(self.http.post(self.url("/api/images/generate")).json(&payload))
            .await
    }

    pub async fn start_video(
        &self,
        agent: &str,
        prompt: &str,
        settings: &VideoSettings,
    ) -> ApiResult<VideoOperation> {
        let payload = VideoRequest {
            agent,
            prompt,
            settings,
        };
        self.send_json(self.http.post(self.url("/api/videos/generate")).json(&payload))
            .await
    }

    pub async fn video_status(&self, operation_name: &str) -> ApiResult<VideoStatus> {
        self.get_json(&format!("/api/videos/status/{}", segment(operation_name)))
            .await
    }

    /// Poll a video operation every `interval` until it completes or
    /// fails. Returns the video URL.
    pub async fn wait_for_video(&self, operation_name: &str, interval: Duration) -> Result<String> {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately, the server just started
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match self.video_status(operation_name).await? {
                VideoStatus::Processing => {
                    tracing::debug!("Video operation {} still processing", operation_name);
                }
                VideoStatus::Complete { url } => return Ok(url),
                VideoStatus::Failed { error } => {
                    return Err(anyhow!(
                        "Video generation failed: {}",
                        error.unwrap_or_else(|| "unknown error".to_string())
                    ));
                }
            }
        }
    }

    /// Upload an image with a prompt and get the model's raw JSON answer.
    pub async fn process_robotics_image(
        &self,
        agent: &str,
        prompt: &str,
        file_name: &str,
        image: Vec<u8>,
    ) -> ApiResult<RoboticsResponse> {
        let form = Form::new()
            .part("image", Part::bytes(image).file_name(file_name.to_string()))
            .text("prompt", prompt.to_string())
            .text("agent", agent.to_string());
        self.send_json(self.http.post(self.url("/api/robotics/process")).multipart(form))
            .await
    }
}

/// Decode the base64 payloads of an image response.
pub fn decode_images(response: &ImageResponse) -> Result<Vec<Vec<u8>>> {
    response
        .images
        .iter()
        .enumerate()
        .map(|(i, data)| {
            STANDARD
                .decode(data.trim())
                .map_err(|e| anyhow!("Image {} is not valid base64: {}", i, e))
        })
        .collect()
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(default)]
    point: Option<[f64; 2]>,
    #[serde(default)]
    label: Option<String>,
}

/// Parse the point list out of a robotics answer. Models often wrap the
/// JSON in a Markdown code fence so that is stripped first. Items
/// without a `point` are skipped.
pub fn parse_points(raw: &str) -> Result<Vec<PointAnnotation>> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches("json");
        text = text.strip_suffix("```").unwrap_or(text);
    }
    let items: Vec<RawPoint> = serde_json::from_str(text.trim())?;
    Ok(items
        .into_iter()
        .filter_map(|item| {
            item.point.map(|point| PointAnnotation {
                point,
                label: item.label,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_images() {
        let response = ImageResponse {
            images: vec![STANDARD.encode(b"\x89PNG fake"), STANDARD.encode(b"second")],
        };
        let images = decode_images(&response).unwrap();
        assert_eq!(images[0], b"\x89PNG fake");
        assert_eq!(images[1], b"second");
    }

    #[test]
    fn test_decode_images_rejects_garbage() {
        let response = ImageResponse {
            images: vec!["not base64!".to_string()],
        };
        let err = decode_images(&response).unwrap_err();
        assert!(err.to_string().contains("Image 0"));
    }

    #[test]
    fn test_parse_points() {
        let raw = r#"[{"point": [120, 480], "label": "cup"}, {"point": [10, 20]}]"#;
        let points = parse_points(raw).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label.as_deref(), Some("cup"));
        assert_eq!(points[1].point, [10.0, 20.0]);
    }

    #[test]
    fn test_parse_points_in_code_fence() {
        let raw = "```json\n[{\"point\": [1, 2], \"label\": \"a\"}]\n```";
        let points = parse_points(raw).unwrap();
        assert_eq!(points[0].point, [1.0, 2.0]);
    }

    #[test]
    fn test_parse_points_skips_items_without_point() {
        let raw = r#"[{"label": "shadow"}, {"point": [5, 6], "label": "cup"}, {"point": null}]"#;
        let points = parse_points(raw).unwrap();
        assert_eq!(
            points,
            vec![PointAnnotation {
                point: [5.0, 6.0],
                label: Some("cup".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_points_invalid() {
        assert!(parse_points("I could not find anything").is_err());
    }
}
