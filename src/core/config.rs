use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::default_settings_path;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_url: String,
    pub settings_path: PathBuf,
    pub default_agent: Option<String>,
    pub video_poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let server_url = env::var("AGENTCHAT_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        let settings_path = env::var("AGENTCHAT_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_settings_path());
        let default_agent = env::var("AGENTCHAT_AGENT").ok().filter(|s| !s.is_empty());
        let video_poll_interval = env::var("AGENTCHAT_VIDEO_POLL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));
        // Only applies to the plain JSON endpoints, a chat stream has no deadline
        let request_timeout = env::var("AGENTCHAT_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60 * 5));

        Self {
            server_url,
            settings_path,
            default_agent,
            video_poll_interval,
            request_timeout,
        }
    }
}
