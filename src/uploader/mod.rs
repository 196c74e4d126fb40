// Main uploader module - orchestrates artboard export and upload
//
// This module is responsible for turning a selection into a share link

pub mod orchestrator;
pub mod progress_tracker;
pub mod session_client;
pub mod upload_client;
pub mod version_check;

use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::errors::AppResult;

pub use orchestrator::{FailureStage, RunSummary, UploadOrchestrator, UploadOutcome, UploadResult};
pub use session_client::{Session, SessionClient};
pub use upload_client::{ServerAck, UploadClient};

/// One client per run; both endpoints share its user agent and timeout.
pub fn build_http_client(config: &Config) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}

pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        assert_eq!(
            endpoint_url("http://easier.cc", "/request/id"),
            "http://easier.cc/request/id"
        );
        assert_eq!(
            endpoint_url("http://easier.cc/", "upload/sketch"),
            "http://easier.cc/upload/sketch"
        );
    }
}
