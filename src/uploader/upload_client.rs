use reqwest::{multipart, Client};
use serde_json::Value;
use std::path::Path;

use crate::errors::{truncate_body, AppError, AppResult};
use crate::security::InputValidator;

use super::endpoint_url;

const UPLOAD_PATH: &str = "/upload/sketch";
const FILE_FIELD: &str = "sketchartboard";

/// Parsed JSON the server returns for an accepted artboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerAck(pub Value);

impl ServerAck {
    pub fn body(&self) -> &Value {
        &self.0
    }
}

/// Helper struct to hold upload payload data
#[derive(Debug, Clone)]
pub struct UploadPayload {
    file: Option<(String, Vec<u8>, String, String)>, // (filename, data, mime_type, field_name)
    text_fields: Vec<(String, String)>,
}

impl UploadPayload {
    pub fn new() -> Self {
        Self {
            file: None,
            text_fields: Vec::new(),
        }
    }

    pub fn add_text_field(&mut self, key: &str, value: &str) {
        self.text_fields.push((key.to_string(), value.to_string()));
    }

    pub async fn add_file(&mut self, file_path: &Path, filename: &str, field_name: &str) -> AppResult<()> {
        let file_contents = tokio::fs::read(file_path).await?;
        self.file = Some((
            filename.to_string(),
            file_contents,
            "image/png".to_string(),
            field_name.to_string(),
        ));
        Ok(())
    }

    pub fn build_form(&self) -> AppResult<multipart::Form> {
        let mut form = multipart::Form::new();

        if let Some((filename, data, mime_type, field_name)) = &self.file {
            let part = multipart::Part::bytes(data.clone())
                .file_name(filename.clone())
                .mime_str(mime_type)?;

            form = form.part(field_name.clone(), part);
        }

        for (key, value) in &self.text_fields {
            form = form.text(key.clone(), value.clone());
        }

        Ok(form)
    }
}

impl Default for UploadPayload {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UploadClient {
    client: Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Send one exported artboard, tagged with the run's session id.
    pub async fn upload(&self, file_path: &Path, filename: &str, session_id: &str) -> AppResult<ServerAck> {
        InputValidator::validate_export_file(file_path)?;

        let mut payload = UploadPayload::new();
        payload.add_file(file_path, filename, FILE_FIELD).await?;
        payload.add_text_field("filename", filename);
        payload.add_text_field("id", session_id);
        let form = payload.build_form()?;

        let url = endpoint_url(&self.endpoint, UPLOAD_PATH);
        log::debug!("Uploading {} to {} for session {}", filename, url, session_id);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        log::debug!(
            "Upload response for {} ({}): {}",
            filename,
            status,
            truncate_body(&body)
        );

        if !status.is_success() {
            return Err(AppError::protocol(
                &url,
                format!("server returned {}: {}", status, truncate_body(&body)),
            ));
        }

        let ack: Value = serde_json::from_str(&body)
            .map_err(|e| AppError::protocol(&url, format!("invalid upload JSON: {}", e)))?;

        Ok(ServerAck(ack))
    }
}
