use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from {url}: {reason}")]
    Protocol { url: String, reason: String },

    #[error("Export failed for artboard '{artboard}': {reason}")]
    Export { artboard: String, reason: String },

    #[error("Exported file {path} cannot be uploaded: {reason}")]
    InvalidExportFile { path: String, reason: String },

    #[error("'{name}' is not an artboard and cannot be shared")]
    UnsupportedSelection { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn protocol(url: &str, reason: impl Into<String>) -> Self {
        Self::Protocol {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn export(artboard: &str, reason: impl Into<String>) -> Self {
        Self::Export {
            artboard: artboard.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_export_file(path: &std::path::Path, reason: &str) -> Self {
        Self::InvalidExportFile {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported_selection(name: &str) -> Self {
        Self::UnsupportedSelection {
            name: name.to_string(),
        }
    }
}

/// Keep logged response bodies short
pub fn truncate_body(body: &str) -> &str {
    let mut end = std::cmp::min(300, body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
