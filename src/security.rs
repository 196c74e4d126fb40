use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::errors::{AppError, AppResult};

/// Anything outside this set is replaced before a name reaches the file system or a URL.
fn unsafe_name_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]").unwrap())
}

pub struct InputValidator;

impl InputValidator {
    /// Replace every character outside `[A-Za-z0-9]` with `_` and lower-case the result.
    pub fn sanitize_artboard_name(name: &str) -> String {
        let sanitized = unsafe_name_chars().replace_all(name, "_").to_lowercase();

        if sanitized.is_empty() {
            "_".to_string()
        } else {
            sanitized
        }
    }

    pub fn artboard_filename(name: &str) -> String {
        format!("{}.png", Self::sanitize_artboard_name(name))
    }

    /// An export must be a non-empty PNG on disk before it is uploaded.
    pub fn validate_export_file(path: &Path) -> AppResult<()> {
        let is_png = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            return Err(AppError::invalid_export_file(path, "not a PNG file"));
        }

        if !path.is_file() {
            return Err(AppError::invalid_export_file(path, "not written by the exporter"));
        }

        if std::fs::metadata(path)?.len() == 0 {
            return Err(AppError::invalid_export_file(path, "file is empty"));
        }

        Ok(())
    }
}
