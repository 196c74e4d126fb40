use serde::Serialize;

use crate::config::Config;

pub const COMPLETION_TITLE: &str = "Sharing Artboards";
pub const COMPLETION_BODY: &str = "A link to your artboards has been copied to your clipboard.";
pub const UPDATE_NOTICE: &str = "Recommended: Update This Plugin";

/// What the completion dialog shows once a run finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub share_link: String,
    pub update_available: bool,
    pub update_url: String,
    pub failed_artboards: Vec<String>,
}

impl Completion {
    /// Plain-text rendering of the dialog.
    pub fn render(&self) -> String {
        let mut lines = vec![
            COMPLETION_TITLE.to_string(),
            COMPLETION_BODY.to_string(),
            format!("View link: {}", self.share_link),
        ];

        if !self.failed_artboards.is_empty() {
            lines.push(format!(
                "{} artboard(s) could not be uploaded: {}",
                self.failed_artboards.len(),
                self.failed_artboards.join(", ")
            ));
        }

        if self.update_available {
            lines.push(format!("{}: {}", UPDATE_NOTICE, self.update_url));
        }

        lines.join("\n")
    }
}

/// Everything the user sees during and after a run.
pub trait ResultPresenter {
    fn show_message(&mut self, message: &str);

    fn show_warning(&mut self, message: &str) {
        self.show_message(message);
    }

    /// Blocking error shown when the run cannot start.
    fn show_error(&mut self, message: &str);

    /// Returns whether the link reached the clipboard.
    fn copy_link(&mut self, link: &str) -> bool;

    fn present_completion(&mut self, completion: &Completion);
}

/// Console presenter backed by the system clipboard and browser.
pub struct DesktopPresenter {
    open_link_after_upload: bool,
    open_update_page: bool,
}

impl DesktopPresenter {
    pub fn new(config: &Config) -> Self {
        Self {
            open_link_after_upload: config.open_link_after_upload,
            open_update_page: config.open_update_page,
        }
    }

    fn open_url(&self, url: &str) {
        if let Err(e) = open::that(url) {
            log::warn!("Could not open url {}: {}", url, e);
        }
    }
}

impl ResultPresenter for DesktopPresenter {
    fn show_message(&mut self, message: &str) {
        log::info!("{}", message);
    }

    fn show_warning(&mut self, message: &str) {
        log::warn!("{}", message);
    }

    fn show_error(&mut self, message: &str) {
        log::error!("{}", message);
        eprintln!("{}", message);
    }

    fn copy_link(&mut self, link: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(link.to_string()) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Clipboard copy failed (non-critical): {}", e);
                    false
                }
            },
            Err(e) => {
                log::warn!("Clipboard unavailable (non-critical): {}", e);
                false
            }
        }
    }

    fn present_completion(&mut self, completion: &Completion) {
        println!("{}", completion.render());

        if self.open_link_after_upload {
            self.open_url(&completion.share_link);
        }

        if completion.update_available && self.open_update_page {
            self.open_url(&completion.update_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion() -> Completion {
        Completion {
            share_link: "http://easier.cc/view/abc123".to_string(),
            update_available: false,
            update_url: "http://easier.cc/".to_string(),
            failed_artboards: Vec::new(),
        }
    }

    #[test]
    fn test_render_basic_dialog() {
        let text = completion().render();
        assert!(text.starts_with(COMPLETION_TITLE));
        assert!(text.contains("http://easier.cc/view/abc123"));
        assert!(!text.contains(UPDATE_NOTICE));
        assert!(!text.contains("could not be uploaded"));
    }

    #[test]
    fn test_render_update_and_failures() {
        let mut completion = completion();
        completion.update_available = true;
        completion.failed_artboards = vec!["CTA!!".to_string()];

        let text = completion.render();
        assert!(text.contains("Recommended: Update This Plugin: http://easier.cc/"));
        assert!(text.contains("1 artboard(s) could not be uploaded: CTA!!"));
    }
}
