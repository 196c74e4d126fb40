use super::orchestrator::{UploadOutcome, UploadResult};

pub const SELECTION_START_MESSAGE: &str =
    "Uploading Selected Artboards... (Spinning beachball is normal)";
pub const ALL_PAGES_START_MESSAGE: &str =
    "Uploading All Artboards... (Spinning beachball is normal)";
pub const FLOATING_LAYER_WARNING: &str =
    "You can't share floating layers, only artboards will be uploaded.";

pub fn selection_progress_message(position: usize, total: usize) -> String {
    format!("Uploading artboard {} of {}", position, total)
}

pub fn page_progress_message(
    position: usize,
    total: usize,
    page_position: usize,
    page_count: usize,
) -> String {
    format!(
        "Uploading artboard {} of {} (on page {} of {})",
        position, total, page_position, page_count
    )
}

/// Collects per-artboard results for one run, in the order they happen.
#[derive(Debug)]
pub struct ProgressTracker {
    session_id: String,
    results: Vec<UploadResult>,
    skipped: Vec<String>,
}

impl ProgressTracker {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            results: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record(&mut self, result: UploadResult) {
        match &result.outcome {
            UploadOutcome::Uploaded(_) => {
                log::info!(
                    "Progress: Uploaded {} as {} ({} done)",
                    result.artboard_name,
                    result.filename,
                    self.results.len() + 1
                );
            }
            UploadOutcome::Failed { stage, error } => {
                log::warn!(
                    "Progress: {} failed for {} in session {} - {}",
                    stage,
                    result.artboard_name,
                    self.session_id,
                    error
                );
            }
        }
        self.results.push(result);
    }

    pub fn record_skipped(&mut self, name: &str) {
        log::warn!("Progress: Skipped '{}', it is not an artboard", name);
        self.skipped.push(name.to_string());
    }

    pub fn failed_artboards(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.artboard_name.clone())
            .collect()
    }

    pub fn finish(self) -> (Vec<UploadResult>, Vec<String>) {
        let succeeded = self.results.iter().filter(|r| r.succeeded()).count();
        log::info!(
            "Session {} completed: {}/{} artboards uploaded, {} skipped",
            self.session_id,
            succeeded,
            self.results.len(),
            self.skipped.len()
        );
        (self.results, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploader::orchestrator::FailureStage;
    use crate::uploader::upload_client::ServerAck;

    #[test]
    fn test_progress_messages() {
        assert_eq!(selection_progress_message(1, 2), "Uploading artboard 1 of 2");
        assert_eq!(
            page_progress_message(3, 4, 1, 2),
            "Uploading artboard 3 of 4 (on page 1 of 2)"
        );
    }

    #[test]
    fn test_tracker_keeps_order_and_failures() {
        let mut tracker = ProgressTracker::new("abc123");
        tracker.record(UploadResult {
            artboard_name: "Hero Shot".to_string(),
            filename: "hero_shot.png".to_string(),
            outcome: UploadOutcome::Uploaded(ServerAck(serde_json::json!({}))),
        });
        tracker.record(UploadResult {
            artboard_name: "CTA!!".to_string(),
            filename: "cta__.png".to_string(),
            outcome: UploadOutcome::Failed {
                stage: FailureStage::Upload,
                error: "timed out".to_string(),
            },
        });
        tracker.record_skipped("Rectangle");

        assert_eq!(tracker.failed_artboards(), vec!["CTA!!".to_string()]);

        let (results, skipped) = tracker.finish();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].artboard_name, "Hero Shot");
        assert_eq!(skipped, vec!["Rectangle".to_string()]);
    }
}
