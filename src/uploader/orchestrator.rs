use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{validate_config, Config};
use crate::errors::{AppError, AppResult};
use crate::host::{ArtboardRef, HostDocument, PageRef, SelectionItem};
use crate::presenter::{Completion, ResultPresenter};
use crate::security::InputValidator;

use super::build_http_client;
use super::progress_tracker::*;
use super::session_client::{Session, SessionClient};
use super::upload_client::{ServerAck, UploadClient};
use super::version_check::{is_update_available, CLIENT_VERSION};

/// An artboard resolved for this run, with the file it is exported to.
#[derive(Debug, Clone)]
pub struct ArtboardTarget {
    pub name: String,
    pub source_page: usize,
    pub export_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Export,
    Upload,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Export => write!(f, "Export"),
            FailureStage::Upload => write!(f, "Upload"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Uploaded(ServerAck),
    Failed { stage: FailureStage, error: String },
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub artboard_name: String,
    pub filename: String,
    pub outcome: UploadOutcome,
}

impl UploadResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Uploaded(_))
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub session_id: String,
    pub share_link: String,
    pub results: Vec<UploadResult>,
    pub skipped: Vec<String>,
    pub update_available: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn uploaded_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed_artboards(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.artboard_name.as_str())
            .collect()
    }
}

/// Drives one share run: session, export, upload, link.
pub struct UploadOrchestrator {
    config: Config,
    client_version: String,
    session_client: SessionClient,
    upload_client: UploadClient,
}

impl UploadOrchestrator {
    pub fn new(config: Config) -> AppResult<Self> {
        validate_config(&config)?;

        let http = build_http_client(&config)?;
        let base_url = config.base_url().to_string();

        Ok(Self {
            session_client: SessionClient::new(http.clone(), base_url.clone()),
            upload_client: UploadClient::new(http, base_url),
            client_version: CLIENT_VERSION.to_string(),
            config,
        })
    }

    pub fn with_client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Share `selection`, or every artboard in the document when it is empty.
    ///
    /// Only a failed session request aborts the run. Export and upload
    /// failures are recorded per artboard and listed in the completion.
    pub async fn run(
        &self,
        host: &mut dyn HostDocument,
        selection: &[SelectionItem],
        presenter: &mut dyn ResultPresenter,
    ) -> AppResult<RunSummary> {
        let started_at = Utc::now();
        let export_dir = match self.config.export_directory() {
            Ok(dir) => dir,
            Err(e) => {
                log::error!("Could not prepare the export directory: {}", e);
                presenter.show_error(&format!("Could not start sharing: {}", e));
                return Err(e);
            }
        };

        presenter.show_message(if selection.is_empty() {
            ALL_PAGES_START_MESSAGE
        } else {
            SELECTION_START_MESSAGE
        });

        let session = match self.session_client.request_session().await {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not obtain a share session: {}", e);
                presenter.show_error(&format!("Could not start sharing: {}", e));
                return Err(e);
            }
        };

        let update_available = is_update_available(&session.server_version, &self.client_version);
        if update_available {
            log::info!(
                "Server publishes version {}, running {}",
                session.server_version,
                self.client_version
            );
        }

        let mut tracker = ProgressTracker::new(&session.id);

        if selection.is_empty() {
            self.upload_all_pages(host, &session, &export_dir, &mut tracker, presenter)
                .await;
        } else {
            self.upload_selection(host, selection, &session, &export_dir, &mut tracker, presenter)
                .await;
        }

        let share_link = session.share_link(self.config.base_url());
        let completion = Completion {
            share_link: share_link.clone(),
            update_available,
            update_url: self.config.update_url.clone(),
            failed_artboards: tracker.failed_artboards(),
        };

        if !presenter.copy_link(&share_link) {
            log::warn!("Share link was not copied to the clipboard: {}", share_link);
        }
        presenter.present_completion(&completion);

        let (results, skipped) = tracker.finish();
        Ok(RunSummary {
            session_id: session.id,
            share_link,
            results,
            skipped,
            update_available,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn upload_selection(
        &self,
        host: &mut dyn HostDocument,
        selection: &[SelectionItem],
        session: &Session,
        export_dir: &Path,
        tracker: &mut ProgressTracker,
        presenter: &mut dyn ResultPresenter,
    ) {
        let total = selection.len();

        for (i, item) in selection.iter().enumerate() {
            presenter.show_message(&selection_progress_message(i + 1, total));

            match item {
                SelectionItem::Artboard(artboard) => {
                    let result = self
                        .process_artboard(host, artboard, None, session, export_dir)
                        .await;
                    tracker.record(result);
                }
                SelectionItem::Layer { name } => {
                    log::debug!("{}", AppError::unsupported_selection(name));
                    presenter.show_warning(FLOATING_LAYER_WARNING);
                    tracker.record_skipped(name);
                }
            }
        }
    }

    async fn upload_all_pages(
        &self,
        host: &mut dyn HostDocument,
        session: &Session,
        export_dir: &Path,
        tracker: &mut ProgressTracker,
        presenter: &mut dyn ResultPresenter,
    ) {
        let pages = host.list_pages();
        let page_count = pages.len();

        for (page_index, page) in pages.iter().enumerate() {
            let artboards = host.artboards_of(page);
            if artboards.is_empty() {
                log::debug!("Page '{}' has no artboards", page.name);
                continue;
            }

            let total = artboards.len();
            for (i, artboard) in artboards.iter().enumerate() {
                presenter.show_message(&page_progress_message(
                    i + 1,
                    total,
                    page_index + 1,
                    page_count,
                ));

                let result = self
                    .process_artboard(host, artboard, Some(page), session, export_dir)
                    .await;
                tracker.record(result);
            }
        }
    }

    /// Export then upload one artboard. `owning_page` is made current first when given.
    async fn process_artboard(
        &self,
        host: &mut dyn HostDocument,
        artboard: &ArtboardRef,
        owning_page: Option<&PageRef>,
        session: &Session,
        export_dir: &Path,
    ) -> UploadResult {
        let filename = InputValidator::artboard_filename(&artboard.name);
        let target = ArtboardTarget {
            name: artboard.name.clone(),
            source_page: artboard.page_index,
            export_path: export_dir.join(&filename),
        };

        let failed = |stage: FailureStage, error: AppError| UploadResult {
            artboard_name: target.name.clone(),
            filename: filename.clone(),
            outcome: UploadOutcome::Failed {
                stage,
                error: error.to_string(),
            },
        };

        if let Some(page) = owning_page {
            if let Err(e) = host.set_current_page(page) {
                return failed(FailureStage::Export, e);
            }
        }

        log::debug!(
            "Exporting '{}' from page {} to {}",
            target.name,
            target.source_page + 1,
            target.export_path.display()
        );
        if let Err(e) = host.export_artboard(artboard, &target.export_path) {
            return failed(FailureStage::Export, e);
        }

        match self
            .upload_client
            .upload(&target.export_path, &filename, &session.id)
            .await
        {
            Ok(ack) => UploadResult {
                artboard_name: target.name.clone(),
                filename: filename.clone(),
                outcome: UploadOutcome::Uploaded(ack),
            },
            Err(e @ AppError::InvalidExportFile { .. }) => failed(FailureStage::Export, e),
            Err(e) => failed(FailureStage::Upload, e),
        }
    }
}
