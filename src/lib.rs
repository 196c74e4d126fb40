//! Export design artboards to PNG and upload them to a share service,
//! returning one link that shows the whole set.

pub mod config;
pub mod errors;
pub mod host;
pub mod presenter;
pub mod security;
pub mod uploader;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use host::{ArtboardRef, DirectoryDocument, HostDocument, PageRef, SelectionItem};
pub use presenter::{Completion, DesktopPresenter, ResultPresenter};
pub use uploader::{RunSummary, UploadOrchestrator};
