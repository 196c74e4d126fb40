use std::path::PathBuf;

use artboard_share_uploader::{config, DesktopPresenter, DirectoryDocument, UploadOrchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Artboard Share Uploader");

    let config = config::load_config()?;

    // DOCUMENT_DIR [SELECTED_ITEM...]
    let mut args = std::env::args().skip(1);
    let document_root = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let selected: Vec<String> = args.collect();

    let mut document = DirectoryDocument::open(&document_root)?;
    let selection = document.resolve_selection(&selected);

    let mut presenter = DesktopPresenter::new(&config);
    let orchestrator = UploadOrchestrator::new(config)?;

    let summary = orchestrator
        .run(&mut document, &selection, &mut presenter)
        .await?;

    log::info!(
        "Shared {} of {} artboards at {} in {} ms",
        summary.uploaded_count(),
        summary.results.len(),
        summary.share_link,
        (summary.finished_at - summary.started_at).num_milliseconds()
    );

    Ok(())
}
