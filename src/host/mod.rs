// Host document model - the pages and artboards the uploader walks
//
// The host application owns rendering; the uploader only needs these four capabilities

pub mod directory;

use std::path::Path;

use crate::errors::AppResult;

pub use directory::DirectoryDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtboardRef {
    pub id: String,
    pub name: String,
    pub page_index: usize,
}

/// One member of the user's selection. Only artboards can be shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionItem {
    Artboard(ArtboardRef),
    Layer { name: String },
}

impl SelectionItem {
    pub fn name(&self) -> &str {
        match self {
            SelectionItem::Artboard(artboard) => &artboard.name,
            SelectionItem::Layer { name } => name,
        }
    }
}

pub trait HostDocument {
    fn list_pages(&self) -> Vec<PageRef>;

    fn artboards_of(&self, page: &PageRef) -> Vec<ArtboardRef>;

    /// Exports only render correctly while the owning page is current.
    fn set_current_page(&mut self, page: &PageRef) -> AppResult<()>;

    /// Render the artboard as a PNG at `path`.
    fn export_artboard(&mut self, artboard: &ArtboardRef, path: &Path) -> AppResult<()>;
}
