use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

use super::{ArtboardRef, HostDocument, PageRef, SelectionItem};

const ARTBOARD_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

#[derive(Debug)]
struct DirectoryPage {
    name: String,
    artboards: Vec<(ArtboardRef, PathBuf)>,
}

/// A document stored on disk: each subdirectory of the root is a page and
/// each image inside a page is an artboard. Pages and artboards are ordered
/// by name.
#[derive(Debug)]
pub struct DirectoryDocument {
    root: PathBuf,
    pages: Vec<DirectoryPage>,
    current_page: Option<usize>,
}

impl DirectoryDocument {
    pub fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(AppError::validation(
                "document",
                &format!("{} is not a directory", root.display()),
            ));
        }

        let mut page_dirs: Vec<PathBuf> = fs::read_dir(&root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        page_dirs.sort();

        let mut pages = Vec::with_capacity(page_dirs.len());
        for (page_index, page_dir) in page_dirs.iter().enumerate() {
            let page_name = file_name_of(page_dir);

            let mut images: Vec<PathBuf> = fs::read_dir(page_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && is_artboard_file(path))
                .collect();
            images.sort();

            let artboards = images
                .into_iter()
                .map(|path| {
                    let name = path
                        .file_stem()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    let artboard = ArtboardRef {
                        id: format!("{}/{}", page_name, file_name_of(&path)),
                        name,
                        page_index,
                    };
                    (artboard, path)
                })
                .collect::<Vec<_>>();

            log::debug!(
                "Found page '{}' with {} artboards",
                page_name,
                artboards.len()
            );

            pages.push(DirectoryPage {
                name: page_name,
                artboards,
            });
        }

        log::info!(
            "Opened document {} with {} pages",
            root.display(),
            pages.len()
        );

        Ok(Self {
            root,
            pages,
            current_page: None,
        })
    }

    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    /// Map paths relative to the document root onto selection items.
    /// Anything that is not an artboard image becomes a plain layer.
    pub fn resolve_selection(&self, selected: &[String]) -> Vec<SelectionItem> {
        selected
            .iter()
            .map(|item| {
                let wanted = self.root.join(item);
                self.pages
                    .iter()
                    .flat_map(|page| page.artboards.iter())
                    .find(|(_, path)| *path == wanted)
                    .map(|(artboard, _)| SelectionItem::Artboard(artboard.clone()))
                    .unwrap_or_else(|| SelectionItem::Layer { name: item.clone() })
            })
            .collect()
    }

    fn source_of(&self, artboard: &ArtboardRef) -> Option<&Path> {
        self.pages
            .get(artboard.page_index)?
            .artboards
            .iter()
            .find(|(candidate, _)| candidate.id == artboard.id)
            .map(|(_, path)| path.as_path())
    }
}

impl HostDocument for DirectoryDocument {
    fn list_pages(&self) -> Vec<PageRef> {
        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| PageRef {
                index,
                name: page.name.clone(),
            })
            .collect()
    }

    fn artboards_of(&self, page: &PageRef) -> Vec<ArtboardRef> {
        self.pages
            .get(page.index)
            .map(|p| p.artboards.iter().map(|(a, _)| a.clone()).collect())
            .unwrap_or_default()
    }

    fn set_current_page(&mut self, page: &PageRef) -> AppResult<()> {
        if page.index >= self.pages.len() {
            return Err(AppError::validation(
                "page",
                &format!("Page {} does not exist", page.index + 1),
            ));
        }
        self.current_page = Some(page.index);
        Ok(())
    }

    fn export_artboard(&mut self, artboard: &ArtboardRef, path: &Path) -> AppResult<()> {
        let source = self
            .source_of(artboard)
            .ok_or_else(|| AppError::export(&artboard.name, "artboard is not in this document"))?
            .to_path_buf();

        let img = image::open(&source)
            .map_err(|e| AppError::export(&artboard.name, e.to_string()))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| AppError::export(&artboard.name, e.to_string()))?;

        log::debug!(
            "Exported {} ({}x{}) to {}",
            source.display(),
            img.width(),
            img.height(),
            path.display()
        );
        Ok(())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn is_artboard_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ARTBOARD_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(path: &Path) {
        image::RgbImage::from_pixel(4, 3, image::Rgb([200, 40, 40]))
            .save(path)
            .unwrap();
    }

    fn sample_document() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("1 Cover");
        let flows = dir.path().join("2 Flows");
        let empty = dir.path().join("3 Empty");
        fs::create_dir_all(&cover).unwrap();
        fs::create_dir_all(&flows).unwrap();
        fs::create_dir_all(&empty).unwrap();

        write_image(&cover.join("Hero Shot.png"));
        write_image(&flows.join("Checkout.png"));
        write_image(&flows.join("Account.jpg"));
        fs::write(flows.join("notes.txt"), "not an artboard").unwrap();
        dir
    }

    #[test]
    fn test_pages_and_artboards_are_ordered() {
        let dir = sample_document();
        let doc = DirectoryDocument::open(dir.path()).unwrap();

        let pages = doc.list_pages();
        let names: Vec<_> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["1 Cover", "2 Flows", "3 Empty"]);

        let flows: Vec<_> = doc
            .artboards_of(&pages[1])
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(flows, vec!["Account", "Checkout"]);
        assert!(doc.artboards_of(&pages[2]).is_empty());
    }

    #[test]
    fn test_export_writes_png() {
        let dir = sample_document();
        let out = tempfile::tempdir().unwrap();
        let mut doc = DirectoryDocument::open(dir.path()).unwrap();

        let pages = doc.list_pages();
        let account = doc.artboards_of(&pages[1]).remove(0);
        doc.set_current_page(&pages[1]).unwrap();

        let target = out.path().join("account.png");
        doc.export_artboard(&account, &target).unwrap();

        let exported = image::open(&target).unwrap();
        assert_eq!((exported.width(), exported.height()), (4, 3));
        assert_eq!(doc.current_page(), Some(1));
    }

    #[test]
    fn test_resolve_selection_marks_non_artboards() {
        let dir = sample_document();
        let doc = DirectoryDocument::open(dir.path()).unwrap();

        let selection = doc.resolve_selection(&[
            "1 Cover/Hero Shot.png".to_string(),
            "2 Flows/notes.txt".to_string(),
            "2 Flows".to_string(),
        ]);

        assert!(matches!(&selection[0], SelectionItem::Artboard(a) if a.name == "Hero Shot"));
        assert_eq!(
            selection[1],
            SelectionItem::Layer {
                name: "2 Flows/notes.txt".to_string()
            }
        );
        assert_eq!(selection[2].name(), "2 Flows");
    }

    #[test]
    fn test_open_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryDocument::open(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_set_current_page_rejects_unknown_page() {
        let dir = sample_document();
        let mut doc = DirectoryDocument::open(dir.path()).unwrap();
        let ghost = PageRef {
            index: 9,
            name: "Ghost".to_string(),
        };
        assert!(doc.set_current_page(&ghost).is_err());
    }
}
