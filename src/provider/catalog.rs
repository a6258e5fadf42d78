//! Directory-backed view catalog.
//!
//! Each file in the directory stands for one host view that has already been
//! exported to an image. The element kind is derived from the file name
//! (`*schedule*` -> Schedule, `*sheet*` -> Sheet, other images -> View), so a
//! folder of exports can stand in for a live host document.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat};
use tracing::{debug, info};

use super::{fit_within, ElementId, ElementKind, ElementLabel, ImageProvider, SelectionSource};
use crate::error::ExportError;
use crate::viewport::Raster;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Message shown for views the exporter cannot rasterize.
pub const UNSUPPORTED_VIEW_TYPE: &str = "unsupported view type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: ElementId,
    pub path: PathBuf,
    pub name: String,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    entries: Vec<CatalogEntry>,
}

impl ViewCatalog {
    /// Scan `dir` (non-recursively). Hidden files are skipped; entries are
    /// sorted by file name and numbered from 1.
    pub fn scan(dir: &Path) -> Result<Self> {
        let read = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read view directory: {:?}", dir))?;

        let mut paths: Vec<PathBuf> = read
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.'))
            })
            .collect();
        paths.sort();

        let entries: Vec<CatalogEntry> = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let kind = classify(&path);
                CatalogEntry {
                    id: ElementId(index as i64 + 1),
                    path,
                    name,
                    kind,
                }
            })
            .collect();

        info!(?dir, count = entries.len(), "Scanned view catalog");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: ElementId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// A selection over this catalog, as the host would report it.
    pub fn selection(&self, selected: Vec<ElementId>) -> CatalogSelection<'_> {
        CatalogSelection {
            catalog: self,
            selected,
        }
    }
}

fn classify(path: &Path) -> ElementKind {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

    if stem.contains("schedule") {
        ElementKind::Schedule
    } else if !is_image {
        ElementKind::Other
    } else if stem.contains("sheet") {
        ElementKind::Sheet
    } else {
        ElementKind::View
    }
}

impl ImageProvider for ViewCatalog {
    fn export_view_image(
        &mut self,
        id: ElementId,
        max_pixel_dimension: u32,
    ) -> Result<Raster, ExportError> {
        let entry = self
            .get(id)
            .ok_or_else(|| ExportError::Failed(format!("view {id} does not exist")))?;

        match entry.kind {
            ElementKind::Schedule => {
                return Err(ExportError::Unsupported(UNSUPPORTED_VIEW_TYPE.to_string()))
            }
            ElementKind::Other | ElementKind::NotFound => {
                return Err(ExportError::Unsupported(format!(
                    "{} is not a view",
                    entry.name
                )))
            }
            ElementKind::View | ElementKind::Sheet => {}
        }

        debug!(%id, path = ?entry.path, "Loading exported view image");
        let image = open_image(&entry.path).map_err(|err| ExportError::Failed(format!("{err:#}")))?;
        let raster = image.to_rgba8();
        if raster.width() == 0 || raster.height() == 0 {
            return Err(ExportError::Empty);
        }
        Ok(fit_within(raster, max_pixel_dimension))
    }
}

/// Decode an image file; animated GIFs yield their first frame.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.context("Failed to decode GIF frame")?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(anyhow!("GIF has no frames: {:?}", path));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// A fixed set of selected catalog entries.
#[derive(Debug, Clone)]
pub struct CatalogSelection<'a> {
    catalog: &'a ViewCatalog,
    selected: Vec<ElementId>,
}

impl SelectionSource for CatalogSelection<'_> {
    fn selected_ids(&self) -> Vec<ElementId> {
        self.selected.clone()
    }

    fn element_kind(&self, id: ElementId) -> ElementKind {
        self.catalog
            .get(id)
            .map_or(ElementKind::NotFound, |e| e.kind)
    }

    fn element_label(&self, id: ElementId) -> Option<ElementLabel> {
        self.catalog.get(id).map(|e| ElementLabel {
            name: e.name.clone(),
            type_name: e.kind.label().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "Level 1.png", 2400, 1600);
        write_png(dir.path(), "A101 Sheet.png", 300, 200);
        write_png(dir.path(), "Door Schedule.png", 50, 50);
        std::fs::write(dir.path().join("notes.txt"), "not a view").unwrap();
        std::fs::write(dir.path().join(".hidden.png"), "skip me").unwrap();
        dir
    }

    #[test]
    fn test_scan_classifies_and_numbers_entries() {
        let dir = sample_dir();
        let catalog = ViewCatalog::scan(dir.path()).unwrap();
        let summary: Vec<(i64, &str, ElementKind)> = catalog
            .entries()
            .iter()
            .map(|e| (e.id.0, e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "A101 Sheet", ElementKind::Sheet),
                (2, "Door Schedule", ElementKind::Schedule),
                (3, "Level 1", ElementKind::View),
                (4, "notes", ElementKind::Other),
            ]
        );
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewCatalog::scan(&dir.path().join("missing")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read view directory"));
    }

    #[test]
    fn test_export_downscales_to_max_dimension() {
        let dir = sample_dir();
        let mut catalog = ViewCatalog::scan(dir.path()).unwrap();
        let raster = catalog.export_view_image(ElementId(3), 1200).unwrap();
        assert_eq!(raster.dimensions(), (1200, 800));
    }

    #[test]
    fn test_export_schedule_is_unsupported() {
        let dir = sample_dir();
        let mut catalog = ViewCatalog::scan(dir.path()).unwrap();
        let err = catalog.export_view_image(ElementId(2), 1200).unwrap_err();
        assert!(matches!(err, ExportError::Unsupported(ref m) if m == UNSUPPORTED_VIEW_TYPE));
    }

    #[test]
    fn test_export_unknown_or_corrupt_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not really a png").unwrap();
        let mut catalog = ViewCatalog::scan(dir.path()).unwrap();

        assert!(matches!(
            catalog.export_view_image(ElementId(1), 1200),
            Err(ExportError::Failed(_))
        ));
        assert!(matches!(
            catalog.export_view_image(ElementId(99), 1200),
            Err(ExportError::Failed(_))
        ));
    }

    #[test]
    fn test_selection_reports_kinds_and_labels() {
        let dir = sample_dir();
        let catalog = ViewCatalog::scan(dir.path()).unwrap();
        let selection = catalog.selection(vec![ElementId(3)]);
        assert_eq!(selection.selected_ids(), vec![ElementId(3)]);
        assert_eq!(selection.element_kind(ElementId(3)), ElementKind::View);
        assert_eq!(selection.element_kind(ElementId(42)), ElementKind::NotFound);
        let label = selection.element_label(ElementId(1)).unwrap();
        assert_eq!(label.name, "A101 Sheet");
        assert_eq!(label.type_name, "Sheet");
    }
}
