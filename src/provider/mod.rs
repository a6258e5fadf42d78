//! Host document boundary.
//!
//! This module provides:
//! - `SelectionSource` - what the host reports as selected, and what it is
//! - `ImageProvider` - rasterizes a view for the preview
//! - `ViewCatalog` - a directory of exported view images implementing both

pub mod catalog;

use std::fmt;

use image::imageops::{self, FilterType};

use crate::error::ExportError;
use crate::viewport::Raster;

pub use catalog::ViewCatalog;

/// Identifier of a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub i64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse element classification reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    View,
    Sheet,
    Schedule,
    Other,
    NotFound,
}

impl ElementKind {
    /// Kinds the preview reacts to. Schedules are included so the user gets
    /// a "not available" message instead of silence.
    pub fn is_previewable(self) -> bool {
        matches!(self, Self::View | Self::Sheet | Self::Schedule)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Sheet => "Sheet",
            Self::Schedule => "Schedule",
            Self::Other => "Other",
            Self::NotFound => "Not found",
        }
    }
}

/// Display text for an element: its name and its host type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLabel {
    pub name: String,
    pub type_name: String,
}

/// The host's selection API.
pub trait SelectionSource {
    fn selected_ids(&self) -> Vec<ElementId>;
    fn element_kind(&self, id: ElementId) -> ElementKind;
    fn element_label(&self, id: ElementId) -> Option<ElementLabel>;
}

/// Produces a raster of a view, no larger than `max_pixel_dimension` on its
/// longest side.
///
/// Implementations are called synchronously from the session tick and must
/// return within a bounded time. Repeated calls for the same id are allowed.
pub trait ImageProvider {
    fn export_view_image(
        &mut self,
        id: ElementId,
        max_pixel_dimension: u32,
    ) -> Result<Raster, ExportError>;
}

impl<F> ImageProvider for F
where
    F: FnMut(ElementId, u32) -> Result<Raster, ExportError>,
{
    fn export_view_image(
        &mut self,
        id: ElementId,
        max_pixel_dimension: u32,
    ) -> Result<Raster, ExportError> {
        self(id, max_pixel_dimension)
    }
}

/// Shrink `image` so its longest side is at most `max_side`. Smaller images
/// are returned untouched.
pub fn fit_within(image: Raster, max_side: u32) -> Raster {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if max_side == 0 || longest <= max_side {
        return image;
    }
    let scale = max_side as f64 / longest as f64;
    let new_w = ((width as f64 * scale).round() as u32).max(1);
    let new_h = ((height as f64 * scale).round() as u32).max(1);
    imageops::resize(&image, new_w, new_h, FilterType::CatmullRom)
}
