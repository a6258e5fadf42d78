//! Session configuration.
//!
//! Everything has a compiled-in default. The core never reads a config file;
//! front ends may call [`PreviewConfig::from_env`] to apply `VPREVIEW_*`
//! overrides.

use std::time::Duration;

use crate::geometry::Size;
use crate::host::locator::LocatorConfig;
use crate::host::positioner::PlacementConfig;
use crate::viewport::ZoomBounds;

/// Delay between a new selection and the preview appearing.
const DEFAULT_SHOW_DELAY_MS: u64 = 600;
/// Delay between losing the selection and the preview closing.
const DEFAULT_CLOSE_DELAY_MS: u64 = 500;
/// Longest side of exported rasters, matching the host export pixel size.
const DEFAULT_MAX_PIXEL_DIMENSION: u32 = 1200;
const DEFAULT_WINDOW_WIDTH: i32 = 850;
const DEFAULT_WINDOW_HEIGHT: i32 = 700;
/// The preview window never shrinks below this.
pub const MIN_WINDOW_SIZE: Size = Size::new(320, 240);

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub show_delay: Duration,
    pub close_delay: Duration,
    pub zoom: ZoomBounds,
    pub window_size: Size,
    pub max_pixel_dimension: u32,
    pub locator: LocatorConfig,
    pub placement: PlacementConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(DEFAULT_SHOW_DELAY_MS),
            close_delay: Duration::from_millis(DEFAULT_CLOSE_DELAY_MS),
            zoom: ZoomBounds::default(),
            window_size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            max_pixel_dimension: DEFAULT_MAX_PIXEL_DIMENSION,
            locator: LocatorConfig::default(),
            placement: PlacementConfig::default(),
        }
    }
}

impl PreviewConfig {
    /// Defaults with `VPREVIEW_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are
    /// ignored and the existing setting is kept.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(delay) = lookup("VPREVIEW_SHOW_DELAY_MS").and_then(|v| parse_millis(&v)) {
            self.show_delay = delay;
        }
        if let Some(delay) = lookup("VPREVIEW_CLOSE_DELAY_MS").and_then(|v| parse_millis(&v)) {
            self.close_delay = delay;
        }
        if let Some(px) = lookup("VPREVIEW_MAX_PIXELS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
        {
            self.max_pixel_dimension = px;
        }
        if let Some(label) = lookup("VPREVIEW_PANEL_LABEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            self.locator.panel_labels = vec![label];
        }
        if let Some(size) = lookup("VPREVIEW_WINDOW_SIZE").and_then(|v| parse_size(&v)) {
            self.window_size = size;
        }
        self
    }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_millis)
}

/// Parse `WIDTHxHEIGHT`, rejecting sizes below [`MIN_WINDOW_SIZE`].
fn parse_size(value: &str) -> Option<Size> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let size = Size::new(w.trim().parse().ok()?, h.trim().parse().ok()?);
    (size.width >= MIN_WINDOW_SIZE.width && size.height >= MIN_WINDOW_SIZE.height).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::default();
        assert_eq!(config.show_delay, Duration::from_millis(600));
        assert_eq!(config.close_delay, Duration::from_millis(500));
        assert_eq!(config.max_pixel_dimension, 1200);
        assert_eq!(config.zoom.min, 0.1);
        assert_eq!(config.zoom.max, 10.0);
    }

    #[test]
    fn test_overrides_applied() {
        let config = PreviewConfig::default().with_overrides(lookup(&[
            ("VPREVIEW_SHOW_DELAY_MS", "800"),
            ("VPREVIEW_CLOSE_DELAY_MS", " 250 "),
            ("VPREVIEW_PANEL_LABEL", "Browser"),
            ("VPREVIEW_WINDOW_SIZE", "480x400"),
            ("VPREVIEW_MAX_PIXELS", "2048"),
        ]));
        assert_eq!(config.show_delay, Duration::from_millis(800));
        assert_eq!(config.close_delay, Duration::from_millis(250));
        assert_eq!(config.locator.panel_labels, vec!["Browser".to_string()]);
        assert_eq!(config.window_size, Size::new(480, 400));
        assert_eq!(config.max_pixel_dimension, 2048);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let config = PreviewConfig::default().with_overrides(lookup(&[
            ("VPREVIEW_SHOW_DELAY_MS", "soon"),
            ("VPREVIEW_MAX_PIXELS", "0"),
            ("VPREVIEW_WINDOW_SIZE", "10x10"),
            ("VPREVIEW_PANEL_LABEL", "   "),
        ]));
        let defaults = PreviewConfig::default();
        assert_eq!(config.show_delay, defaults.show_delay);
        assert_eq!(config.max_pixel_dimension, defaults.max_pixel_dimension);
        assert_eq!(config.window_size, defaults.window_size);
        assert_eq!(config.locator.panel_labels, defaults.locator.panel_labels);
    }
}
