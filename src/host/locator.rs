//! Best-effort search for the host's navigation panel.
//!
//! The host exposes no API for the panel's location, so the locator looks at
//! window titles first and falls back to the shape of a narrow docked side
//! panel. Thresholds lean toward precision: a miss only costs the default
//! placement, a false hit would cover the host's drawing area.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::{PreviewError, Result};
use crate::geometry::Rect;

use super::{descendants, ScreenLayout, WindowGeometry, WindowHandle, WindowTree};

/// Heuristic thresholds. Tuned against one host UI skin; treat as defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    /// Title fragments identifying the panel, matched case-insensitively.
    pub panel_labels: Vec<String>,
    /// How many levels below the root the title pass looks at.
    pub title_search_depth: usize,
    /// Exclusive width range of a panel-shaped window.
    pub min_width: i32,
    pub max_width: i32,
    /// Panel-shaped windows are strictly taller than this.
    pub min_height: i32,
    /// The panel's right edge must lie within this distance of its screen's
    /// working-area right edge.
    pub edge_proximity: i32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            panel_labels: vec!["Project Browser".to_string()],
            title_search_depth: 1,
            min_width: 250,
            max_width: 600,
            min_height: 400,
            edge_proximity: 600,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HostWindowLocator {
    config: LocatorConfig,
}

impl HostWindowLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Find the reference panel under the host's root window.
    ///
    /// `Err(PreviewError::WindowNotFound)` is an expected outcome; callers
    /// fall back to another placement strategy.
    pub fn locate<T>(&self, tree: &T, screens: &ScreenLayout) -> Result<WindowGeometry>
    where
        T: WindowTree + ?Sized,
    {
        let root = tree.root_window().ok_or(PreviewError::WindowNotFound)?;

        if let Some(found) = self.find_by_title(tree, root) {
            debug!(handle = ?found.handle, rect = ?found.rect, "Reference panel matched by title");
            return Ok(found);
        }

        if let Some(found) = self.find_by_shape(tree, root, screens) {
            debug!(handle = ?found.handle, rect = ?found.rect, "Reference panel matched by shape");
            return Ok(found);
        }

        debug!("Reference panel not found");
        Err(PreviewError::WindowNotFound)
    }

    /// Level-order scan of the root's children (and deeper levels, up to
    /// `title_search_depth`) for a title containing a panel label.
    fn find_by_title<T>(&self, tree: &T, root: WindowHandle) -> Option<WindowGeometry>
    where
        T: WindowTree + ?Sized,
    {
        let labels: Vec<String> = self
            .config
            .panel_labels
            .iter()
            .map(|l| l.to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        if labels.is_empty() || self.config.title_search_depth == 0 {
            return None;
        }

        let mut seen = HashSet::from([root]);
        let mut queue: VecDeque<(WindowHandle, usize)> =
            tree.child_windows(root).into_iter().map(|h| (h, 1)).collect();

        while let Some((handle, depth)) = queue.pop_front() {
            if !seen.insert(handle) {
                continue;
            }
            let title = tree.window_title(handle).to_lowercase();
            trace!(?handle, depth, %title, "Title pass candidate");
            if labels.iter().any(|label| title.contains(label.as_str())) {
                if let Some(rect) = tree.window_rect(handle).filter(|r| !r.is_empty()) {
                    return Some(WindowGeometry { handle, rect });
                }
            }
            if depth < self.config.title_search_depth {
                queue.extend(tree.child_windows(handle).into_iter().map(|h| (h, depth + 1)));
            }
        }
        None
    }

    /// Depth-first scan for the first window shaped like a docked side panel.
    fn find_by_shape<T>(
        &self,
        tree: &T,
        root: WindowHandle,
        screens: &ScreenLayout,
    ) -> Option<WindowGeometry>
    where
        T: WindowTree + ?Sized,
    {
        descendants(tree, root).into_iter().find_map(|handle| {
            let rect = tree.window_rect(handle)?;
            self.is_panel_shaped(&rect, screens)
                .then_some(WindowGeometry { handle, rect })
        })
    }

    /// Narrow, tall, and hugging the right side of its screen.
    pub fn is_panel_shaped(&self, rect: &Rect, screens: &ScreenLayout) -> bool {
        let cfg = &self.config;
        let (width, height) = (rect.width(), rect.height());
        if width <= cfg.min_width || width >= cfg.max_width || height <= cfg.min_height {
            return false;
        }
        screens
            .from_rect(rect)
            .is_some_and(|screen| rect.right > screen.work_area.right - cfg.edge_proximity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::snapshot::WindowSnapshot;
    use crate::host::Screen;

    fn screens() -> ScreenLayout {
        ScreenLayout::single(Screen::new(
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        ))
    }

    fn host() -> WindowSnapshot {
        WindowSnapshot::new("Host - Project1", Rect::new(0, 0, 1920, 1040))
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let mut tree = host();
        let root = tree.root();
        tree.add_child(root, "Ribbon", Rect::new(0, 0, 1920, 150));
        let panel = tree.add_child(root, "PROJECT BROWSER - Project1", Rect::new(1600, 150, 1920, 1000));

        let found = HostWindowLocator::default().locate(&tree, &screens()).unwrap();
        assert_eq!(found.handle, panel);
        assert_eq!(found.rect, Rect::new(1600, 150, 1920, 1000));
    }

    #[test]
    fn test_title_pass_prefers_shallow_match() {
        let mut tree = host();
        let root = tree.root();
        let dock = tree.add_child(root, "Dock", Rect::new(1500, 0, 1920, 1040));
        tree.add_child(dock, "Project Browser (nested)", Rect::new(1500, 0, 1920, 500));
        let shallow = tree.add_child(root, "project browser", Rect::new(1500, 500, 1920, 1040));

        let locator = HostWindowLocator::new(LocatorConfig {
            title_search_depth: 3,
            ..LocatorConfig::default()
        });
        assert_eq!(locator.locate(&tree, &screens()).unwrap().handle, shallow);
    }

    #[test]
    fn test_title_pass_respects_depth() {
        let mut tree = host();
        let root = tree.root();
        let dock = tree.add_child(root, "Dock", Rect::new(0, 0, 100, 100));
        // Only reachable by title below depth 1; its shape does not qualify.
        tree.add_child(dock, "Project Browser", Rect::new(10, 10, 60, 60));

        let result = HostWindowLocator::default().locate(&tree, &screens());
        assert!(matches!(result, Err(PreviewError::WindowNotFound)));
    }

    #[test]
    fn test_shape_fallback_finds_nested_side_panel() {
        let mut tree = host();
        let root = tree.root();
        let frame = tree.add_child(root, "", Rect::new(0, 0, 1920, 1040));
        tree.add_child(frame, "", Rect::new(0, 150, 1500, 1040));
        let docked = tree.add_child(frame, "", Rect::new(1550, 150, 1900, 1000));

        let found = HostWindowLocator::default().locate(&tree, &screens()).unwrap();
        assert_eq!(found.handle, docked);
    }

    #[test]
    fn test_shape_rejects_left_docked_and_wide_windows() {
        let locator = HostWindowLocator::default();
        let layout = screens();
        // Right shape, wrong side of the screen.
        assert!(!locator.is_panel_shaped(&Rect::new(0, 100, 300, 900), &layout));
        // Too wide.
        assert!(!locator.is_panel_shaped(&Rect::new(1200, 100, 1900, 900), &layout));
        // Too short.
        assert!(!locator.is_panel_shaped(&Rect::new(1600, 100, 1900, 400), &layout));
        // Bounds are exclusive.
        assert!(!locator.is_panel_shaped(&Rect::new(1650, 100, 1900, 900), &layout));
        assert!(locator.is_panel_shaped(&Rect::new(1600, 100, 1900, 900), &layout));
    }

    #[test]
    fn test_not_found_without_root_or_candidates() {
        let tree = host();
        let result = HostWindowLocator::default().locate(&tree, &screens());
        assert!(matches!(result, Err(PreviewError::WindowNotFound)));
    }
}
