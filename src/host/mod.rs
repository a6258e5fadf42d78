//! Host desktop boundary: foreign window tree, screens and cursor.
//!
//! - `WindowTree` - read-only view of the host application's windows
//! - `ScreenLayout` - monitors and their working areas
//! - `locator` - finds the reference panel in the window tree
//! - `positioner` - computes where the preview window goes
//! - `snapshot` - an owned, in-memory `WindowTree`

pub mod locator;
pub mod positioner;
pub mod snapshot;

use std::collections::HashSet;

use crate::geometry::{Point, Rect};

/// Opaque identifier of a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

/// Read access to the host application's window hierarchy.
pub trait WindowTree {
    /// The host's top-level window, if it has one.
    fn root_window(&self) -> Option<WindowHandle>;
    /// Direct children of `handle`, in z/enumeration order.
    fn child_windows(&self, handle: WindowHandle) -> Vec<WindowHandle>;
    /// Screen rectangle of `handle`, `None` when the window is gone.
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;
    /// Title/caption text, empty when the window has none.
    fn window_title(&self, handle: WindowHandle) -> String;
}

/// Screen rectangle of a window together with the handle it was measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub handle: WindowHandle,
    pub rect: Rect,
}

/// All descendants of `root` in depth-first pre-order.
///
/// Handles seen twice are skipped, so a malformed foreign tree that reports
/// a window as its own descendant cannot loop.
pub fn descendants<T: WindowTree + ?Sized>(tree: &T, root: WindowHandle) -> Vec<WindowHandle> {
    let mut out = Vec::new();
    let mut seen = HashSet::from([root]);
    let mut stack: Vec<WindowHandle> = tree.child_windows(root).into_iter().rev().collect();

    while let Some(handle) = stack.pop() {
        if !seen.insert(handle) {
            continue;
        }
        out.push(handle);
        stack.extend(tree.child_windows(handle).into_iter().rev());
    }
    out
}

/// One monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub bounds: Rect,
    /// Bounds minus task bars and docks.
    pub work_area: Rect,
}

impl Screen {
    pub fn new(bounds: Rect, work_area: Rect) -> Self {
        Self { bounds, work_area }
    }

    /// A screen whose working area is its whole bounds.
    pub fn full(bounds: Rect) -> Self {
        Self::new(bounds, bounds)
    }
}

/// The set of monitors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    screens: Vec<Screen>,
}

impl ScreenLayout {
    pub fn new(screens: Vec<Screen>) -> Self {
        Self { screens }
    }

    pub fn single(screen: Screen) -> Self {
        Self::new(vec![screen])
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// The screen containing `point`, else the nearest one.
    pub fn from_point(&self, point: Point) -> Option<&Screen> {
        self.screens
            .iter()
            .find(|s| s.bounds.contains(point))
            .or_else(|| {
                self.screens
                    .iter()
                    .min_by_key(|s| s.bounds.distance_squared(point))
            })
    }

    /// The screen sharing the largest area with `rect`, else the one nearest
    /// to its center.
    pub fn from_rect(&self, rect: &Rect) -> Option<&Screen> {
        let best = self
            .screens
            .iter()
            .map(|s| (s, s.bounds.intersection_area(rect)))
            .filter(|(_, area)| *area > 0)
            .max_by_key(|(_, area)| *area)
            .map(|(s, _)| s);
        best.or_else(|| self.from_point(rect.center()))
    }
}

/// Desktop-level facts the session needs besides the window tree.
pub trait Desktop {
    fn screen_layout(&self) -> ScreenLayout;

    /// Current cursor position in screen pixels, if the host reports it.
    fn cursor_position(&self) -> Option<Point> {
        None
    }
}
