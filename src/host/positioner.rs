//! Placement of the preview window on the desktop.

use crate::geometry::{Point, Rect, Size};

use super::{ScreenLayout, WindowGeometry};

/// Offsets used when placing the preview window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Gap between the preview and the reference panel.
    pub gap: i32,
    /// Fine-tune offset aligning the preview with the panel's content edge.
    pub nudge: Point,
    /// Minimum distance from the host window's left edge when squeezed.
    pub host_margin: i32,
    /// Horizontal distance between cursor and preview.
    pub cursor_offset: i32,
    /// Assumed panel width when only the host window is known.
    pub assumed_panel_width: i32,
    /// Distance below the host window's top edge when only the host is known.
    pub host_top_offset: i32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 10,
            nudge: Point::new(-5, 3),
            host_margin: 50,
            cursor_offset: 20,
            assumed_panel_width: 400,
            host_top_offset: 150,
        }
    }
}

/// Inputs of one placement computation. Everything is optional except the
/// window size; the positioner uses the best information available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    pub window_size: Size,
    /// The reference panel found by the locator.
    pub reference: Option<WindowGeometry>,
    /// The host's top-level window.
    pub host: Option<Rect>,
    pub cursor: Option<Point>,
}

impl PlacementRequest {
    pub fn new(window_size: Size) -> Self {
        Self {
            window_size,
            reference: None,
            host: None,
            cursor: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowPositioner {
    config: PlacementConfig,
}

impl WindowPositioner {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Top-left corner for the preview window.
    ///
    /// Preference order: beside the reference panel, next to the cursor,
    /// inside the host window. The result is clamped into the working area
    /// of the screen used; without any screen the result is `(0, 0)`.
    pub fn compute_placement(&self, request: &PlacementRequest, screens: &ScreenLayout) -> Point {
        let size = request.window_size;

        if let Some(reference) = request.reference {
            if let Some(screen) = screens.from_rect(&reference.rect) {
                let x = self.beside_reference(&reference.rect, request.host.as_ref(), size, &screen.work_area);
                let y = reference.rect.top + self.config.nudge.y;
                return clamp_into(Point::new(x, y), size, &screen.work_area);
            }
        }

        if let Some(cursor) = request.cursor {
            if let Some(screen) = screens.from_point(cursor) {
                let work = &screen.work_area;
                let mut x = cursor.x + self.config.cursor_offset;
                if x + size.width > work.right {
                    x = cursor.x - size.width - self.config.cursor_offset;
                }
                let y = cursor.y - size.height / 2;
                return clamp_into(Point::new(x, y), size, work);
            }
        }

        if let Some(host) = request.host {
            if let Some(screen) = screens.from_rect(&host) {
                let cfg = &self.config;
                let mut x = host.right - cfg.assumed_panel_width - size.width - cfg.cursor_offset
                    + cfg.nudge.x;
                if x < host.left + cfg.host_margin {
                    x = host.left + cfg.host_margin;
                }
                let y = host.top + cfg.host_top_offset + cfg.nudge.y;
                return clamp_into(Point::new(x, y), size, &screen.work_area);
            }
        }

        Point::default()
    }

    /// Horizontal position next to the panel: left of it if that fits, else
    /// right of it, else squeezed left with a margin from the host edge.
    fn beside_reference(&self, panel: &Rect, host: Option<&Rect>, size: Size, work: &Rect) -> i32 {
        let cfg = &self.config;
        let left_of = panel.left - size.width - cfg.gap + cfg.nudge.x;
        if left_of >= work.left {
            return left_of;
        }

        let right_of = panel.right + cfg.gap + cfg.nudge.x;
        if right_of + size.width <= work.right {
            return right_of;
        }

        let anchor_left = host.map_or(panel.left, |h| h.left);
        left_of.max(anchor_left + cfg.host_margin)
    }
}

/// Keep the whole window inside `work`, favoring the top-left corner when the
/// window is larger than the working area.
fn clamp_into(point: Point, size: Size, work: &Rect) -> Point {
    let x = point.x.min(work.right - size.width).max(work.left);
    let y = point.y.min(work.bottom - size.height).max(work.top);
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Screen, WindowHandle};

    const WINDOW: Size = Size::new(850, 700);

    fn screens() -> ScreenLayout {
        ScreenLayout::single(Screen::new(
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1040),
        ))
    }

    fn panel(rect: Rect) -> Option<WindowGeometry> {
        Some(WindowGeometry {
            handle: WindowHandle(7),
            rect,
        })
    }

    #[test]
    fn test_left_of_reference_panel() {
        let request = PlacementRequest {
            reference: panel(Rect::new(1600, 150, 1920, 1000)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &screens());
        assert_eq!(p, Point::new(1600 - 850 - 10 - 5, 153));
    }

    #[test]
    fn test_right_side_fallback_when_left_is_offscreen() {
        let reference = Rect::new(300, 100, 600, 900);
        assert!(reference.left - WINDOW.width - 10 < 0);
        let request = PlacementRequest {
            reference: panel(reference),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &screens());
        assert_eq!(p.x, 600 + 10 - 5);
        assert!(p.x >= 0 && p.x <= 1920 - WINDOW.width);
    }

    #[test]
    fn test_squeezed_placement_uses_host_margin() {
        // Neither side of a centered panel fits an 850px window on a 1280px screen.
        let layout = ScreenLayout::single(Screen::full(Rect::new(0, 0, 1280, 1024)));
        let request = PlacementRequest {
            reference: panel(Rect::new(400, 100, 800, 900)),
            host: Some(Rect::new(0, 0, 1280, 1024)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &layout);
        assert_eq!(p.x, 50);
        assert!(p.x + WINDOW.width <= 1280);
    }

    #[test]
    fn test_y_clamped_to_work_area() {
        let request = PlacementRequest {
            reference: panel(Rect::new(1600, 900, 1920, 1400)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &screens());
        assert_eq!(p.y, 1040 - 700);
    }

    #[test]
    fn test_cursor_placement_mirrors_at_right_edge() {
        let positioner = WindowPositioner::default();
        let near_left = PlacementRequest {
            cursor: Some(Point::new(200, 500)),
            ..PlacementRequest::new(WINDOW)
        };
        assert_eq!(
            positioner.compute_placement(&near_left, &screens()),
            Point::new(220, 150)
        );

        let near_right = PlacementRequest {
            cursor: Some(Point::new(1500, 100)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = positioner.compute_placement(&near_right, &screens());
        assert_eq!(p, Point::new(1500 - 850 - 20, 0));
    }

    #[test]
    fn test_host_only_placement() {
        let request = PlacementRequest {
            host: Some(Rect::new(0, 0, 1920, 1040)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &screens());
        assert_eq!(p, Point::new(1920 - 400 - 850 - 20 - 5, 153));
    }

    #[test]
    fn test_no_screens_yields_origin() {
        let request = PlacementRequest {
            reference: panel(Rect::new(1600, 150, 1920, 1000)),
            cursor: Some(Point::new(10, 10)),
            ..PlacementRequest::new(WINDOW)
        };
        let p = WindowPositioner::default().compute_placement(&request, &ScreenLayout::default());
        assert_eq!(p, Point::default());
    }

    #[test]
    fn test_placement_always_on_screen() {
        let positioner = WindowPositioner::default();
        let layout = screens();
        for left in (-400..2400).step_by(97) {
            for top in (-300..1400).step_by(113) {
                let request = PlacementRequest {
                    reference: panel(Rect::new(left, top, left + 320, top + 800)),
                    ..PlacementRequest::new(WINDOW)
                };
                let p = positioner.compute_placement(&request, &layout);
                assert!(p.x >= 0 && p.x <= 1920 - WINDOW.width, "x={} for left={left}", p.x);
                assert!(p.y >= 0 && p.y <= 1040 - WINDOW.height, "y={} for top={top}", p.y);
            }
        }
    }
}
