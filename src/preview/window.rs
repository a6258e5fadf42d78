// Preview window model
// Toolkit-independent: front ends forward pointer events in window-local and
// screen coordinates and draw what this model reports.
//
// Layout (window-local pixels):
// - Header band: title, type text, close box in the top-right corner; drag to move
// - Content area: the viewport (wheel zoom, drag pan, double-click fit)
// - Status band: zoom level and hints

use kurbo::Vec2;
use tracing::{debug, warn};

use super::content::{PreviewBody, PreviewContent};
use crate::config::MIN_WINDOW_SIZE;
use crate::geometry::{Point, Rect, Size};
use crate::viewport::{Raster, Viewport, ZoomBounds};

pub const HEADER_HEIGHT: i32 = 80;
pub const STATUS_HEIGHT: i32 = 30;
pub const CLOSE_BUTTON_SIZE: i32 = 30;

const DEFAULT_TITLE: &str = "Select a view in Project Browser";
const DEFAULT_SUBTYPE: &str = "Click on views to see preview";
const STATUS_READY: &str = "Ready - Select a view to preview";
const STATUS_LOADING: &str = "Generating preview...";
const STATUS_LOADED: &str = "Preview loaded - Scroll to zoom, double-click to fit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowingKind {
    Image,
    Placeholder,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Hidden,
    Loading,
    Showing(ShowingKind),
    /// Terminal: resources released, no further transitions.
    Closed,
}

/// Which part of the window a window-local point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Chrome,
    CloseButton,
    Content,
    StatusBar,
    Outside,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    cursor_start: Point,
    window_start: Point,
}

#[derive(Debug)]
pub struct PreviewWindow {
    state: WindowState,
    viewport: Viewport,
    title: String,
    subtype: String,
    message: Option<String>,
    position: Point,
    size: Size,
    drag: Option<DragState>,
    /// Last content-local pointer position while panning.
    pan_last: Option<kurbo::Point>,
    /// Zoomed or panned since the last fit; suppresses refit on resize.
    user_adjusted: bool,
    /// Bumped whenever the content is replaced or dropped.
    revision: u64,
}

impl PreviewWindow {
    pub fn new(size: Size, zoom: ZoomBounds) -> Self {
        let size = clamp_size(size);
        let content = content_rect(size);
        Self {
            state: WindowState::Hidden,
            viewport: Viewport::new(content.width() as f64, content.height() as f64, zoom),
            title: DEFAULT_TITLE.to_string(),
            subtype: DEFAULT_SUBTYPE.to_string(),
            message: None,
            position: Point::default(),
            size,
            drag: None,
            pan_last: None,
            user_adjusted: false,
            revision: 0,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, WindowState::Loading | WindowState::Showing(_))
    }

    pub fn is_closed(&self) -> bool {
        self.state == WindowState::Closed
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// In-window message for placeholder and error states.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn caption(&self) -> String {
        format!("View Preview: {}", self.title)
    }

    pub fn status_text(&self) -> String {
        match self.state {
            WindowState::Hidden | WindowState::Closed => STATUS_READY.to_string(),
            WindowState::Loading => STATUS_LOADING.to_string(),
            WindowState::Showing(ShowingKind::Image) if self.user_adjusted => format!(
                "Zoom: {}% - Scroll to zoom, double-click to fit, drag to pan",
                self.viewport.zoom_percent()
            ),
            WindowState::Showing(ShowingKind::Image) => STATUS_LOADED.to_string(),
            WindowState::Showing(_) => self.message.clone().unwrap_or_default(),
        }
    }

    /// Content area in window-local pixels.
    pub fn content_rect(&self) -> Rect {
        content_rect(self.size)
    }

    /// Set the header text shown while content is being produced.
    pub fn set_heading(&mut self, title: impl Into<String>, subtype: impl Into<String>) {
        self.title = title.into();
        self.subtype = subtype.into();
    }

    /// Bring the window up at `placement`.
    ///
    /// A hidden window moves to `placement` and enters `Loading`, then takes
    /// `content` if given. An already visible window keeps its position and
    /// only swaps content.
    pub fn show(&mut self, content: Option<PreviewContent>, placement: Point) {
        match self.state {
            WindowState::Closed => {
                warn!("show() on a closed preview window ignored");
            }
            WindowState::Loading | WindowState::Showing(_) => {
                if let Some(content) = content {
                    self.apply(content);
                }
            }
            WindowState::Hidden => {
                self.position = placement;
                self.begin_loading();
                if let Some(content) = content {
                    self.apply(content);
                }
            }
        }
    }

    /// Complete a `Loading` window. Returns whether the content was taken.
    pub fn deliver(&mut self, content: PreviewContent) -> bool {
        if self.state != WindowState::Loading {
            debug!(state = ?self.state, "Dropping content delivered outside loading state");
            return false;
        }
        self.apply(content);
        true
    }

    /// Replace the content of a visible window in place.
    pub fn update(&mut self, content: PreviewContent) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.apply(content);
        true
    }

    /// Put a visible window back into `Loading`, dropping the old raster
    /// before the new one is produced.
    pub fn begin_loading(&mut self) {
        if self.state == WindowState::Closed {
            return;
        }
        self.viewport.release();
        self.message = None;
        self.user_adjusted = false;
        self.pan_last = None;
        self.revision += 1;
        self.state = WindowState::Loading;
    }

    pub fn hide(&mut self) {
        if matches!(self.state, WindowState::Hidden | WindowState::Closed) {
            return;
        }
        self.viewport.release();
        self.message = None;
        self.drag = None;
        self.pan_last = None;
        self.revision += 1;
        self.state = WindowState::Hidden;
    }

    /// Release everything. Returns `false` if the window was already closed.
    pub fn close(&mut self) -> bool {
        if self.state == WindowState::Closed {
            return false;
        }
        self.viewport.release();
        self.message = None;
        self.drag = None;
        self.pan_last = None;
        self.state = WindowState::Closed;
        true
    }

    fn apply(&mut self, content: PreviewContent) {
        let PreviewContent {
            title,
            subtype,
            body,
        } = content;
        self.title = title;
        self.subtype = subtype;
        self.user_adjusted = false;
        self.pan_last = None;
        self.revision += 1;

        let message = body.message();
        match body {
            PreviewBody::Image(raster) => match self.viewport.load_image(raster) {
                Ok(()) => {
                    self.message = None;
                    self.state = WindowState::Showing(ShowingKind::Image);
                }
                Err(err) => {
                    warn!(error = ?err, "Preview raster rejected");
                    self.message = PreviewBody::Error(err.to_string()).message();
                    self.state = WindowState::Showing(ShowingKind::Error);
                }
            },
            PreviewBody::Placeholder(_) => {
                self.viewport.release();
                self.message = message;
                self.state = WindowState::Showing(ShowingKind::Placeholder);
            }
            PreviewBody::Error(_) => {
                self.viewport.release();
                self.message = message;
                self.state = WindowState::Showing(ShowingKind::Error);
            }
        }
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Resize the window; the image is refit unless the user has zoomed or
    /// panned it.
    pub fn resize(&mut self, size: Size) {
        self.size = clamp_size(size);
        let content = self.content_rect();
        self.viewport
            .set_size(content.width() as f64, content.height() as f64);
        if !self.user_adjusted {
            self.viewport.fit_to_window();
        }
    }

    pub fn hit_test(&self, local: Point) -> HitRegion {
        let bounds = Rect::from_origin_size(Point::default(), self.size);
        if !bounds.contains(local) {
            return HitRegion::Outside;
        }
        if local.y < HEADER_HEIGHT {
            if local.x >= self.size.width - CLOSE_BUTTON_SIZE && local.y < CLOSE_BUTTON_SIZE {
                return HitRegion::CloseButton;
            }
            return HitRegion::Chrome;
        }
        if local.y >= self.size.height - STATUS_HEIGHT {
            return HitRegion::StatusBar;
        }
        HitRegion::Content
    }

    /// Mouse button pressed at `local` (window-local) / `screen`.
    ///
    /// Pressing the close box does not close the window by itself; the owner
    /// decides, so it can notify whoever tracks visibility.
    pub fn pointer_down(&mut self, local: Point, screen: Point) -> HitRegion {
        if !self.is_visible() {
            return HitRegion::Outside;
        }
        let region = self.hit_test(local);
        match region {
            HitRegion::Chrome => {
                self.drag = Some(DragState {
                    cursor_start: screen,
                    window_start: self.position,
                });
            }
            HitRegion::Content => {
                self.pan_last = Some(self.to_content(local));
            }
            _ => {}
        }
        region
    }

    /// Pointer moved while a button is held.
    pub fn pointer_move(&mut self, local: Point, screen: Point) {
        if let Some(drag) = self.drag {
            // No clamping while dragging.
            self.position = drag
                .window_start
                .offset(screen.x - drag.cursor_start.x, screen.y - drag.cursor_start.y);
            return;
        }
        if let Some(last) = self.pan_last {
            let current = self.to_content(local);
            if self.viewport.has_image() {
                self.viewport.pan_by(current - last);
                self.user_adjusted = true;
            }
            self.pan_last = Some(current);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
        self.pan_last = None;
    }

    /// Wheel over the window; zooms at the cursor inside the content area.
    pub fn scroll(&mut self, local: Point, wheel_delta: f64) {
        if self.hit_test(local) != HitRegion::Content || !self.viewport.has_image() {
            return;
        }
        self.viewport.zoom_at(self.to_content(local), wheel_delta);
        self.user_adjusted = true;
    }

    /// Double-click in the content area always fits the image.
    pub fn double_click(&mut self, local: Point) {
        if self.hit_test(local) != HitRegion::Content {
            return;
        }
        self.viewport.fit_to_window();
        self.user_adjusted = false;
    }

    /// Render the content area. `None` unless an image is showing.
    pub fn render_content(&self) -> Option<Raster> {
        if self.state != WindowState::Showing(ShowingKind::Image) {
            return None;
        }
        let content = self.content_rect();
        let mut surface = Raster::new(content.width().max(1) as u32, content.height().max(1) as u32);
        self.viewport.render(&mut surface);
        Some(surface)
    }

    fn to_content(&self, local: Point) -> kurbo::Point {
        let origin = self.content_rect().origin();
        kurbo::Point::from(local) - Vec2::new(origin.x as f64, origin.y as f64)
    }
}

fn clamp_size(size: Size) -> Size {
    Size::new(
        size.width.max(MIN_WINDOW_SIZE.width),
        size.height.max(MIN_WINDOW_SIZE.height),
    )
}

fn content_rect(size: Size) -> Rect {
    Rect::new(0, HEADER_HEIGHT, size.width, size.height - STATUS_HEIGHT)
}
