// Preview overlay widget
// Draws a PreviewWindow model on a Fixed layer above the host content:
// - Header: title, type text, close box
// - Content: viewport render as a MemoryTexture, or the placeholder message
// - Status line
// Input is handled by the host window and routed through the session.

use std::cell::RefCell;

use gdk4::{MemoryFormat, MemoryTexture, Texture};
use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, ContentFit, Fixed, Label, Orientation, Overflow, Picture, Stack,
};
use kurbo::Point;

use crate::preview::window::{CLOSE_BUTTON_SIZE, HEADER_HEIGHT, STATUS_HEIGHT};
use crate::preview::{PreviewWindow, ShowingKind, WindowState};
use crate::viewport::Raster;

/// Everything the content texture depends on; re-rendered only when it changes.
#[derive(Debug, Clone, PartialEq)]
struct FrameKey {
    revision: u64,
    zoom: f64,
    origin: Point,
    width: i32,
    height: i32,
}

impl FrameKey {
    fn of(window: &PreviewWindow) -> Self {
        let content = window.content_rect();
        Self {
            revision: window.revision(),
            zoom: window.viewport().zoom(),
            origin: window.viewport().origin(),
            width: content.width(),
            height: content.height(),
        }
    }
}

pub struct PreviewWidget {
    layer: Fixed,
    root: GtkBox,
    title: Label,
    subtype: Label,
    content: Stack,
    picture: Picture,
    message: Label,
    status: Label,
    last_frame: RefCell<Option<FrameKey>>,
}

impl PreviewWidget {
    pub fn new() -> Self {
        // Input goes through the host overlay's controllers, never to the layer.
        let layer = Fixed::new();
        layer.set_can_target(false);

        let root = GtkBox::new(Orientation::Vertical, 0);
        root.add_css_class("preview-window");
        root.set_halign(Align::Start);
        root.set_valign(Align::Start);
        root.set_visible(false);

        // Exactly HEADER_HEIGHT tall while the children fit inside it; the
        // model hit-tests against the same band.
        let header = GtkBox::new(Orientation::Vertical, 4);
        header.add_css_class("preview-header");
        header.set_size_request(-1, HEADER_HEIGHT);
        header.set_vexpand(false);
        header.set_overflow(Overflow::Hidden);

        let top_row = GtkBox::new(Orientation::Horizontal, 0);
        top_row.set_margin_top(8);
        let title = Label::new(None);
        title.add_css_class("preview-title");
        title.set_xalign(0.0);
        title.set_hexpand(true);
        title.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        let close = Label::new(Some("×"));
        close.add_css_class("preview-close");
        close.set_size_request(CLOSE_BUTTON_SIZE, CLOSE_BUTTON_SIZE);
        close.set_valign(Align::Start);
        top_row.append(&title);
        top_row.append(&close);

        let subtype = Label::new(None);
        subtype.add_css_class("preview-subtype");
        subtype.set_xalign(0.0);

        header.append(&top_row);
        header.append(&subtype);

        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Fill);

        let message = Label::new(None);
        message.add_css_class("preview-message");
        message.set_wrap(true);

        let content = Stack::new();
        content.set_vexpand(true);
        content.add_named(&picture, Some("image"));
        content.add_named(&message, Some("message"));

        let status = Label::new(None);
        status.add_css_class("preview-status");
        status.set_xalign(0.0);
        status.set_size_request(-1, STATUS_HEIGHT);
        status.set_vexpand(false);

        root.append(&header);
        root.append(&content);
        root.append(&status);
        layer.put(&root, 0.0, 0.0);

        Self {
            layer,
            root,
            title,
            subtype,
            content,
            picture,
            message,
            status,
            last_frame: RefCell::new(None),
        }
    }

    /// The layer to stack above the host content.
    pub fn layer(&self) -> &Fixed {
        &self.layer
    }

    /// Bring the widget in line with the model.
    pub fn sync(&self, window: Option<&PreviewWindow>) {
        let Some(window) = window.filter(|w| w.is_visible()) else {
            if self.root.is_visible() {
                self.root.set_visible(false);
                self.picture.set_paintable(None::<&Texture>);
            }
            self.last_frame.replace(None);
            return;
        };

        let position = window.position();
        let size = window.size();
        self.layer
            .move_(&self.root, position.x as f64, position.y as f64);
        self.root.set_size_request(size.width, size.height);
        self.root.set_visible(true);

        self.title.set_text(&window.caption());
        self.subtype.set_text(window.subtype());
        self.status.set_text(&window.status_text());

        match window.state() {
            WindowState::Showing(ShowingKind::Image) => {
                self.content.set_visible_child_name("image");
                let key = FrameKey::of(window);
                if self.last_frame.borrow().as_ref() != Some(&key) {
                    let texture = window.render_content().and_then(|frame| texture_from_raster(&frame));
                    self.picture.set_paintable(texture.as_ref());
                    self.last_frame.replace(Some(key));
                }
            }
            WindowState::Loading => {
                self.message.set_text(&window.status_text());
                self.content.set_visible_child_name("message");
                self.last_frame.replace(None);
            }
            _ => {
                self.message.set_text(window.message().unwrap_or_default());
                self.content.set_visible_child_name("message");
                self.last_frame.replace(None);
            }
        }
    }
}

impl Default for PreviewWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn texture_from_raster(raster: &Raster) -> Option<Texture> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let bytes = glib::Bytes::from(raster.as_raw().as_slice());
    let texture = MemoryTexture::new(
        width as i32,
        height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}
