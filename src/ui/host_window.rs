// Demo host window
// Stands in for the host application:
// - Drawing area on the left, "Project Browser" panel listing the catalog on the right
// - "View Preview" toggle in the toolbar
// - Preview drawn on an overlay layer, input routed through the session
// - 50ms poll timer driving PreviewSession::tick
//
// Overlay coordinates double as screen coordinates; the overlay is the only screen.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    glib, Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, EventControllerMotion,
    EventControllerScroll, EventControllerScrollFlags, EventSequenceState, GestureClick,
    GestureDrag, Label, ListBox, Orientation, Overlay, PolicyType, PropagationPhase,
    ScrolledWindow, SelectionMode, ToggleButton, Widget, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::preview_widget::PreviewWidget;
use crate::config::PreviewConfig;
use crate::geometry::{Point, Rect};
use crate::host::snapshot::WindowSnapshot;
use crate::host::{Desktop, Screen, ScreenLayout, WindowHandle, WindowTree};
use crate::preview::HitRegion;
use crate::provider::catalog::CatalogSelection;
use crate::provider::{ElementId, ElementKind, ElementLabel, SelectionSource, ViewCatalog};
use crate::session::PreviewSession;

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const PANEL_WIDTH: i32 = 320;
const PANEL_TITLE: &str = "Project Browser";

const PREVIEW_CSS: &str = r#"
.canvas {
    background-color: #f4f4f4;
    color: #909090;
}

.project-browser {
    background-color: #ffffff;
    border-left: 1px solid #c8c8c8;
}

.project-browser-title {
    font-weight: bold;
    padding: 6px 8px;
}

/* Chrome bands must measure exactly what the model hit-tests: no border,
   no vertical padding. The outline is drawn by the shadow. */
.preview-window {
    background-color: #ffffff;
    box-shadow: 0 0 0 1px #808080, 0 4px 16px rgba(0, 0, 0, 0.3);
}

.preview-header {
    background-color: #f0f0f0;
    padding: 0 10px;
    min-height: 80px;
}

.preview-title {
    font-size: 15px;
    font-weight: bold;
}

.preview-subtype {
    color: #606060;
}

.preview-close {
    font-size: 18px;
}

.preview-message {
    color: #606060;
}

.preview-status {
    background-color: #f0f0f0;
    color: #404040;
    padding: 0 10px;
    min-height: 30px;
}
"#;

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(PREVIEW_CSS);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

/// Bounds of `widget` in the coordinate space of `target`.
fn widget_rect(widget: &impl IsA<Widget>, target: &impl IsA<Widget>) -> Option<Rect> {
    let bounds = widget.compute_bounds(target)?;
    let left = bounds.x().round() as i32;
    let top = bounds.y().round() as i32;
    Some(Rect::new(
        left,
        top,
        left + bounds.width().round() as i32,
        top + bounds.height().round() as i32,
    ))
}

/// What the session sees of the demo host during one tick.
struct HostFrame<'a> {
    selection: CatalogSelection<'a>,
    tree: WindowSnapshot,
    screens: ScreenLayout,
    cursor: Option<Point>,
}

impl SelectionSource for HostFrame<'_> {
    fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.selected_ids()
    }

    fn element_kind(&self, id: ElementId) -> ElementKind {
        self.selection.element_kind(id)
    }

    fn element_label(&self, id: ElementId) -> Option<ElementLabel> {
        self.selection.element_label(id)
    }
}

impl WindowTree for HostFrame<'_> {
    fn root_window(&self) -> Option<WindowHandle> {
        self.tree.root_window()
    }

    fn child_windows(&self, handle: WindowHandle) -> Vec<WindowHandle> {
        self.tree.child_windows(handle)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.tree.window_rect(handle)
    }

    fn window_title(&self, handle: WindowHandle) -> String {
        self.tree.window_title(handle)
    }
}

impl Desktop for HostFrame<'_> {
    fn screen_layout(&self) -> ScreenLayout {
        self.screens.clone()
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }
}

pub struct HostWindow {
    self_weak: RefCell<Weak<HostWindow>>,
    window: ApplicationWindow,
    overlay: Overlay,
    canvas: GtkBox,
    panel: GtkBox,
    list: ListBox,
    preview: PreviewWidget,
    catalog: ViewCatalog,
    session: RefCell<PreviewSession<ViewCatalog>>,
    cursor: Cell<Option<Point>>,
}

impl HostWindow {
    pub fn new(app: &Application, dir: &Path, catalog: ViewCatalog, config: PreviewConfig) -> Rc<Self> {
        load_css();

        let window = ApplicationWindow::builder()
            .application(app)
            .title(format!("vpreview - {}", dir.display()))
            .default_width(1400)
            .default_height(900)
            .build();

        let toggle = ToggleButton::with_label("View Preview");
        toggle.set_active(true);
        let toolbar = GtkBox::new(Orientation::Horizontal, 8);
        toolbar.set_margin_start(8);
        toolbar.set_margin_end(8);
        toolbar.set_margin_top(4);
        toolbar.set_margin_bottom(4);
        let dir_label = Label::new(Some(&dir.display().to_string()));
        dir_label.set_hexpand(true);
        dir_label.set_xalign(0.0);
        toolbar.append(&dir_label);
        toolbar.append(&toggle);

        let canvas = GtkBox::new(Orientation::Vertical, 0);
        canvas.add_css_class("canvas");
        canvas.set_hexpand(true);
        canvas.set_vexpand(true);
        let canvas_label = Label::new(Some("Drawing area"));
        canvas_label.set_vexpand(true);
        canvas_label.set_valign(Align::Center);
        canvas.append(&canvas_label);

        let list = ListBox::new();
        list.set_selection_mode(SelectionMode::Multiple);
        for entry in catalog.entries() {
            let row = Label::new(Some(&format!("{}  ({})", entry.name, entry.kind.label())));
            row.set_xalign(0.0);
            row.set_margin_start(8);
            row.set_margin_top(2);
            row.set_margin_bottom(2);
            list.append(&row);
        }
        let scroller = ScrolledWindow::new();
        scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
        scroller.set_vexpand(true);
        scroller.set_child(Some(&list));

        let panel = GtkBox::new(Orientation::Vertical, 0);
        panel.add_css_class("project-browser");
        panel.set_size_request(PANEL_WIDTH, -1);
        let panel_title = Label::new(Some(PANEL_TITLE));
        panel_title.add_css_class("project-browser-title");
        panel_title.set_xalign(0.0);
        panel.append(&panel_title);
        panel.append(&scroller);

        let body = GtkBox::new(Orientation::Horizontal, 0);
        body.append(&canvas);
        body.append(&panel);

        let preview = PreviewWidget::new();
        let overlay = Overlay::new();
        overlay.set_child(Some(&body));
        overlay.add_overlay(preview.layer());

        let root = GtkBox::new(Orientation::Vertical, 0);
        root.append(&toolbar);
        root.append(&overlay);
        window.set_child(Some(&root));

        let host = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            overlay,
            canvas,
            panel,
            list,
            preview,
            session: RefCell::new(PreviewSession::new(config, catalog.clone())),
            catalog,
            cursor: Cell::new(None),
        });
        *host.self_weak.borrow_mut() = Rc::downgrade(&host);

        host.setup_toggle(&toggle);
        host.setup_input();
        host.start_polling();
        tracing::info!(views = host.catalog.entries().len(), "Host window ready");
        host
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn setup_toggle(&self, toggle: &ToggleButton) {
        let host_weak = self.self_weak.borrow().clone();
        toggle.connect_toggled(move |button| {
            if let Some(host) = host_weak.upgrade() {
                host.session.borrow_mut().set_enabled(button.is_active());
                host.sync_preview();
            }
        });
    }

    fn start_polling(&self) {
        let host_weak = self.self_weak.borrow().clone();
        glib::timeout_add_local(TICK_INTERVAL, move || match host_weak.upgrade() {
            Some(host) => {
                host.tick();
                glib::ControlFlow::Continue
            }
            None => glib::ControlFlow::Break,
        });
    }

    fn tick(&self) {
        let frame = self.frame();
        self.session.borrow_mut().tick(Instant::now(), &frame);
        self.sync_preview();
    }

    fn frame(&self) -> HostFrame<'_> {
        let selected: Vec<ElementId> = self
            .list
            .selected_rows()
            .iter()
            .filter_map(|row| usize::try_from(row.index()).ok())
            .filter_map(|index| self.catalog.entries().get(index))
            .map(|entry| entry.id)
            .collect();

        let size = Rect::new(0, 0, self.overlay.width(), self.overlay.height());
        let mut tree = WindowSnapshot::new(
            self.window.title().map(|t| t.to_string()).unwrap_or_default(),
            size,
        );
        let root = tree.root();
        if let Some(rect) = widget_rect(&self.canvas, &self.overlay) {
            tree.add_child(root, "Drawing area", rect);
        }
        if let Some(rect) = widget_rect(&self.panel, &self.overlay) {
            tree.add_child(root, PANEL_TITLE, rect);
        }

        HostFrame {
            selection: self.catalog.selection(selected),
            tree,
            screens: ScreenLayout::single(Screen::full(size)),
            cursor: self.cursor.get(),
        }
    }

    fn sync_preview(&self) {
        self.preview.sync(self.session.borrow().window());
    }

    /// Preview-local point for an overlay point, if it lands on the preview.
    fn preview_local(&self, screen: Point) -> Option<(Point, HitRegion)> {
        let session = self.session.borrow();
        let window = session.window().filter(|w| w.is_visible())?;
        let origin = window.position();
        let local = Point::new(screen.x - origin.x, screen.y - origin.y);
        match window.hit_test(local) {
            HitRegion::Outside => None,
            region => Some((local, region)),
        }
    }

    fn setup_input(&self) {
        let motion = EventControllerMotion::new();
        let host_weak = self.self_weak.borrow().clone();
        motion.connect_motion(move |_, x, y| {
            if let Some(host) = host_weak.upgrade() {
                host.cursor.set(Some(Point::new(x as i32, y as i32)));
            }
        });
        let host_weak = self.self_weak.borrow().clone();
        motion.connect_leave(move |_| {
            if let Some(host) = host_weak.upgrade() {
                host.cursor.set(None);
            }
        });
        self.overlay.add_controller(motion);

        // Header drag moves the preview, content drag pans it.
        let drag = GestureDrag::new();
        drag.set_button(1);
        drag.set_propagation_phase(PropagationPhase::Capture);
        let host_weak = self.self_weak.borrow().clone();
        drag.connect_drag_begin(move |gesture, x, y| {
            let Some(host) = host_weak.upgrade() else {
                return;
            };
            let screen = Point::new(x as i32, y as i32);
            let Some((local, _)) = host.preview_local(screen) else {
                gesture.set_state(EventSequenceState::Denied);
                return;
            };
            gesture.set_state(EventSequenceState::Claimed);
            host.session.borrow_mut().pointer_down(local, screen);
            host.sync_preview();
        });
        let host_weak = self.self_weak.borrow().clone();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some(host) = host_weak.upgrade() else {
                return;
            };
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            let screen = Point::new((start_x + offset_x) as i32, (start_y + offset_y) as i32);
            {
                let mut session = host.session.borrow_mut();
                if let Some(window) = session.window_mut() {
                    let origin = window.position();
                    let local = Point::new(screen.x - origin.x, screen.y - origin.y);
                    window.pointer_move(local, screen);
                }
            }
            host.sync_preview();
        });
        let host_weak = self.self_weak.borrow().clone();
        drag.connect_drag_end(move |_, _, _| {
            if let Some(host) = host_weak.upgrade() {
                if let Some(window) = host.session.borrow_mut().window_mut() {
                    window.pointer_up();
                }
            }
        });
        self.overlay.add_controller(drag.clone());

        let click = GestureClick::new();
        click.set_button(1);
        click.set_propagation_phase(PropagationPhase::Capture);
        click.group_with(&drag);
        let host_weak = self.self_weak.borrow().clone();
        click.connect_pressed(move |_, n_press, x, y| {
            if n_press != 2 {
                return;
            }
            let Some(host) = host_weak.upgrade() else {
                return;
            };
            let Some((local, HitRegion::Content)) = host.preview_local(Point::new(x as i32, y as i32))
            else {
                return;
            };
            if let Some(window) = host.session.borrow_mut().window_mut() {
                window.double_click(local);
            }
            host.sync_preview();
        });
        self.overlay.add_controller(click);

        let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
        scroll.set_propagation_phase(PropagationPhase::Capture);
        let host_weak = self.self_weak.borrow().clone();
        scroll.connect_scroll(move |_, _dx, dy| {
            let Some(host) = host_weak.upgrade() else {
                return glib::Propagation::Proceed;
            };
            let target = host.cursor.get().and_then(|p| host.preview_local(p));
            let Some((local, HitRegion::Content)) = target else {
                return glib::Propagation::Proceed;
            };
            // GTK reports wheel-down as positive; that zooms out.
            if let Some(window) = host.session.borrow_mut().window_mut() {
                window.scroll(local, -dy);
            }
            host.sync_preview();
            glib::Propagation::Stop
        });
        self.overlay.add_controller(scroll);
    }
}
