//! One preview session: selection monitor, singleton preview window, raster
//! provider and placement, driven by the host's poll tick.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PreviewConfig;
use crate::error::ExportError;
use crate::geometry::{Point, Size};
use crate::host::locator::HostWindowLocator;
use crate::host::positioner::{PlacementRequest, WindowPositioner};
use crate::host::{Desktop, WindowTree};
use crate::preview::{HitRegion, PreviewContent, PreviewWindow};
use crate::provider::{ElementId, ImageProvider, SelectionSource};
use crate::selection::{MonitorAction, SelectionMonitor, SelectionSnapshot};

/// Any host that can be polled for selection, windows and screens.
pub trait Host: SelectionSource + WindowTree + Desktop {}

impl<T: SelectionSource + WindowTree + Desktop + ?Sized> Host for T {}

pub struct PreviewSession<P> {
    config: PreviewConfig,
    enabled: bool,
    monitor: SelectionMonitor,
    window: Option<PreviewWindow>,
    provider: P,
    locator: HostWindowLocator,
    positioner: WindowPositioner,
}

impl<P: ImageProvider> PreviewSession<P> {
    /// A new, enabled session.
    pub fn new(config: PreviewConfig, provider: P) -> Self {
        Self {
            monitor: SelectionMonitor::new(config.show_delay, config.close_delay),
            locator: HostWindowLocator::new(config.locator.clone()),
            positioner: WindowPositioner::new(config.placement.clone()),
            enabled: true,
            window: None,
            provider,
            config,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the feature on or off. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Disabling cancels both timers and closes the window before returning.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.monitor.reset();
            self.close_window_inner();
        }
        info!(enabled, "View preview toggled");
    }

    pub fn monitor(&self) -> &SelectionMonitor {
        &self.monitor
    }

    pub fn window(&self) -> Option<&PreviewWindow> {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> Option<&mut PreviewWindow> {
        self.window.as_mut()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Poll the host once.
    pub fn tick<H: Host + ?Sized>(&mut self, now: Instant, host: &H) {
        if !self.enabled {
            return;
        }

        let snapshot = SelectionSnapshot::read(host);
        for action in self.monitor.tick(now, &snapshot) {
            match action {
                MonitorAction::Show(id) => self.show(id, host),
                MonitorAction::Hide => {
                    if let Some(window) = self.window.as_mut() {
                        debug!("Hiding preview");
                        window.hide();
                    }
                }
            }
        }
    }

    /// Forward a button press; a press on the close box closes the window.
    pub fn pointer_down(&mut self, local: Point, screen: Point) -> HitRegion {
        let region = match self.window.as_mut() {
            Some(window) => window.pointer_down(local, screen),
            None => HitRegion::Outside,
        };
        if region == HitRegion::CloseButton {
            self.close_window();
        }
        region
    }

    /// The user dismissed the preview. The current selection stays quiet
    /// until it changes.
    pub fn close_window(&mut self) {
        if self.close_window_inner() {
            self.monitor.window_closed();
        }
    }

    fn close_window_inner(&mut self) -> bool {
        match self.window.take() {
            Some(mut window) => window.close(),
            None => false,
        }
    }

    fn show<H: Host + ?Sized>(&mut self, id: ElementId, host: &H) {
        let (title, subtype) = match host.element_label(id) {
            Some(label) => (label.name, label.type_name),
            None => (format!("Element {id}"), host.element_kind(id).label().to_string()),
        };

        let size = self
            .window
            .as_ref()
            .map_or(self.config.window_size, PreviewWindow::size);
        let needs_placement = !self.window.as_ref().is_some_and(PreviewWindow::is_visible);
        let placement = if needs_placement {
            self.placement(host, size)
        } else {
            Point::default()
        };

        let (window_size, zoom) = (self.config.window_size, self.config.zoom);
        let window = self
            .window
            .get_or_insert_with(|| PreviewWindow::new(window_size, zoom));
        window.set_heading(title.clone(), subtype.clone());
        if window.is_visible() {
            window.begin_loading();
        } else {
            window.show(None, placement);
        }
        debug!(%id, title = %title, ?placement, "Showing preview");

        let content = self.fetch(id, title, subtype);
        if let Some(window) = self.window.as_mut() {
            window.deliver(content);
        }
    }

    fn placement<H: Host + ?Sized>(&self, host: &H, window_size: Size) -> Point {
        let screens = host.screen_layout();
        let mut request = PlacementRequest::new(window_size);
        request.host = host.root_window().and_then(|root| host.window_rect(root));
        request.cursor = host.cursor_position();
        match self.locator.locate(host, &screens) {
            Ok(reference) => request.reference = Some(reference),
            Err(err) => debug!(error = %err, "Placing preview without reference panel"),
        }
        self.positioner.compute_placement(&request, &screens)
    }

    /// Export the raster for `id`, exactly once per show. Every show asks
    /// the provider again so the preview follows edits made in the host.
    ///
    /// Unsupported views become placeholder content, any other failure
    /// becomes error content.
    fn fetch(&mut self, id: ElementId, title: String, subtype: String) -> PreviewContent {
        let result = self
            .provider
            .export_view_image(id, self.config.max_pixel_dimension)
            .and_then(|raster| {
                if raster.width() == 0 || raster.height() == 0 {
                    Err(ExportError::Empty)
                } else {
                    Ok(raster)
                }
            });

        match result {
            Ok(raster) => PreviewContent::image(title, subtype, raster),
            Err(ExportError::Unsupported(reason)) => {
                debug!(%id, reason = %reason, "View cannot be previewed");
                PreviewContent::placeholder(title, subtype, reason)
            }
            Err(err) => {
                warn!(%id, error = %err, "Preview not available");
                PreviewContent::error(title, subtype, err.to_string())
            }
        }
    }
}
