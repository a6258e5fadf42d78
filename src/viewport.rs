// Viewport engine for the preview window
// Features:
// - Fit-to-window with a small margin, centered
// - Cursor-anchored wheel zoom (the image point under the cursor stays put)
// - Free drag-pan, no clamping
// - Bicubic render of only the visible part of the raster

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point, Size, Vec2};

use crate::error::{PreviewError, Result};

/// The raster type shared by providers, the viewport and front ends.
pub type Raster = RgbaImage;

/// Minimum zoom scale allowed
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum zoom scale allowed
pub const MAX_ZOOM: f64 = 10.0;
/// Zoom multiplier per wheel notch
const ZOOM_STEP: f64 = 1.1;
/// Fitted images fill this fraction of the viewport
const FIT_MARGIN: f64 = 0.95;
/// Color behind and around the image
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Allowed zoom range. Every zoom mutation is clamped into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
        }
    }
}

impl ZoomBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Usable bounds: both positive and finite, `min <= max`. Reversed
    /// bounds are swapped; anything else falls back to the defaults.
    pub fn validated(self) -> Self {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.min) || !usable(self.max) {
            return Self::default();
        }
        Self {
            min: self.min.min(self.max),
            max: self.min.max(self.max),
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }
}

/// Scale that fits an `image_w` x `image_h` image inside the viewport while
/// preserving its aspect ratio.
pub fn fit_ratio(image_w: f64, image_h: f64, viewport_w: f64, viewport_h: f64) -> f64 {
    if image_w <= 0.0 || image_h <= 0.0 || viewport_w <= 0.0 || viewport_h <= 0.0 {
        return 1.0;
    }
    (viewport_w / image_w).min(viewport_h / image_h)
}

/// Zoom/pan state over a single owned raster.
#[derive(Debug)]
pub struct Viewport {
    bounds: ZoomBounds,
    size: Size,
    zoom: f64,
    /// Window-local position of the scaled image's top-left corner.
    origin: Point,
    source: Option<Raster>,
}

impl Viewport {
    pub fn new(width: f64, height: f64, bounds: ZoomBounds) -> Self {
        let bounds = bounds.validated();
        Self {
            bounds,
            size: Size::new(width.max(0.0), height.max(0.0)),
            zoom: bounds.clamp(1.0),
            origin: Point::ZERO,
            source: None,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Image space to window-local space.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom).then_translate(self.origin.to_vec2())
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|img| img.dimensions())
    }

    /// Resize the viewport. The current transform is kept as is.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = Size::new(width.max(0.0), height.max(0.0));
    }

    /// Replace the raster and fit it to the viewport.
    ///
    /// An empty raster is rejected and the previous one is released anyway,
    /// so the viewport never keeps showing stale content.
    pub fn load_image(&mut self, image: Raster) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            self.source = None;
            return Err(PreviewError::EmptyImage);
        }
        self.source = Some(image);
        self.fit_to_window();
        Ok(())
    }

    /// Drop the raster, returning it to the caller if there was one.
    pub fn release(&mut self) -> Option<Raster> {
        self.origin = Point::ZERO;
        self.zoom = self.bounds.clamp(1.0);
        self.source.take()
    }

    /// Fit the image to the viewport and center it.
    pub fn fit_to_window(&mut self) {
        let Some((img_w, img_h)) = self.image_size() else {
            return;
        };
        let (img_w, img_h) = (img_w as f64, img_h as f64);

        if self.size.is_zero_area() {
            self.zoom = self.bounds.clamp(1.0);
            self.origin = Point::ZERO;
            return;
        }

        let zoom = self
            .bounds
            .clamp(fit_ratio(img_w, img_h, self.size.width, self.size.height) * FIT_MARGIN);
        self.zoom = zoom;
        self.origin = Point::new(
            (self.size.width - img_w * zoom) / 2.0,
            (self.size.height - img_h * zoom) / 2.0,
        );
    }

    /// Zoom one wheel notch toward (`wheel_delta > 0`) or away from the
    /// image, keeping the image point under `cursor` fixed on screen.
    pub fn zoom_at(&mut self, cursor: Point, wheel_delta: f64) {
        if self.source.is_none() || wheel_delta == 0.0 {
            return;
        }

        let factor = if wheel_delta > 0.0 {
            ZOOM_STEP
        } else {
            1.0 / ZOOM_STEP
        };
        let old_zoom = self.zoom;
        let new_zoom = self.bounds.clamp(old_zoom * factor);
        if (new_zoom - old_zoom).abs() < 1e-12 {
            return;
        }

        self.origin = cursor - (cursor - self.origin) * (new_zoom / old_zoom);
        self.zoom = new_zoom;
    }

    /// Pan by a delta. The image may leave the viewport entirely.
    pub fn pan_by(&mut self, delta: Vec2) {
        if self.source.is_none() {
            return;
        }
        self.origin += delta;
    }

    /// Map a window-local point into image space.
    pub fn screen_to_image(&self, point: Point) -> Option<Point> {
        self.source.as_ref()?;
        Some(self.transform().inverse() * point)
    }

    /// Map an image-space point to window-local coordinates.
    pub fn image_to_screen(&self, point: Point) -> Option<Point> {
        self.source.as_ref()?;
        Some(self.transform() * point)
    }

    /// The source pixel under a window-local point, if the point is on the image.
    pub fn pixel_at(&self, point: Point) -> Option<(u32, u32)> {
        let (img_w, img_h) = self.image_size()?;
        let p = self.screen_to_image(point)?;
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x.floor() as u32, p.y.floor() as u32);
        (x < img_w && y < img_h).then_some((x, y))
    }

    /// Draw the current view into `surface`, which represents the viewport.
    pub fn render(&self, surface: &mut Raster) {
        for pixel in surface.pixels_mut() {
            *pixel = BACKGROUND;
        }

        let Some(source) = self.source.as_ref() else {
            return;
        };

        let zoom = self.zoom;
        let surface_w = surface.width() as f64;
        let surface_h = surface.height() as f64;
        let scaled_w = source.width() as f64 * zoom;
        let scaled_h = source.height() as f64 * zoom;

        // Visible part of the scaled image in surface coordinates.
        let vis_left = self.origin.x.max(0.0);
        let vis_top = self.origin.y.max(0.0);
        let vis_right = (self.origin.x + scaled_w).min(surface_w);
        let vis_bottom = (self.origin.y + scaled_h).min(surface_h);
        if vis_right <= vis_left || vis_bottom <= vis_top {
            return;
        }

        // Whole source pixels covering that region.
        let src_left = ((vis_left - self.origin.x) / zoom).floor().max(0.0) as u32;
        let src_top = ((vis_top - self.origin.y) / zoom).floor().max(0.0) as u32;
        let src_right = (((vis_right - self.origin.x) / zoom).ceil().max(0.0) as u32)
            .min(source.width());
        let src_bottom = (((vis_bottom - self.origin.y) / zoom).ceil().max(0.0) as u32)
            .min(source.height());
        if src_right <= src_left || src_bottom <= src_top {
            return;
        }

        let crop_w = src_right - src_left;
        let crop_h = src_bottom - src_top;
        let dest_w = ((crop_w as f64 * zoom).round() as u32).max(1);
        let dest_h = ((crop_h as f64 * zoom).round() as u32).max(1);

        let crop = imageops::crop_imm(source, src_left, src_top, crop_w, crop_h).to_image();
        let scaled = imageops::resize(&crop, dest_w, dest_h, FilterType::CatmullRom);

        let dest_x = (self.origin.x + src_left as f64 * zoom).round() as i64;
        let dest_y = (self.origin.y + src_top as f64 * zoom).round() as i64;
        imageops::overlay(surface, &scaled, dest_x, dest_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> Raster {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    fn loaded(img_w: u32, img_h: u32, view_w: f64, view_h: f64) -> Viewport {
        let mut viewport = Viewport::new(view_w, view_h, ZoomBounds::default());
        viewport
            .load_image(solid(img_w, img_h, [200, 0, 0, 255]))
            .unwrap();
        viewport
    }

    #[test]
    fn test_scale_clamping() {
        let bounds = ZoomBounds::default();
        assert_eq!(bounds.clamp(15.0), MAX_ZOOM);
        assert_eq!(bounds.clamp(0.01), MIN_ZOOM);
        assert_eq!(bounds.clamp(1.0), 1.0);
    }

    #[test]
    fn test_unusable_zoom_bounds_never_panic() {
        let reversed = Viewport::new(100.0, 100.0, ZoomBounds::new(8.0, 0.5));
        assert_eq!(reversed.bounds(), ZoomBounds::new(0.5, 8.0));

        for bounds in [
            ZoomBounds::new(f64::NAN, 4.0),
            ZoomBounds::new(0.0, 4.0),
            ZoomBounds::new(1.0, f64::INFINITY),
        ] {
            let mut viewport = Viewport::new(100.0, 100.0, bounds);
            assert_eq!(viewport.bounds(), ZoomBounds::default());
            viewport.load_image(solid(10, 10, [0, 0, 0, 255])).unwrap();
            viewport.zoom_at(Point::new(50.0, 50.0), 1.0);
            assert!(viewport.zoom() <= MAX_ZOOM);
        }
    }

    #[test]
    fn test_transform_maps_image_corners() {
        let viewport = loaded(10, 10, 100.0, 100.0);
        let transform = viewport.transform();
        assert_eq!(transform * Point::ZERO, viewport.origin());
        let far = transform * Point::new(10.0, 10.0);
        assert!(far.distance(Point::new(97.5, 97.5)) < 1e-9);
    }

    #[test]
    fn test_load_image_fits_and_centers() {
        let viewport = loaded(400, 200, 800.0, 600.0);
        // Width is the limiting side: 800 / 400 = 2.0.
        assert!((viewport.zoom() - 2.0 * 0.95).abs() < 1e-9);
        let origin = viewport.origin();
        assert!((origin.x - (800.0 - 400.0 * 1.9) / 2.0).abs() < 1e-9);
        assert!((origin.y - (600.0 - 200.0 * 1.9) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_image_rejected_and_previous_released() {
        let mut viewport = loaded(10, 10, 100.0, 100.0);
        let err = viewport.load_image(RgbaImage::new(0, 5)).unwrap_err();
        assert!(matches!(err, PreviewError::EmptyImage));
        assert!(!viewport.has_image());
    }

    #[test]
    fn test_transforms_without_image_are_noops() {
        let mut viewport = Viewport::new(300.0, 200.0, ZoomBounds::default());
        let zoom = viewport.zoom();
        viewport.zoom_at(Point::new(10.0, 10.0), 1.0);
        viewport.pan_by(Vec2::new(50.0, 50.0));
        viewport.fit_to_window();
        assert_eq!(viewport.zoom(), zoom);
        assert_eq!(viewport.origin(), Point::ZERO);
        assert!(viewport.screen_to_image(Point::ZERO).is_none());

        let mut surface = RgbaImage::new(4, 4);
        viewport.render(&mut surface);
        assert!(surface.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_zoom_keeps_cursor_anchor() {
        let mut viewport = loaded(640, 480, 800.0, 600.0);
        let steps = [
            (Point::new(400.0, 300.0), 1.0),
            (Point::new(120.0, 80.0), 1.0),
            (Point::new(700.0, 550.0), -1.0),
            (Point::new(5.0, 590.0), 3.0),
            (Point::new(333.3, 111.1), -2.0),
            (Point::new(799.0, 0.0), 1.0),
        ];
        for round in 0..20 {
            for &(cursor, delta) in &steps {
                let before = viewport.screen_to_image(cursor).unwrap();
                viewport.zoom_at(cursor, delta);
                let after = viewport.image_to_screen(before).unwrap();
                assert!(
                    after.distance(cursor) <= 1.0,
                    "round {round}: anchor drifted to {after:?} from {cursor:?}"
                );
            }
        }
    }

    #[test]
    fn test_zoom_stays_within_bounds() {
        let mut viewport = loaded(100, 100, 200.0, 200.0);
        let cursor = Point::new(50.0, 50.0);
        for _ in 0..200 {
            viewport.zoom_at(cursor, 1.0);
            assert!(viewport.zoom() <= MAX_ZOOM);
        }
        assert!((viewport.zoom() - MAX_ZOOM).abs() < 1e-9);

        for _ in 0..400 {
            viewport.zoom_at(cursor, -1.0);
            assert!(viewport.zoom() >= MIN_ZOOM);
        }
        assert!((viewport.zoom() - MIN_ZOOM).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_at_bound_does_not_move_image() {
        let mut viewport = loaded(100, 100, 200.0, 200.0);
        for _ in 0..100 {
            viewport.zoom_at(Point::new(10.0, 10.0), 1.0);
        }
        let origin = viewport.origin();
        viewport.zoom_at(Point::new(150.0, 20.0), 1.0);
        assert_eq!(viewport.origin(), origin);
    }

    #[test]
    fn test_fit_to_window_idempotent() {
        let mut viewport = loaded(1200, 900, 640.0, 480.0);
        viewport.zoom_at(Point::new(100.0, 100.0), 1.0);
        viewport.pan_by(Vec2::new(-300.0, 40.0));

        viewport.fit_to_window();
        let (zoom, origin) = (viewport.zoom(), viewport.origin());
        viewport.fit_to_window();
        assert_eq!(viewport.zoom(), zoom);
        assert_eq!(viewport.origin(), origin);

        let fresh = loaded(1200, 900, 640.0, 480.0);
        assert_eq!(fresh.zoom(), zoom);
        assert_eq!(fresh.origin(), origin);
    }

    #[test]
    fn test_pan_is_unclamped() {
        let mut viewport = loaded(100, 100, 200.0, 200.0);
        let start = viewport.origin();
        viewport.pan_by(Vec2::new(-5000.0, 7000.0));
        assert_eq!(viewport.origin(), start + Vec2::new(-5000.0, 7000.0));
        assert!(viewport.pixel_at(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_pixel_at_maps_through_transform() {
        let viewport = loaded(10, 10, 100.0, 100.0);
        // zoom = 9.5, origin = 2.5
        assert_eq!(viewport.pixel_at(Point::new(3.0, 3.0)), Some((0, 0)));
        assert_eq!(viewport.pixel_at(Point::new(97.0, 97.0)), Some((9, 9)));
        assert_eq!(viewport.pixel_at(Point::new(1.0, 50.0)), None);
    }

    #[test]
    fn test_render_draws_visible_region() {
        // 2x2 into 100x100 wants zoom 47.5, clamped to 10: a 20x20 square at (40, 40).
        let viewport = loaded(2, 2, 100.0, 100.0);
        assert_eq!(viewport.zoom(), MAX_ZOOM);

        let mut surface = RgbaImage::new(100, 100);
        viewport.render(&mut surface);
        assert_eq!(*surface.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*surface.get_pixel(38, 50), BACKGROUND);
        assert_eq!(*surface.get_pixel(61, 50), BACKGROUND);
        let center = surface.get_pixel(50, 50);
        assert!(center[0] > 150 && center[1] < 50, "got {center:?}");
    }

    #[test]
    fn test_render_offscreen_image_leaves_background() {
        let mut viewport = loaded(50, 50, 100.0, 100.0);
        viewport.pan_by(Vec2::new(500.0, 0.0));
        let mut surface = RgbaImage::new(100, 100);
        viewport.render(&mut surface);
        assert!(surface.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_release_returns_raster() {
        let mut viewport = loaded(8, 4, 100.0, 100.0);
        let raster = viewport.release().unwrap();
        assert_eq!(raster.dimensions(), (8, 4));
        assert!(!viewport.has_image());
        assert!(viewport.release().is_none());
    }
}
