//! Screen-space geometry primitives.
//!
//! Host window managers report whole pixels with right/bottom exclusive
//! edges, so placement works on integral `Point`, `Size` and `Rect`.
//! Viewport math runs on `kurbo` types; window-local points convert with
//! `kurbo::Point::from`.

/// A point in screen (or window-local) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Edge-based rectangle, right/bottom exclusive (Win32 `RECT` layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Overlapping area with `other`, zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0) as i64;
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0) as i64;
        w * h
    }

    /// Squared distance from `point` to the nearest point of this rectangle.
    pub fn distance_squared(&self, point: Point) -> i64 {
        let dx = if point.x < self.left {
            self.left - point.x
        } else if point.x >= self.right {
            point.x - self.right + 1
        } else {
            0
        } as i64;
        let dy = if point.y < self.top {
            self.top - point.y
        } else if point.y >= self.bottom {
            point.y - self.bottom + 1
        } else {
            0
        } as i64;
        dx * dx + dy * dy
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x as f64, p.y as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection_area() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        assert_eq!(a.intersection_area(&b), 2500);
        assert_eq!(a.intersection_area(&Rect::new(200, 200, 300, 300)), 0);
    }

    #[test]
    fn test_rect_distance_squared() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.distance_squared(Point::new(5, 5)), 0);
        assert_eq!(r.distance_squared(Point::new(-3, 5)), 9);
        assert_eq!(r.distance_squared(Point::new(10, 10)), 2);
    }

    #[test]
    fn test_point_converts_to_viewport_space() {
        let p = kurbo::Point::from(Point::new(-3, 7));
        assert_eq!(p, kurbo::Point::new(-3.0, 7.0));
    }

    #[test]
    fn test_rect_contains_is_right_exclusive() {
        let r = Rect::from_origin_size(Point::new(10, 10), Size::new(5, 5));
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 14)));
    }
}
