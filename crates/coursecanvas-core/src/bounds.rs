//! Drag bound functions keeping element parts inside their frame.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Fractions of a reference size used as the frame's inner margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartMargins {
    pub x_fraction: f64,
    pub y_fraction: f64,
}

impl Default for PartMargins {
    fn default() -> Self {
        Self {
            x_fraction: 0.1,
            y_fraction: 0.05,
        }
    }
}

impl PartMargins {
    /// Resolve the margin against an explicitly supplied reference size
    /// (usually the stage size recorded when the editor mounted).
    pub fn margin_for(&self, reference: Size) -> Vec2 {
        Vec2::new(
            reference.width * self.x_fraction,
            reference.height * self.y_fraction,
        )
    }
}

/// Allowed range for a part's top-left corner inside a frame.
///
/// Horizontally `frame.x + margin.x <= x <= frame.x + margin.x + frame.width - part.width`,
/// vertically the same with `y`/`height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    frame: Rect,
    margin: Vec2,
}

impl DragBounds {
    pub fn new(frame: Rect, margin: Vec2) -> Self {
        Self { frame, margin }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn margin(&self) -> Vec2 {
        self.margin
    }

    /// The rectangle a part's top-left corner may occupy.
    /// May be inverted when the part is larger than the frame allows.
    pub fn allowed(&self, part_size: Size) -> Rect {
        let x0 = self.frame.x0 + self.margin.x;
        let y0 = self.frame.y0 + self.margin.y;
        Rect::new(
            x0,
            y0,
            x0 + self.frame.width() - part_size.width,
            y0 + self.frame.height() - part_size.height,
        )
    }

    /// Clamp a requested top-left position.
    pub fn clamp(&self, requested: Point, part_size: Size) -> Point {
        let allowed = self.allowed(part_size);
        Point::new(
            clamp_axis(requested.x, allowed.x0, allowed.x1),
            clamp_axis(requested.y, allowed.y0, allowed.y1),
        )
    }

    /// Whether a position is already within bounds.
    pub fn contains(&self, position: Point, part_size: Size) -> bool {
        self.clamp(position, part_size) == position
    }
}

/// Clamp one axis. An inverted or NaN range pins to the lower bound; a NaN
/// lower bound leaves the value alone.
fn clamp_axis(value: f64, lower: f64, upper: f64) -> f64 {
    if lower.is_nan() {
        if value.is_nan() { 0.0 } else { value }
    } else if value.is_nan() || !(lower <= upper) {
        lower
    } else {
        value.clamp(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DragBounds {
        DragBounds::new(
            Rect::new(100.0, 50.0, 500.0, 350.0),
            Vec2::new(20.0, 10.0),
        )
    }

    #[test]
    fn test_inside_is_untouched() {
        let p = Point::new(200.0, 100.0);
        assert_eq!(bounds().clamp(p, Size::new(50.0, 20.0)), p);
    }

    #[test]
    fn test_clamps_each_side() {
        let b = bounds();
        let size = Size::new(50.0, 20.0);
        assert_eq!(b.clamp(Point::new(0.0, 0.0), size), Point::new(120.0, 60.0));
        // 100 + 20 + 400 - 50, 50 + 10 + 300 - 20
        assert_eq!(b.clamp(Point::new(1e6, 1e6), size), Point::new(470.0, 340.0));
    }

    #[test]
    fn test_bound_holds_and_is_idempotent() {
        let b = bounds();
        let size = Size::new(80.0, 30.0);
        let frame = b.frame();
        let margin = b.margin();
        let mut x = -300.0;
        while x <= 900.0 {
            let mut y = -300.0;
            while y <= 700.0 {
                let once = b.clamp(Point::new(x, y), size);
                assert!(once.x >= frame.x0 + margin.x);
                assert!(once.x <= frame.x0 + margin.x + frame.width() - size.width);
                assert!(once.y >= frame.y0 + margin.y);
                assert!(once.y <= frame.y0 + margin.y + frame.height() - size.height);
                assert_eq!(b.clamp(once, size), once);
                y += 37.5;
            }
            x += 41.0;
        }
    }

    #[test]
    fn test_oversized_part_pins_to_lower_bound() {
        let b = bounds();
        let huge = Size::new(1000.0, 1000.0);
        let p = b.clamp(Point::new(300.0, 300.0), huge);
        assert_eq!(p, Point::new(120.0, 60.0));
        assert_eq!(b.clamp(p, huge), p);
    }

    #[test]
    fn test_nan_pins_to_lower_bound() {
        let p = bounds().clamp(Point::new(f64::NAN, 100.0), Size::new(10.0, 10.0));
        assert_eq!(p, Point::new(120.0, 100.0));
    }

    #[test]
    fn test_nan_bounds_do_not_panic() {
        assert_eq!(clamp_axis(5.0, 1e308, f64::NAN), 1e308);
        assert_eq!(clamp_axis(5.0, f64::NAN, 10.0), 5.0);
        assert_eq!(clamp_axis(f64::NAN, f64::NAN, f64::NAN), 0.0);

        let b = DragBounds::new(Rect::new(1e308, 0.0, f64::INFINITY, 100.0), Vec2::ZERO);
        let p = b.clamp(Point::new(3.0, 4.0), Size::new(f64::INFINITY, 10.0));
        assert_eq!(p.x, 1e308);
    }

    #[test]
    fn test_margins_follow_reference_size() {
        let margin = PartMargins::default().margin_for(Size::new(1000.0, 800.0));
        assert!((margin.x - 100.0).abs() < 1e-9);
        assert!((margin.y - 40.0).abs() < 1e-9);
    }
}
