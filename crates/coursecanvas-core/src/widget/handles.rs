//! Transformer handle definitions.

use kurbo::{Point, Rect};

/// Distance from the frame's top edge to the rotation handle (in world units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// A manipulation handle on a widget.
#[derive(Debug, Clone)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in world coordinates.
    pub position: Point,
    /// Visual shape of the handle.
    pub shape: HandleShape,
}

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotate,
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    /// Square handle (default for corners).
    #[default]
    Square,
    /// Circular handle (rotation).
    Circle,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            shape: HandleShape::default(),
        }
    }

    /// Set the handle shape.
    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Corner handles plus a rotation handle for a frame rotated by
/// `rotation_deg` around its top-left corner.
pub fn transformer_handles(frame: Rect, rotation_deg: f64) -> Vec<Handle> {
    let origin = frame.origin();
    let (sin_r, cos_r) = rotation_deg.to_radians().sin_cos();
    let rotate = |dx: f64, dy: f64| -> Point {
        Point::new(
            origin.x + dx * cos_r - dy * sin_r,
            origin.y + dx * sin_r + dy * cos_r,
        )
    };
    let w = frame.width();
    let h = frame.height();

    vec![
        Handle::new(HandleKind::TopLeft, rotate(0.0, 0.0)),
        Handle::new(HandleKind::TopRight, rotate(w, 0.0)),
        Handle::new(HandleKind::BottomLeft, rotate(0.0, h)),
        Handle::new(HandleKind::BottomRight, rotate(w, h)),
        Handle::new(HandleKind::Rotate, rotate(w / 2.0, -ROTATE_HANDLE_OFFSET))
            .with_shape(HandleShape::Circle),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handle(handles: &[Handle], point: Point, tolerance: f64) -> Option<HandleKind> {
    handles
        .iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrotated_handles() {
        let handles = transformer_handles(Rect::new(0.0, 0.0, 100.0, 50.0), 0.0);
        assert_eq!(handles.len(), 5);
        assert_eq!(handles[0].kind, HandleKind::TopLeft);
        assert_eq!(handles[3].position, Point::new(100.0, 50.0));
        assert_eq!(handles[4].kind, HandleKind::Rotate);
        assert_eq!(handles[4].shape, HandleShape::Circle);
        assert!((handles[4].position.y + ROTATE_HANDLE_OFFSET).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_handles_turn_around_origin() {
        let handles = transformer_handles(Rect::new(0.0, 0.0, 100.0, 50.0), 90.0);
        let top_right = handles[1].position;
        assert!(top_right.x.abs() < 1e-9);
        assert!((top_right.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_handle_hit_test() {
        let handles = transformer_handles(Rect::new(0.0, 0.0, 100.0, 50.0), 0.0);
        assert_eq!(
            hit_test_handle(&handles, Point::new(98.0, 52.0), 5.0),
            Some(HandleKind::BottomRight)
        );
        assert_eq!(hit_test_handle(&handles, Point::new(50.0, 25.0), 5.0), None);
    }
}
