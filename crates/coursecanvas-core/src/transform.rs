//! Frame transformer: live resize/rotate gestures and transform-end
//! normalization.
//!
//! While a transformer handle is dragged the node keeps its original size and
//! accumulates a scale factor. On transform-end the scale is baked into the
//! width/height and reset to 1, so records never carry a residual scale.

use crate::elements::{Element, Frame};
use crate::widget::HandleKind;
use kurbo::{Affine, Point, Size, Vec2};

/// Rotation snapping step in degrees.
const ROTATION_SNAP_DEG: f64 = 15.0;

/// Minimum frame dimension produced by a resize gesture.
const MIN_FRAME_SIZE: f64 = 1.0;

/// Transform state of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Point,
    /// Unscaled size.
    pub size: Size,
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl NodeTransform {
    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            position: frame.position,
            size: frame.size(),
            scale: Vec2::new(1.0, 1.0),
            rotation: frame.rotation,
        }
    }

    /// Size as displayed, i.e. with the scale applied.
    pub fn scaled_size(&self) -> Size {
        Size::new(self.size.width * self.scale.x, self.size.height * self.scale.y)
    }

    pub fn has_residual_scale(&self) -> bool {
        self.scale.x != 1.0 || self.scale.y != 1.0
    }

    /// Bake the scale into the size and reset the scale to 1.
    pub fn bake_scale(&mut self) -> Size {
        self.size = self.scaled_size();
        self.scale = Vec2::new(1.0, 1.0);
        self.size
    }
}

/// Apply a finished transform to an element: the node's scale is baked into
/// the frame size, the node is reset, and parts are re-clamped into the new
/// frame.
pub fn apply_transform_end(element: &Element, node: &mut NodeTransform, margin: Vec2) -> Element {
    let size = node.bake_scale();
    let mut updated = element.clone();
    let frame = updated.frame_mut();
    frame.position = node.position;
    frame.width = size.width;
    frame.height = size.height;
    frame.rotation = node.rotation;
    let moved = updated.reclamp_parts(margin);
    if moved > 0 {
        log::debug!("transform-end moved {} part(s) back inside frame", moved);
    }
    updated
}

/// An in-progress transformer drag.
#[derive(Debug, Clone)]
pub struct TransformGesture {
    original: NodeTransform,
    handle: HandleKind,
    start_point: Point,
    current_point: Point,
}

impl TransformGesture {
    pub fn new(original: NodeTransform, handle: HandleKind, start_point: Point) -> Self {
        Self {
            original,
            handle,
            start_point,
            current_point: start_point,
        }
    }

    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    pub fn update(&mut self, point: Point) {
        self.current_point = point;
    }

    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Current node state. Resizing changes position and scale only;
    /// `snap_rotation` rounds rotation to 15° steps.
    ///
    /// Resizing works in the frame's own axes: the pointer delta is rotated
    /// into frame space, the box is resized there and its new top-left is
    /// rotated back around the frame origin.
    pub fn node(&self, keep_aspect_ratio: bool, snap_rotation: bool) -> NodeTransform {
        let mut node = self.original;
        let original = self.original.scaled_size();
        let origin = self.original.position;
        let to_world = Affine::rotate(self.original.rotation.to_radians());
        let delta = to_world.inverse() * self.delta().to_point();
        let (w, h) = (original.width, original.height);

        let corners = match self.handle {
            HandleKind::TopLeft => Some((delta.x, delta.y, w, h)),
            HandleKind::TopRight => Some((0.0, delta.y, w + delta.x, h)),
            HandleKind::BottomLeft => Some((delta.x, 0.0, w, h + delta.y)),
            HandleKind::BottomRight => Some((0.0, 0.0, w + delta.x, h + delta.y)),
            HandleKind::Rotate => {
                let center = origin + (to_world * Point::new(w / 2.0, h / 2.0)).to_vec2();
                let to_cursor = self.current_point - center;
                let mut degrees = to_cursor.y.atan2(to_cursor.x).to_degrees() + 90.0;
                if snap_rotation {
                    degrees = (degrees / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG;
                }
                node.rotation = degrees.rem_euclid(360.0);
                None
            }
        };

        if let Some((nx0, ny0, nx1, ny1)) = corners {
            let (left, right) = if nx0 < nx1 { (nx0, nx1) } else { (nx1, nx0) };
            let (top, bottom) = if ny0 < ny1 { (ny0, ny1) } else { (ny1, ny0) };
            let (width, height) = if keep_aspect_ratio {
                let aspect = original.width / original.height.max(0.1);
                let side = (right - left).max(MIN_FRAME_SIZE).max(bottom - top);
                (side, side / aspect)
            } else {
                (
                    (right - left).max(MIN_FRAME_SIZE),
                    (bottom - top).max(MIN_FRAME_SIZE),
                )
            };
            node.position = origin + (to_world * Point::new(left, top)).to_vec2();
            node.scale = Vec2::new(
                scale_factor(width, self.original.size.width),
                scale_factor(height, self.original.size.height),
            );
        }
        node
    }
}

fn scale_factor(target: f64, base: f64) -> f64 {
    if base.abs() < f64::EPSILON { 1.0 } else { target / base }
}
