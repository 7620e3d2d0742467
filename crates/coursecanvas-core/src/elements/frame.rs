//! Element frame.

use super::SerializableColor;
use kurbo::{Point, Rect, RoundedRect, Size};
use serde::{Deserialize, Serialize};

/// The outer bounding shape of an element. Parts are laid out in its
/// coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Top-left corner in stage coordinates.
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub fill: SerializableColor,
    #[serde(default)]
    pub stroke: Option<SerializableColor>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: f64,
    /// Rotation in degrees around the top-left corner.
    #[serde(default)]
    pub rotation: f64,
}

impl Frame {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            fill: SerializableColor::white(),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
            rotation: 0.0,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn as_rounded_rect(&self) -> RoundedRect {
        RoundedRect::from_rect(self.as_rect(), self.corner_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rect() {
        let frame = Frame::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let rect = frame.as_rect();
        assert!((rect.x1 - 110.0).abs() < f64::EPSILON);
        assert!((rect.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_frame_json_is_flat() {
        let frame = Frame::new(Point::new(1.0, 2.0), 3.0, 4.0);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["y"], 2.0);
        assert_eq!(json["fill"], "#ffffff");
        assert_eq!(json["cornerRadius"], 0.0);
    }
}
