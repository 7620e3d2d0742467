//! Text block element.

use super::{ElementId, Frame, Part, PartKind, TextPart};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A frame holding a single paragraph of course text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub(crate) id: ElementId,
    pub frame: Frame,
    pub body: TextPart,
}

impl TextBlock {
    pub const PARTS: &'static [PartKind] = &[PartKind::Body];

    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(position, 400.0, 160.0),
            body: TextPart::new(Point::new(16.0, 16.0), "Text").with_size(368.0, 128.0),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn part(&self, kind: PartKind) -> Option<&dyn Part> {
        match kind {
            PartKind::Body => Some(&self.body),
            _ => None,
        }
    }

    pub fn part_mut(&mut self, kind: PartKind) -> Option<&mut dyn Part> {
        match kind {
            PartKind::Body => Some(&mut self.body),
            _ => None,
        }
    }
}
