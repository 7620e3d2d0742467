//! Flashcards element.

use super::{
    BoxPart, ElementId, Frame, Part, PartKind, ResultPart, SerializableColor, TextAlign,
    TextPart, TextStyle, VerticalAlign,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flashcard: a theme, a prompt word and its meaning, an answer box with a
/// submit button, and a result label showing feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcards {
    pub(crate) id: ElementId,
    pub frame: Frame,
    pub theme: TextPart,
    pub word: TextPart,
    pub meaning: TextPart,
    pub result: ResultPart,
    pub input: BoxPart,
    pub button: BoxPart,
}

impl Flashcards {
    pub const DEFAULT_WIDTH: f64 = 480.0;
    pub const DEFAULT_HEIGHT: f64 = 320.0;

    /// Parts in paint order.
    pub const PARTS: &'static [PartKind] = &[
        PartKind::Theme,
        PartKind::Word,
        PartKind::Meaning,
        PartKind::Result,
        PartKind::Input,
        PartKind::Button,
    ];

    /// Create a flashcard with the default layout at `position`.
    pub fn new(position: Point) -> Self {
        let mut frame = Frame::new(position, Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT);
        frame.fill = SerializableColor::new(0xf4, 0xf1, 0xde, 255);
        frame.corner_radius = 12.0;

        let accent = SerializableColor::new(0x3b, 0x82, 0xf6, 255);

        let mut input = BoxPart::new(Point::new(48.0, 220.0), 240.0, 40.0, "");
        input.stroke = Some(SerializableColor::new(0x9c, 0xa3, 0xaf, 255));
        input.stroke_width = 1.0;
        input.corner_radius = 6.0;
        input.align = TextAlign::Left;

        let mut button = BoxPart::new(Point::new(304.0, 220.0), 120.0, 40.0, "Check");
        button.background_fill = accent;
        button.text_fill = SerializableColor::white();
        button.corner_radius = 6.0;

        Self {
            id: Uuid::new_v4(),
            frame,
            theme: TextPart::new(Point::new(48.0, 16.0), "Theme")
                .with_style(TextStyle::default().with_font_size(24.0)),
            word: TextPart::new(Point::new(48.0, 72.0), "Word").with_style(
                TextStyle::default()
                    .with_font_size(32.0)
                    .with_align(TextAlign::Center, VerticalAlign::Middle),
            ),
            meaning: TextPart::new(Point::new(48.0, 124.0), "Meaning").with_style(
                TextStyle::default().with_align(TextAlign::Center, VerticalAlign::Middle),
            ),
            result: ResultPart {
                label: TextPart::new(Point::new(48.0, 172.0), "Correct!")
                    .with_style(TextStyle::default().with_fill(accent)),
                answer: String::new(),
                visible: false,
            },
            input,
            button,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn part(&self, kind: PartKind) -> Option<&dyn Part> {
        match kind {
            PartKind::Theme => Some(&self.theme),
            PartKind::Word => Some(&self.word),
            PartKind::Meaning => Some(&self.meaning),
            PartKind::Result => Some(&self.result),
            PartKind::Input => Some(&self.input),
            PartKind::Button => Some(&self.button),
            PartKind::Body => None,
        }
    }

    pub fn part_mut(&mut self, kind: PartKind) -> Option<&mut dyn Part> {
        match kind {
            PartKind::Theme => Some(&mut self.theme),
            PartKind::Word => Some(&mut self.word),
            PartKind::Meaning => Some(&mut self.meaning),
            PartKind::Result => Some(&mut self.result),
            PartKind::Input => Some(&mut self.input),
            PartKind::Button => Some(&mut self.button),
            PartKind::Body => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parts_fit_frame() {
        let card = Flashcards::new(Point::new(0.0, 0.0));
        for &kind in Flashcards::PARTS {
            let part = card.part(kind).unwrap();
            let right = part.position().x + part.size().width;
            let bottom = part.position().y + part.size().height;
            assert!(right <= card.frame.width, "{} overflows", kind.name());
            assert!(bottom <= card.frame.height, "{} overflows", kind.name());
        }
    }

    #[test]
    fn test_body_is_not_a_flashcard_part() {
        let card = Flashcards::new(Point::ZERO);
        assert!(card.part(PartKind::Body).is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_nested_fields() {
        let card = Flashcards::new(Point::new(3.0, 4.0));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["result"]["visible"], false);
        assert_eq!(json["button"]["text"], "Check");
        assert_eq!(json["theme"]["fontSize"], 24.0);
        let back: Flashcards = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }
}
