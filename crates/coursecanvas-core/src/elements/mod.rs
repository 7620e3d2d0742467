//! Course element records.
//!
//! An element is a frame plus a set of named parts (text labels, input boxes,
//! buttons). Part positions are stored relative to the frame origin, the same
//! way a scene-graph group positions its children.

mod flashcards;
mod frame;
mod parts;
mod text_block;

pub use flashcards::Flashcards;
pub use frame::Frame;
pub use parts::{BoxPart, Part, ResultPart, TextPart, TextStyle};
pub use text_block::TextBlock;

use crate::bounds::DragBounds;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for course elements.
pub type ElementId = Uuid;

/// RGBA8 color, serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as a CSS color usable by the overlay editor.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_css()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Vertical text alignment inside a part's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Named part of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Flashcard theme label.
    Theme,
    /// Flashcard prompt word.
    Word,
    /// Flashcard meaning.
    Meaning,
    /// Flashcard answer feedback.
    Result,
    /// Flashcard answer input box.
    Input,
    /// Flashcard submit button.
    Button,
    /// Text block body.
    Body,
}

impl PartKind {
    /// Display name of the part.
    pub fn name(&self) -> &'static str {
        match self {
            PartKind::Theme => "Theme",
            PartKind::Word => "Word",
            PartKind::Meaning => "Meaning",
            PartKind::Result => "Result",
            PartKind::Input => "Input",
            PartKind::Button => "Button",
            PartKind::Body => "Body",
        }
    }

    /// Whether double-clicking this part opens the inline text editor.
    /// The result label is filled at runtime and is not authored in place.
    pub fn is_text_editable(&self) -> bool {
        !matches!(self, PartKind::Result)
    }
}

/// A course element (tagged by kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Flashcards(Flashcards),
    TextBlock(TextBlock),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Flashcards(e) => e.id,
            Element::TextBlock(e) => e.id,
        }
    }

    /// Display name of the element kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Flashcards(_) => "Flashcards",
            Element::TextBlock(_) => "Text block",
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            Element::Flashcards(e) => &e.frame,
            Element::TextBlock(e) => &e.frame,
        }
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            Element::Flashcards(e) => &mut e.frame,
            Element::TextBlock(e) => &mut e.frame,
        }
    }

    /// Frame bounds in stage coordinates.
    pub fn bounds(&self) -> Rect {
        self.frame().as_rect()
    }

    /// The parts this element carries, back to front.
    pub fn part_kinds(&self) -> &'static [PartKind] {
        match self {
            Element::Flashcards(_) => Flashcards::PARTS,
            Element::TextBlock(_) => TextBlock::PARTS,
        }
    }

    pub fn part(&self, kind: PartKind) -> Option<&dyn Part> {
        match self {
            Element::Flashcards(e) => e.part(kind),
            Element::TextBlock(e) => e.part(kind),
        }
    }

    pub fn part_mut(&mut self, kind: PartKind) -> Option<&mut dyn Part> {
        match self {
            Element::Flashcards(e) => e.part_mut(kind),
            Element::TextBlock(e) => e.part_mut(kind),
        }
    }

    /// Absolute (stage) position of a part.
    pub fn part_absolute_position(&self, kind: PartKind) -> Option<Point> {
        let origin = self.frame().position;
        self.part(kind).map(|p| origin + p.position().to_vec2())
    }

    /// Absolute (stage) bounds of a part.
    pub fn part_bounds(&self, kind: PartKind) -> Option<Rect> {
        let position = self.part_absolute_position(kind)?;
        let size = self.part(kind)?.size();
        Some(Rect::from_origin_size(position, size))
    }

    /// Return a copy with one part's text replaced; every other field is kept.
    pub fn with_part_text(&self, kind: PartKind, text: &str) -> Option<Element> {
        let mut updated = self.clone();
        updated.part_mut(kind)?.set_text(text.to_string());
        Some(updated)
    }

    /// Hook run after a part was dragged. Dragging the result label hides it.
    pub(crate) fn after_part_drag(&mut self, kind: PartKind) {
        if let (Element::Flashcards(card), PartKind::Result) = (self, kind) {
            card.result.visible = false;
        }
    }

    /// Clamp every part back inside the frame's padded bounds.
    /// Returns the number of parts that moved.
    pub fn reclamp_parts(&mut self, margin: Vec2) -> usize {
        let frame = self.bounds();
        let origin = frame.origin();
        let mut moved = 0;
        for &kind in self.part_kinds() {
            let Some(part) = self.part_mut(kind) else {
                continue;
            };
            let size: Size = part.size();
            let bounds = DragBounds::new(frame, margin);
            let absolute = origin + part.position().to_vec2();
            let clamped = bounds.clamp(absolute, size);
            if clamped != absolute {
                part.set_position(clamped - origin.to_vec2());
                moved += 1;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::from_hex("#12ab34"),
            Some(SerializableColor::new(0x12, 0xab, 0x34, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 0x80))
        );
        assert_eq!(
            SerializableColor::from_hex("transparent"),
            Some(SerializableColor::transparent())
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12"), None);
    }

    #[test]
    fn test_color_rejects_non_hex_digits() {
        assert_eq!(SerializableColor::from_hex("#é1"), None);
        assert_eq!(SerializableColor::from_hex("#+f+f+f"), None);
        assert_eq!(SerializableColor::from_hex("#12345é"), None);
    }

    #[test]
    fn test_reclamp_survives_overflowing_geometry() {
        let mut card = Flashcards::new(Point::new(1e308, 0.0));
        card.frame.width = 1e308;
        card.word.style.font_size = 1e308;
        let mut element = Element::Flashcards(card);
        element.reclamp_parts(Vec2::ZERO);
        let word = element.part(PartKind::Word).unwrap().position();
        assert!(word.x.is_finite() && word.y.is_finite());
    }

    #[test]
    fn test_color_css_output() {
        assert_eq!(SerializableColor::new(255, 0, 16, 255).to_css(), "#ff0010");
        assert_eq!(SerializableColor::new(0, 0, 0, 0).to_css(), "#00000000");
    }

    #[test]
    fn test_element_json_is_tagged() {
        let element = Element::TextBlock(TextBlock::new(Point::new(10.0, 20.0)));
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["kind"], "text_block");
        assert_eq!(json["frame"]["x"], 10.0);

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_with_part_text_keeps_siblings() {
        let element = Element::Flashcards(Flashcards::new(Point::new(0.0, 0.0)));
        let updated = element.with_part_text(PartKind::Theme, "Animals").unwrap();

        assert_eq!(updated.part(PartKind::Theme).unwrap().text(), "Animals");
        let (Element::Flashcards(before), Element::Flashcards(after)) = (&element, &updated) else {
            panic!("kind changed");
        };
        assert_eq!(before.theme.position, after.theme.position);
        assert_eq!(before.theme.style, after.theme.style);
        assert_eq!(before.word, after.word);
        assert_eq!(before.frame, after.frame);
    }

    #[test]
    fn test_part_missing_on_other_kind() {
        let element = Element::TextBlock(TextBlock::new(Point::ZERO));
        assert!(element.part(PartKind::Button).is_none());
        assert!(element.with_part_text(PartKind::Theme, "x").is_none());
    }

    #[test]
    fn test_reclamp_after_shrink() {
        let mut element = Element::Flashcards(Flashcards::new(Point::new(100.0, 100.0)));
        element.frame_mut().width = 120.0;
        element.frame_mut().height = 90.0;
        let margin = Vec2::new(10.0, 5.0);
        element.reclamp_parts(margin);

        let frame = element.bounds();
        for &kind in element.part_kinds() {
            let bounds = element.part_bounds(kind).unwrap();
            let drag = DragBounds::new(frame, margin);
            assert_eq!(drag.clamp(bounds.origin(), bounds.size()), bounds.origin());
        }
    }

    #[test]
    fn test_result_hidden_after_drag() {
        let mut element = Element::Flashcards(Flashcards::new(Point::ZERO));
        element.after_part_drag(PartKind::Result);
        let Element::Flashcards(card) = element else {
            panic!("kind changed");
        };
        assert!(!card.result.visible);
    }
}
