//! Element parts: text labels, boxes (input/button) and the result label.

use super::{SerializableColor, TextAlign, VerticalAlign};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.55;

/// Common interface of element parts.
pub trait Part {
    /// Position relative to the frame origin.
    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Size of the part's node on the stage.
    fn size(&self) -> Size;

    fn text(&self) -> &str;

    fn set_text(&mut self, text: String);

    /// Font and alignment used to draw (and edit) the part's text.
    fn text_style(&self) -> TextStyle;
}

fn default_font_size() -> f64 {
    20.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_line_height() -> f64 {
    1.0
}

/// Font and alignment attributes of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "SerializableColor::black")]
    pub fill: SerializableColor,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub padding: f64,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_family: default_font_family(),
            fill: SerializableColor::black(),
            align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            padding: 0.0,
            line_height: default_line_height(),
        }
    }
}

impl TextStyle {
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_align(mut self, align: TextAlign, vertical_align: VerticalAlign) -> Self {
        self.align = align;
        self.vertical_align = vertical_align;
        self
    }
}

/// A free-standing text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPart {
    #[serde(flatten)]
    pub position: Point,
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
    /// Fixed width; measured from the content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Fixed height; measured from the content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl TextPart {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            style: TextStyle::default(),
            width: None,
            height: None,
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Approximate width from the longest line.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .text
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        max_line_len as f64 * self.style.font_size * CHAR_WIDTH_FACTOR + self.style.padding * 2.0
    }

    /// Approximate height from the line count (a trailing newline opens a line).
    fn approximate_height(&self) -> f64 {
        let line_count = self.text.split('\n').count().max(1);
        line_count as f64 * self.style.font_size * self.style.line_height
            + self.style.padding * 2.0
    }
}

impl Part for TextPart {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> Size {
        Size::new(
            self.width.unwrap_or_else(|| self.approximate_width()),
            self.height.unwrap_or_else(|| self.approximate_height()),
        )
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn text_style(&self) -> TextStyle {
        self.style.clone()
    }
}

/// A filled box with a centered label (answer input, submit button).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPart {
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    pub background_fill: SerializableColor,
    pub text_fill: SerializableColor,
    #[serde(default)]
    pub stroke: Option<SerializableColor>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
}

impl BoxPart {
    pub fn new(position: Point, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            position,
            width,
            height,
            text: text.into(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            background_fill: SerializableColor::white(),
            text_fill: SerializableColor::black(),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
            align: TextAlign::Center,
            vertical_align: VerticalAlign::Middle,
        }
    }
}

impl Part for BoxPart {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            fill: self.text_fill,
            align: self.align,
            vertical_align: self.vertical_align,
            padding: 0.0,
            line_height: default_line_height(),
        }
    }
}

/// Answer feedback label: a text label with the expected answer attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPart {
    #[serde(flatten)]
    pub label: TextPart,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub visible: bool,
}

impl Part for ResultPart {
    fn position(&self) -> Point {
        self.label.position
    }

    fn set_position(&mut self, position: Point) {
        self.label.position = position;
    }

    fn size(&self) -> Size {
        self.label.size()
    }

    fn text(&self) -> &str {
        &self.label.text
    }

    fn set_text(&mut self, text: String) {
        self.label.text = text;
    }

    fn text_style(&self) -> TextStyle {
        self.label.style.clone()
    }
}
