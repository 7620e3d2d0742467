//! Overlay geometry and styling.

use super::{OverlayError, OverlayResult};
use crate::elements::{Element, PartKind, SerializableColor, TextAlign};
use crate::scene::Stage;
use kurbo::{Point, Vec2};

/// Extra height added to the initial text area height.
const INITIAL_HEIGHT_SLACK: f64 = 5.0;
/// Extra height added once the browser has measured the content.
const SETTLE_HEIGHT_SLACK: f64 = 3.0;

/// Browser families with text area layout quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Browser {
    Firefox,
    Safari,
    Edge,
    #[default]
    Other,
}

impl Browser {
    /// Detect the browser family from a `navigator.userAgent` string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let lower = user_agent.to_lowercase();
        // Legacy Edge also advertises Chrome and Safari.
        if user_agent.contains("Edge") {
            Browser::Edge
        } else if lower.contains("firefox") {
            Browser::Firefox
        } else if lower.contains("safari") && !lower.contains("chrome") && !lower.contains("android") {
            Browser::Safari
        } else {
            Browser::Other
        }
    }

    /// Vertical nudge applied to the text area so its text lines up with the
    /// canvas text.
    pub fn vertical_nudge(&self, font_size: f64) -> f64 {
        match self {
            Browser::Firefox => 2.0 + (font_size / 20.0).round(),
            _ => 0.0,
        }
    }
}

/// Absolute style of the overlay text area, in page pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub font_family: String,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub text_align: TextAlign,
    pub color: SerializableColor,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Upward shift in pixels.
    pub translate_y: f64,
}

impl OverlayStyle {
    /// Lay the overlay over `part` of `element` on a mounted stage.
    pub fn for_part(element: &Element, part: PartKind, stage: &Stage, browser: Browser) -> OverlayResult<Self> {
        let node = element.part(part).ok_or(OverlayError::MissingPart(part))?;
        let frame = element.frame();
        let style = node.text_style();
        let size = node.size();

        // Parts rotate with their frame around the frame origin.
        let offset = rotate(node.position().to_vec2(), frame.rotation);
        let page = stage.to_page(frame.position + offset);

        Ok(Self {
            left: page.x,
            top: page.y,
            width: size.width - style.padding * 2.0,
            height: size.height - style.padding * 2.0 + INITIAL_HEIGHT_SLACK,
            font_size: style.font_size,
            font_family: style.font_family,
            line_height: style.line_height,
            text_align: style.align,
            color: style.fill,
            rotation: frame.rotation,
            translate_y: browser.vertical_nudge(style.font_size),
        })
    }

    /// Page position of the overlay's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Resize to the content once the host has laid it out.
    pub fn settle(&mut self, scroll_height: f64) {
        self.height = scroll_height + SETTLE_HEIGHT_SLACK;
    }

    /// Grow after input so the next line is already visible.
    pub fn grow(&mut self, scroll_height: f64) {
        self.height = scroll_height + self.font_size;
    }

    /// Match the width to the node's displayed width. An empty node gets
    /// room for its placeholder.
    pub fn fit_width(&mut self, node_width: f64, absolute_scale: f64, placeholder_len: usize, browser: Browser) {
        let mut width = node_width * absolute_scale;
        if width == 0.0 || width.is_nan() {
            width = placeholder_len as f64 * self.font_size;
        }
        match browser {
            Browser::Safari | Browser::Firefox => width = width.ceil(),
            Browser::Edge => width += 1.0,
            Browser::Other => {}
        }
        self.width = width;
    }

    /// CSS `transform` value, `none` without rotation or nudge.
    pub fn transform_css(&self) -> String {
        let mut transform = String::new();
        if self.rotation != 0.0 {
            transform.push_str(&format!("rotateZ({}deg)", self.rotation));
        }
        if self.translate_y != 0.0 {
            transform.push_str(&format!("translateY(-{}px)", self.translate_y));
        }
        if transform.is_empty() {
            transform.push_str("none");
        }
        transform
    }

    /// Inline style declarations for the text area.
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("top", format!("{}px", self.top)),
            ("left", format!("{}px", self.left)),
            ("width", format!("{}px", self.width)),
            ("height", format!("{}px", self.height)),
            ("font-size", format!("{}px", self.font_size)),
            ("border", "none".to_string()),
            ("padding", "0px".to_string()),
            ("margin", "0px".to_string()),
            ("overflow", "hidden".to_string()),
            ("background", "none".to_string()),
            ("outline", "none".to_string()),
            ("resize", "none".to_string()),
            ("line-height", self.line_height.to_string()),
            ("font-family", self.font_family.clone()),
            ("transform-origin", "left top".to_string()),
            ("text-align", self.text_align.as_css().to_string()),
            ("color", self.color.to_css()),
            ("transform", self.transform_css()),
        ]
    }
}

fn rotate(v: Vec2, degrees: f64) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
