//! Overlay hosts.

use super::{OverlayError, OverlayResult, OverlayStyle};

/// Owner of the on-page text area.
pub trait OverlayHost {
    /// Create the text area with `text` and focus it.
    fn mount(&mut self, style: &OverlayStyle, text: &str) -> OverlayResult<()>;

    /// Apply a new style to the mounted text area.
    fn restyle(&mut self, style: &OverlayStyle) -> OverlayResult<()>;

    /// Height of the content as laid out by the host.
    fn scroll_height(&mut self) -> OverlayResult<f64>;

    /// Current text.
    fn value(&self) -> OverlayResult<String>;

    /// Remove the text area.
    fn unmount(&mut self) -> OverlayResult<()>;

    fn is_mounted(&self) -> bool;
}

#[derive(Debug, Clone)]
struct HeadlessArea {
    style: OverlayStyle,
    value: String,
}

/// In-memory overlay for native builds and tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOverlay {
    area: Option<HeadlessArea>,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text as if the user typed it.
    pub fn set_value(&mut self, value: impl Into<String>) -> OverlayResult<()> {
        let area = self.area.as_mut().ok_or(OverlayError::NotMounted)?;
        area.value = value.into();
        Ok(())
    }

    pub fn style(&self) -> Option<&OverlayStyle> {
        self.area.as_ref().map(|area| &area.style)
    }
}

impl OverlayHost for HeadlessOverlay {
    fn mount(&mut self, style: &OverlayStyle, text: &str) -> OverlayResult<()> {
        if self.area.is_some() {
            return Err(OverlayError::AlreadyMounted);
        }
        self.area = Some(HeadlessArea {
            style: style.clone(),
            value: text.to_string(),
        });
        Ok(())
    }

    fn restyle(&mut self, style: &OverlayStyle) -> OverlayResult<()> {
        let area = self.area.as_mut().ok_or(OverlayError::NotMounted)?;
        area.style = style.clone();
        Ok(())
    }

    fn scroll_height(&mut self) -> OverlayResult<f64> {
        let area = self.area.as_ref().ok_or(OverlayError::NotMounted)?;
        let lines = area.value.split('\n').count().max(1);
        Ok(lines as f64 * area.style.font_size * area.style.line_height)
    }

    fn value(&self) -> OverlayResult<String> {
        self.area
            .as_ref()
            .map(|area| area.value.clone())
            .ok_or(OverlayError::NotMounted)
    }

    fn unmount(&mut self) -> OverlayResult<()> {
        self.area.take().map(|_| ()).ok_or(OverlayError::NotMounted)
    }

    fn is_mounted(&self) -> bool {
        self.area.is_some()
    }
}
