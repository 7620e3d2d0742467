//! One inline edit, from double-click to commit or cancel.

use super::{Browser, OverlayError, OverlayResult, OverlayStyle};
use crate::elements::{Element, ElementId, PartKind};
use crate::input::{Key, Modifiers};
use crate::scene::Stage;

/// Placeholder shown by the text area while it is empty.
pub const PLACEHOLDER: &str = "Type here";

/// What the editor should do after an overlay event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Keep editing.
    Continue,
    /// Write this text into the part and close the overlay.
    Commit(String),
    /// Close the overlay and leave the record as it was.
    Cancel,
}

/// State of an active inline edit.
#[derive(Debug, Clone)]
pub struct InlineEdit {
    element_id: ElementId,
    part: PartKind,
    original_text: String,
    node_width: f64,
    absolute_scale: f64,
    browser: Browser,
    style: OverlayStyle,
}

impl InlineEdit {
    /// Start editing `part` of `element`.
    pub fn begin(element: &Element, part: PartKind, stage: &Stage, browser: Browser) -> OverlayResult<Self> {
        if !part.is_text_editable() {
            return Err(OverlayError::PartNotEditable(part));
        }
        let node = element.part(part).ok_or(OverlayError::MissingPart(part))?;
        let style = OverlayStyle::for_part(element, part, stage, browser)?;
        Ok(Self {
            element_id: element.id(),
            part,
            original_text: node.text().to_string(),
            node_width: node.size().width,
            absolute_scale: stage.scale,
            browser,
            style,
        })
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn part(&self) -> PartKind {
        self.part
    }

    /// Text of the part when the edit started.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// The host laid out the initial text; fit the height to it.
    pub fn on_mounted(&mut self, scroll_height: f64) -> &OverlayStyle {
        self.style.settle(scroll_height);
        &self.style
    }

    /// Content changed; resize to fit.
    pub fn on_input(&mut self, scroll_height: f64) -> &OverlayStyle {
        self.style.fit_width(
            self.node_width,
            self.absolute_scale,
            PLACEHOLDER.chars().count(),
            self.browser,
        );
        self.style.grow(scroll_height);
        &self.style
    }

    /// Enter commits unless Shift is held, Escape cancels.
    pub fn on_key(&self, key: &Key, modifiers: Modifiers, value: &str) -> EditOutcome {
        match key {
            Key::Enter if !modifiers.shift => EditOutcome::Commit(value.to_string()),
            Key::Escape => EditOutcome::Cancel,
            _ => EditOutcome::Continue,
        }
    }

    /// A click anywhere but the overlay commits.
    pub fn on_click(&self, target_is_overlay: bool, value: &str) -> EditOutcome {
        if target_is_overlay {
            EditOutcome::Continue
        } else {
            EditOutcome::Commit(value.to_string())
        }
    }

    /// Record with the edited part's text replaced.
    pub fn apply(&self, element: &Element, text: &str) -> OverlayResult<Element> {
        element
            .with_part_text(self.part, text)
            .ok_or(OverlayError::MissingPart(self.part))
    }
}
