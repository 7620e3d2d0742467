//! Widget state definitions.

use crate::elements::PartKind;

/// The UI state of a widget/element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// Mouse is hovering over the widget.
    Hovered,
    /// Widget is selected (shows the transformer, can be moved/resized).
    Selected,
    /// Widget is in editing mode (e.g., inline text editing).
    Editing(EditingKind),
}

impl WidgetState {
    /// Check if widget is selected (either just selected or editing).
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Editing(_))
    }

    /// Check if widget is in editing mode.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// The part being edited in place, if any.
    pub fn editing_part(&self) -> Option<PartKind> {
        match self {
            Self::Editing(EditingKind::Text(part)) => Some(*part),
            _ => None,
        }
    }

    /// Whether the transformer handles should be drawn.
    pub fn shows_transformer(&self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// Kind of editing mode.
#[derive(Debug, Clone, PartialEq)]
pub enum EditingKind {
    /// Inline text editing of one part.
    Text(PartKind),
}
