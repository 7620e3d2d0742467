//! Widget manager for tracking UI state of elements.

use super::handles::{Handle, transformer_handles};
use super::state::{EditingKind, WidgetState};
use crate::elements::{Element, ElementId, PartKind};
use std::collections::{HashMap, HashSet};

/// Manages UI state for all elements on the course canvas.
///
/// This separates UI concerns (selection, editing, hover) from
/// the pure element data.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    /// UI state for each element.
    states: HashMap<ElementId, WidgetState>,
    /// Currently selected elements (subset of states with Selected/Editing).
    selected: HashSet<ElementId>,
    /// Element that has keyboard focus (inline text editing).
    focused: Option<ElementId>,
    /// Element currently being hovered.
    hovered: Option<ElementId>,
}

impl WidgetManager {
    /// Create a new widget manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of an element.
    pub fn state(&self, id: ElementId) -> WidgetState {
        self.states.get(&id).cloned().unwrap_or_default()
    }

    /// Set the state of an element.
    pub fn set_state(&mut self, id: ElementId, state: WidgetState) {
        if state.is_selected() {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }

        if state.is_editing() {
            self.focused = Some(id);
        } else if self.focused == Some(id) {
            self.focused = None;
        }

        self.states.insert(id, state);
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Get all selected element IDs.
    pub fn selected(&self) -> &HashSet<ElementId> {
        &self.selected
    }

    /// Get the focused element ID (if any).
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Get the hovered element ID (if any).
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Set the hovered element.
    pub fn set_hovered(&mut self, id: Option<ElementId>) {
        if let Some(old_id) = self.hovered {
            if Some(old_id) != id && self.states.get(&old_id) == Some(&WidgetState::Hovered) {
                self.states.insert(old_id, WidgetState::Normal);
            }
        }

        if let Some(new_id) = id {
            if self.state(new_id) == WidgetState::Normal {
                self.states.insert(new_id, WidgetState::Hovered);
            }
        }

        self.hovered = id;
    }

    /// Select a single element (clears other selections).
    pub fn select(&mut self, id: ElementId) {
        if self.is_selected(id) && self.selected.len() == 1 {
            return;
        }
        self.clear_selection();
        self.set_state(id, WidgetState::Selected);
    }

    /// Remove an element from the selection.
    pub fn deselect(&mut self, id: ElementId) {
        if self.selected.contains(&id) {
            self.set_state(id, WidgetState::Normal);
        }
    }

    /// Clear all selections.
    pub fn clear_selection(&mut self) {
        let selected: Vec<_> = self.selected.iter().copied().collect();
        for id in selected {
            self.set_state(id, WidgetState::Normal);
        }
    }

    /// Enter inline text editing of one part.
    pub fn enter_editing(&mut self, id: ElementId, part: PartKind) {
        if let Some(old_id) = self.focused {
            if old_id != id {
                self.exit_editing();
            }
        }
        self.set_state(id, WidgetState::Editing(EditingKind::Text(part)));
    }

    /// Exit editing mode; the element stays selected.
    pub fn exit_editing(&mut self) {
        if let Some(id) = self.focused {
            self.set_state(id, WidgetState::Selected);
        }
    }

    /// Check if any element is being edited.
    pub fn is_editing(&self) -> bool {
        self.focused.is_some()
    }

    /// The element and part currently edited in place.
    pub fn editing(&self) -> Option<(ElementId, PartKind)> {
        let id = self.focused?;
        self.state(id).editing_part().map(|part| (id, part))
    }

    /// Remove state for a deleted element.
    pub fn remove(&mut self, id: ElementId) {
        self.states.remove(&id);
        self.selected.remove(&id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    /// Transformer handles for an element; empty unless selected and not editing.
    pub fn get_handles(&self, element: &Element) -> Vec<Handle> {
        if !self.state(element.id()).shows_transformer() {
            return vec![];
        }
        transformer_handles(element.bounds(), element.frame().rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Flashcards;
    use kurbo::Point;

    #[test]
    fn test_select_replaces_selection() {
        let mut widgets = WidgetManager::new();
        let a = ElementId::new_v4();
        let b = ElementId::new_v4();
        widgets.select(a);
        widgets.select(b);
        assert!(!widgets.is_selected(a));
        assert!(widgets.is_selected(b));
        assert_eq!(widgets.selected().len(), 1);
    }

    #[test]
    fn test_editing_flag_round_trip() {
        let mut widgets = WidgetManager::new();
        let id = ElementId::new_v4();
        widgets.select(id);
        widgets.enter_editing(id, PartKind::Input);
        assert_eq!(widgets.editing(), Some((id, PartKind::Input)));
        widgets.exit_editing();
        assert_eq!(widgets.editing(), None);
        assert_eq!(widgets.state(id), WidgetState::Selected);
    }

    #[test]
    fn test_editing_other_element_exits_previous() {
        let mut widgets = WidgetManager::new();
        let a = ElementId::new_v4();
        let b = ElementId::new_v4();
        widgets.enter_editing(a, PartKind::Theme);
        widgets.enter_editing(b, PartKind::Theme);
        assert_eq!(widgets.state(a), WidgetState::Selected);
        assert_eq!(widgets.editing(), Some((b, PartKind::Theme)));
    }

    #[test]
    fn test_handles_hidden_while_editing() {
        let element = Element::Flashcards(Flashcards::new(Point::ZERO));
        let mut widgets = WidgetManager::new();
        assert!(widgets.get_handles(&element).is_empty());
        widgets.select(element.id());
        assert_eq!(widgets.get_handles(&element).len(), 5);
        widgets.enter_editing(element.id(), PartKind::Theme);
        assert!(widgets.get_handles(&element).is_empty());
    }

    #[test]
    fn test_hover_does_not_override_selection() {
        let mut widgets = WidgetManager::new();
        let id = ElementId::new_v4();
        widgets.select(id);
        widgets.set_hovered(Some(id));
        assert_eq!(widgets.state(id), WidgetState::Selected);
        widgets.set_hovered(None);
        assert_eq!(widgets.hovered(), None);
    }

    #[test]
    fn test_remove_clears_focus() {
        let mut widgets = WidgetManager::new();
        let id = ElementId::new_v4();
        widgets.enter_editing(id, PartKind::Body);
        widgets.remove(id);
        assert!(!widgets.is_editing());
        assert!(!widgets.is_selected(id));
    }
}
