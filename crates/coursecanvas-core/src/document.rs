//! Course document and state management.

use crate::elements::{Element, ElementId};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid course document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A snapshot of document state for undo/redo.
#[derive(Debug, Clone)]
struct DocumentSnapshot {
    elements: HashMap<ElementId, Element>,
    z_order: Vec<ElementId>,
}

/// A course page: element records plus their paint order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDocument {
    /// Unique document identifier.
    pub id: String,
    /// Course title.
    pub title: String,
    /// All elements in the document, keyed by ID.
    pub elements: HashMap<ElementId, Element>,
    /// Z-order of elements (back to front).
    pub z_order: Vec<ElementId>,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
}

impl Default for CourseDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: "Untitled course".to_string(),
            elements: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.elements = snapshot.elements;
        self.z_order = snapshot.z_order;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add an element on top.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.push_undo();
        if !self.z_order.contains(&id) {
            self.z_order.push(id);
        }
        self.elements.insert(id, element);
        id
    }

    /// Remove an element.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        if !self.elements.contains_key(&id) {
            return None;
        }
        self.push_undo();
        self.z_order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    /// Replace a record with its updated version.
    /// Returns false (and changes nothing) for unknown elements.
    pub fn apply_change(&mut self, element: Element) -> bool {
        let id = element.id();
        match self.elements.get(&id) {
            None => {
                log::warn!("Dropping change for unknown element {}", id);
                false
            }
            Some(current) if *current == element => true,
            Some(_) => {
                self.push_undo();
                self.elements.insert(id, element);
                true
            }
        }
    }

    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Elements in z-order (back to front).
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, id: ElementId) {
        if self.elements.contains_key(&id) {
            self.z_order.retain(|&element_id| element_id != id);
            self.z_order.push(id);
        }
    }

    /// Clamp every element's parts back into its frame.
    /// Returns the number of parts moved.
    pub fn reclamp_all(&mut self, margin: Vec2) -> usize {
        self.elements
            .values_mut()
            .map(|element| element.reclamp_parts(margin))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON. Ids missing from the z-order are
    /// appended so every element is drawn.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        document.z_order.retain(|id| document.elements.contains_key(id));
        let mut missing: Vec<ElementId> = document
            .elements
            .keys()
            .filter(|id| !document.z_order.contains(id))
            .copied()
            .collect();
        missing.sort();
        document.z_order.extend(missing);
        Ok(document)
    }
}
