//! CourseCanvas Core Library
//!
//! Platform-agnostic element records, editing state and inline text editing
//! protocol for the course canvas editor.

pub mod bounds;
pub mod canvas;
pub mod course;
pub mod document;
pub mod editor;
pub mod elements;
pub mod input;
pub mod overlay;
pub mod scene;
pub mod transform;
pub mod widget;

pub use bounds::{DragBounds, PartMargins};
pub use canvas::{CanvasError, CanvasResult, CourseCanvas, EditorEvent, EditorResponse, PointerTarget};
pub use course::CourseSummary;
pub use document::{CourseDocument, DocumentError, DocumentResult};
pub use editor::ElementEditor;
pub use elements::{Element, ElementId, Flashcards, Part, PartKind, SerializableColor, TextBlock};
pub use input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use overlay::{Browser, EditOutcome, HeadlessOverlay, InlineEdit, OverlayError, OverlayHost, OverlayResult, OverlayStyle};
pub use scene::{SceneError, SceneStore, Stage};
pub use transform::{NodeTransform, TransformGesture, apply_transform_end};
pub use widget::{EditingKind, Handle, HandleKind, HandleShape, WidgetManager, WidgetState};
