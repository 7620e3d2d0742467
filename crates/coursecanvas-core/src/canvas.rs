//! Runtime course canvas: the document plus editing state.

use crate::document::CourseDocument;
use crate::editor::ElementEditor;
use crate::elements::{Element, ElementId, PartKind};
use crate::input::{InputState, Key, Modifiers, MouseButton, PointerEvent};
use crate::overlay::{Browser, EditOutcome, HeadlessOverlay, OverlayError, OverlayHost};
use crate::scene::{SceneError, SceneStore, Stage};
use crate::transform::NodeTransform;
use crate::widget::{HandleKind, WidgetManager};
use kurbo::Point;
use std::collections::HashMap;
use thiserror::Error;

/// Canvas errors.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Element not found: {0}")]
    UnknownElement(ElementId),
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Interaction routed to one element's editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Select,
    Deselect,
    FrameDragEnd { position: Point },
    TransformStart { handle: HandleKind, point: Point },
    TransformMove { point: Point, keep_aspect_ratio: bool, snap_rotation: bool },
    TransformEnd,
    PartDragMove { part: PartKind, position: Point },
    PartDragEnd { part: PartKind, position: Point },
    DoubleClick { part: PartKind },
    OverlayKey { key: Key, modifiers: Modifiers },
    OverlayInput,
    OutsideClick { target_is_overlay: bool },
}

/// What an event produced besides record changes.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorResponse {
    None,
    /// Bounded absolute position of a dragged part.
    Position(Point),
    /// Node state to display during a transform.
    Node(NodeTransform),
    /// Whether a double-click opened the inline editor.
    EditStarted(bool),
    Edit(EditOutcome),
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty stage or the page around it.
    Background,
    /// The inline edit text area.
    Overlay,
    /// An element's frame (`part: None`) or one of its parts.
    Element { id: ElementId, part: Option<PartKind> },
    /// A transformer handle.
    Handle { id: ElementId, kind: HandleKind },
}

/// Press in progress: what was grabbed and where it started.
#[derive(Debug, Clone, Copy)]
enum Press {
    Element { id: ElementId, part: Option<PartKind>, origin: Point },
    Handle { id: ElementId },
}

/// Document, widget state, scene and one editor per element.
#[derive(Debug)]
pub struct CourseCanvas<H: OverlayHost + Default = HeadlessOverlay> {
    pub document: CourseDocument,
    pub widgets: WidgetManager,
    scene: SceneStore,
    editors: HashMap<ElementId, ElementEditor<H>>,
    browser: Browser,
    input: InputState,
    press: Option<Press>,
}

impl<H: OverlayHost + Default> Default for CourseCanvas<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: OverlayHost + Default> CourseCanvas<H> {
    pub fn new() -> Self {
        Self::with_document(CourseDocument::new())
    }

    pub fn with_document(document: CourseDocument) -> Self {
        let mut canvas = Self {
            document,
            widgets: WidgetManager::new(),
            scene: SceneStore::new(),
            editors: HashMap::new(),
            browser: Browser::default(),
            input: InputState::new(),
            press: None,
        };
        canvas.sync_editors();
        canvas
    }

    /// Set the browser family used for overlay quirks.
    pub fn set_browser(&mut self, browser: Browser) {
        self.browser = browser;
        for editor in self.editors.values_mut() {
            editor.set_browser(browser);
        }
    }

    /// Shared handle to the scene store.
    pub fn scene(&self) -> SceneStore {
        self.scene.clone()
    }

    /// The editor page mounted its stage.
    pub fn mount_stage(&self, stage: Stage) -> CanvasResult<()> {
        Ok(self.scene.mount(stage)?)
    }

    /// The editor page is going away: commit any open edit, then clear the
    /// stage.
    pub fn unmount_stage(&mut self) -> CanvasResult<Option<Stage>> {
        self.commit_edits_except(None)?;
        Ok(self.scene.unmount()?)
    }

    pub fn editor(&self, id: ElementId) -> Option<&ElementEditor<H>> {
        self.editors.get(&id)
    }

    pub fn editor_mut(&mut self, id: ElementId) -> Option<&mut ElementEditor<H>> {
        self.editors.get_mut(&id)
    }

    /// Add an element and create its editor.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.document.add_element(element);
        self.ensure_editor(id);
        id
    }

    /// Remove an element, discarding any open edit on it.
    pub fn remove_element(&mut self, id: ElementId) -> CanvasResult<Option<Element>> {
        if let Some(editor) = self.editors.get_mut(&id) {
            editor.cancel_active(&mut self.widgets)?;
        }
        self.editors.remove(&id);
        self.widgets.remove(id);
        Ok(self.document.remove_element(id))
    }

    /// The element and part being edited in place.
    pub fn active_edit(&self) -> Option<(ElementId, PartKind)> {
        self.widgets.editing()
    }

    /// Route an event to the element's editor. Records it emits replace the
    /// document's copies.
    pub fn dispatch(&mut self, id: ElementId, event: EditorEvent) -> CanvasResult<EditorResponse> {
        let element = self
            .document
            .get_element(id)
            .cloned()
            .ok_or(CanvasError::UnknownElement(id))?;

        // Only one overlay on the page.
        if matches!(event, EditorEvent::Select | EditorEvent::DoubleClick { .. }) {
            self.commit_edits_except(Some(id))?;
        }

        self.ensure_editor(id);
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(CanvasError::UnknownElement(id))?;
        let widgets = &mut self.widgets;
        let mut changes = Vec::new();
        let mut on_change = |updated: Element| changes.push(updated);

        let response = match event {
            EditorEvent::Select => {
                editor.select(widgets);
                EditorResponse::None
            }
            EditorEvent::Deselect => {
                editor.deselect(&element, widgets, &mut on_change)?;
                EditorResponse::None
            }
            EditorEvent::FrameDragEnd { position } => {
                editor.drag_frame_end(&element, position, &mut on_change);
                EditorResponse::None
            }
            EditorEvent::TransformStart { handle, point } => {
                editor.transform_start(&element, handle, point);
                EditorResponse::None
            }
            EditorEvent::TransformMove { point, keep_aspect_ratio, snap_rotation } => editor
                .transform_move(point, keep_aspect_ratio, snap_rotation)
                .map_or(EditorResponse::None, EditorResponse::Node),
            EditorEvent::TransformEnd => match editor.live_node() {
                Some(mut node) => {
                    editor.transform_end(&element, &mut node, &mut on_change);
                    EditorResponse::Node(node)
                }
                None => EditorResponse::None,
            },
            EditorEvent::PartDragMove { part, position } => {
                EditorResponse::Position(editor.drag_move(&element, part, position))
            }
            EditorEvent::PartDragEnd { part, position } => {
                editor.drag_end(&element, part, position, &mut on_change);
                EditorResponse::None
            }
            EditorEvent::DoubleClick { part } => {
                EditorResponse::EditStarted(editor.double_click(&element, part, widgets, &mut on_change)?)
            }
            EditorEvent::OverlayKey { key, modifiers } => {
                EditorResponse::Edit(editor.overlay_key(&element, &key, modifiers, widgets, &mut on_change)?)
            }
            EditorEvent::OverlayInput => {
                editor.overlay_input()?;
                EditorResponse::None
            }
            EditorEvent::OutsideClick { target_is_overlay } => {
                EditorResponse::Edit(editor.outside_click(&element, target_is_overlay, widgets, &mut on_change)?)
            }
        };

        for updated in changes {
            self.document.apply_change(updated);
        }
        Ok(response)
    }

    /// A page click outside any element.
    pub fn click_outside(&mut self, target_is_overlay: bool) -> CanvasResult<EditorResponse> {
        self.edit_event(EditorEvent::OutsideClick { target_is_overlay })
    }

    /// Route an overlay event to the element being edited, if any.
    pub fn edit_event(&mut self, event: EditorEvent) -> CanvasResult<EditorResponse> {
        match self.widgets.editing() {
            Some((id, _)) => self.dispatch(id, event),
            None => Ok(EditorResponse::None),
        }
    }

    /// Modifier keys held during pointer gestures.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    /// Turn a raw pointer event into editor events.
    ///
    /// A press outside the overlay commits the open edit. A second press on
    /// the same part within the double-click window opens the inline editor.
    /// Presses that travel past the drag threshold drag the grabbed part or
    /// frame; presses on a handle drive the transformer, with shift keeping
    /// the aspect ratio and snapping rotation.
    pub fn pointer(&mut self, target: PointerTarget, event: PointerEvent) -> CanvasResult<EditorResponse> {
        match event {
            PointerEvent::Down { .. } => {
                self.input.handle_pointer_event(&event);
                self.pointer_down(target, event)
            }
            PointerEvent::Move { position } => {
                self.input.handle_pointer_event(&event);
                match self.press {
                    Some(press) => self.pointer_drag(press, position, false),
                    None => {
                        let hovered = match target {
                            PointerTarget::Element { id, .. } | PointerTarget::Handle { id, .. } => Some(id),
                            PointerTarget::Background | PointerTarget::Overlay => None,
                        };
                        self.widgets.set_hovered(hovered);
                        Ok(EditorResponse::None)
                    }
                }
            }
            PointerEvent::Up { position, .. } => {
                self.input.handle_pointer_event(&PointerEvent::Move { position });
                let response = match self.press.take() {
                    Some(press) => self.pointer_drag(press, position, true)?,
                    None => EditorResponse::None,
                };
                self.input.handle_pointer_event(&event);
                Ok(response)
            }
        }
    }

    fn pointer_down(&mut self, target: PointerTarget, event: PointerEvent) -> CanvasResult<EditorResponse> {
        self.press = None;
        if !matches!(event, PointerEvent::Down { button: MouseButton::Left, .. }) {
            return Ok(EditorResponse::None);
        }
        match target {
            PointerTarget::Overlay => self.click_outside(true),
            PointerTarget::Background => {
                let response = self.click_outside(false)?;
                self.widgets.clear_selection();
                Ok(response)
            }
            PointerTarget::Handle { id, kind } => {
                self.press = Some(Press::Handle { id });
                self.dispatch(id, EditorEvent::TransformStart { handle: kind, point: self.input.pointer_position })
            }
            PointerTarget::Element { id, part } => {
                let element = self
                    .document
                    .get_element(id)
                    .ok_or(CanvasError::UnknownElement(id))?;
                let origin = match part {
                    Some(kind) => element
                        .part_absolute_position(kind)
                        .ok_or(OverlayError::MissingPart(kind))?,
                    None => element.frame().position,
                };
                if let (true, Some(kind)) = (self.input.is_double_click(), part) {
                    return self.dispatch(id, EditorEvent::DoubleClick { part: kind });
                }
                self.click_outside(false)?;
                self.press = Some(Press::Element { id, part, origin });
                self.dispatch(id, EditorEvent::Select)
            }
        }
    }

    fn pointer_drag(&mut self, press: Press, position: Point, released: bool) -> CanvasResult<EditorResponse> {
        match press {
            Press::Handle { id } => {
                if released {
                    return self.dispatch(id, EditorEvent::TransformEnd);
                }
                let shift = self.input.modifiers.shift;
                self.dispatch(
                    id,
                    EditorEvent::TransformMove { point: position, keep_aspect_ratio: shift, snap_rotation: shift },
                )
            }
            Press::Element { id, part, origin } => {
                if !self.input.is_dragging() {
                    return Ok(EditorResponse::None);
                }
                let target = origin + self.input.drag_delta().unwrap_or_default();
                match (part, released) {
                    (Some(part), false) => self.dispatch(id, EditorEvent::PartDragMove { part, position: target }),
                    (Some(part), true) => self.dispatch(id, EditorEvent::PartDragEnd { part, position: target }),
                    (None, false) => Ok(EditorResponse::Position(target)),
                    (None, true) => self.dispatch(id, EditorEvent::FrameDragEnd { position: target }),
                }
            }
        }
    }

    /// Undo the last document change. Any open edit is discarded first.
    pub fn undo(&mut self) -> CanvasResult<bool> {
        self.cancel_edits()?;
        let undone = self.document.undo();
        self.sync_editors();
        Ok(undone)
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> CanvasResult<bool> {
        self.cancel_edits()?;
        let redone = self.document.redo();
        self.sync_editors();
        Ok(redone)
    }

    fn ensure_editor(&mut self, id: ElementId) {
        let scene = self.scene.clone();
        let browser = self.browser;
        self.editors
            .entry(id)
            .or_insert_with(|| ElementEditor::new(id, scene, H::default()).with_browser(browser));
    }

    /// Create editors for new elements and drop those of removed ones.
    fn sync_editors(&mut self) {
        let ids: Vec<ElementId> = self.document.elements.keys().copied().collect();
        for id in &ids {
            self.ensure_editor(*id);
        }
        let stale: Vec<ElementId> = self
            .editors
            .keys()
            .filter(|id| !self.document.elements.contains_key(id))
            .copied()
            .collect();
        for id in stale {
            self.editors.remove(&id);
            self.widgets.remove(id);
        }
    }

    fn commit_edits_except(&mut self, keep: Option<ElementId>) -> CanvasResult<()> {
        let editing: Vec<ElementId> = self
            .editors
            .iter()
            .filter(|(id, editor)| Some(**id) != keep && editor.is_editing())
            .map(|(id, _)| *id)
            .collect();
        for id in editing {
            let Some(element) = self.document.get_element(id).cloned() else {
                continue;
            };
            let mut changes = Vec::new();
            if let Some(editor) = self.editors.get_mut(&id) {
                editor.commit_active(&element, &mut self.widgets, &mut |updated| changes.push(updated))?;
            }
            for updated in changes {
                self.document.apply_change(updated);
            }
        }
        Ok(())
    }

    fn cancel_edits(&mut self) -> CanvasResult<()> {
        for editor in self.editors.values_mut() {
            editor.cancel_active(&mut self.widgets)?;
        }
        Ok(())
    }
}
