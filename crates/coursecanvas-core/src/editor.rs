//! Per-element editor.
//!
//! An [`ElementEditor`] never owns the element record. Every operation gets
//! the current record by reference and reports an updated record through
//! `on_change`; the caller decides where records live.

use crate::bounds::{DragBounds, PartMargins};
use crate::elements::{Element, ElementId, PartKind};
use crate::input::{Key, Modifiers};
use crate::overlay::{Browser, EditOutcome, HeadlessOverlay, InlineEdit, OverlayError, OverlayHost, OverlayResult};
use crate::scene::SceneStore;
use crate::transform::{NodeTransform, TransformGesture, apply_transform_end};
use crate::widget::{HandleKind, WidgetManager};
use kurbo::{Point, Vec2};

/// Interaction state for one element.
#[derive(Debug)]
pub struct ElementEditor<H: OverlayHost = HeadlessOverlay> {
    element_id: ElementId,
    scene: SceneStore,
    margins: PartMargins,
    browser: Browser,
    host: H,
    edit: Option<InlineEdit>,
    gesture: Option<TransformGesture>,
    live_node: Option<NodeTransform>,
}

impl<H: OverlayHost> ElementEditor<H> {
    pub fn new(element_id: ElementId, scene: SceneStore, host: H) -> Self {
        Self {
            element_id,
            scene,
            margins: PartMargins::default(),
            browser: Browser::default(),
            host,
            edit: None,
            gesture: None,
            live_node: None,
        }
    }

    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }

    pub fn set_browser(&mut self, browser: Browser) {
        self.browser = browser;
    }

    pub fn with_margins(mut self, margins: PartMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn element_id(&self) -> ElementId {
        self.element_id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether an inline edit is open.
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Frame margin resolved against the mounted stage size.
    pub fn margin(&self) -> Vec2 {
        match self.scene.stage() {
            Ok(stage) => self.margins.margin_for(stage.size),
            Err(err) => {
                log::debug!("No stage for part margins ({}), using zero margin", err);
                Vec2::ZERO
            }
        }
    }

    /// Drag bounds for the parts of `element`.
    pub fn drag_bounds(&self, element: &Element) -> DragBounds {
        DragBounds::new(element.bounds(), self.margin())
    }

    /// Attach the transformer.
    pub fn select(&mut self, widgets: &mut WidgetManager) {
        widgets.select(self.element_id);
    }

    /// Detach the transformer, committing any open edit first.
    pub fn deselect(
        &mut self,
        element: &Element,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<()> {
        let committed = self.commit_active(element, widgets, on_change);
        widgets.deselect(self.element_id);
        committed
    }

    /// The frame was dragged to `position`.
    pub fn drag_frame_end(&self, element: &Element, position: Point, on_change: &mut dyn FnMut(Element)) {
        let mut updated = element.clone();
        updated.frame_mut().position = position;
        on_change(updated);
    }

    /// A transformer handle was grabbed.
    pub fn transform_start(&mut self, element: &Element, handle: HandleKind, point: Point) {
        let node = NodeTransform::from_frame(element.frame());
        self.gesture = Some(TransformGesture::new(node, handle, point));
        self.live_node = Some(node);
    }

    /// The grabbed handle moved. Returns the node to display.
    pub fn transform_move(&mut self, point: Point, keep_aspect_ratio: bool, snap_rotation: bool) -> Option<NodeTransform> {
        let gesture = self.gesture.as_mut()?;
        gesture.update(point);
        let node = gesture.node(keep_aspect_ratio, snap_rotation);
        self.live_node = Some(node);
        Some(node)
    }

    /// Node of the gesture in progress.
    pub fn live_node(&self) -> Option<NodeTransform> {
        self.live_node
    }

    /// The transform finished: bake the node's scale into the frame and
    /// report the record.
    pub fn transform_end(&mut self, element: &Element, node: &mut NodeTransform, on_change: &mut dyn FnMut(Element)) {
        self.gesture = None;
        self.live_node = None;
        let updated = apply_transform_end(element, node, self.margin());
        on_change(updated);
    }

    /// Bounded absolute position for a part being dragged to `requested`.
    pub fn drag_move(&self, element: &Element, part: PartKind, requested: Point) -> Point {
        match element.part(part) {
            Some(node) => self.drag_bounds(element).clamp(requested, node.size()),
            None => requested,
        }
    }

    /// A part drag finished at `requested`.
    pub fn drag_end(&self, element: &Element, part: PartKind, requested: Point, on_change: &mut dyn FnMut(Element)) {
        let bounded = self.drag_move(element, part, requested);
        let mut updated = element.clone();
        let origin = updated.frame().position;
        let Some(node) = updated.part_mut(part) else {
            log::warn!("{} has no {} part", element.kind_name(), part.name());
            return;
        };
        node.set_position(bounded - origin.to_vec2());
        updated.after_part_drag(part);
        on_change(updated);
    }

    /// Open the inline editor over `part`. Returns false for parts that are
    /// not edited in place.
    pub fn double_click(
        &mut self,
        element: &Element,
        part: PartKind,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<bool> {
        if !part.is_text_editable() {
            log::debug!("{} is not edited in place", part.name());
            return Ok(false);
        }
        // One overlay per editor.
        self.commit_active(element, widgets, on_change)?;

        let stage = self.scene.stage()?;
        let mut edit = InlineEdit::begin(element, part, &stage, self.browser)?;
        self.host.mount(edit.style(), edit.original_text())?;
        let settled = self
            .host
            .scroll_height()
            .and_then(|height| self.host.restyle(edit.on_mounted(height)));
        if let Err(err) = settled {
            self.host.unmount()?;
            return Err(err);
        }

        widgets.enter_editing(self.element_id, part);
        log::debug!("Editing {} of {}", part.name(), self.element_id);
        self.edit = Some(edit);
        Ok(true)
    }

    /// Key pressed in the overlay.
    pub fn overlay_key(
        &mut self,
        element: &Element,
        key: &Key,
        modifiers: Modifiers,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<EditOutcome> {
        let edit = self.edit.as_ref().ok_or(OverlayError::NotMounted)?;
        let outcome = edit.on_key(key, modifiers, &self.host.value()?);
        self.resolve(element, &outcome, widgets, on_change)?;
        Ok(outcome)
    }

    /// Overlay content changed.
    pub fn overlay_input(&mut self) -> OverlayResult<()> {
        let edit = self.edit.as_mut().ok_or(OverlayError::NotMounted)?;
        let height = self.host.scroll_height()?;
        self.host.restyle(edit.on_input(height))
    }

    /// A click landed somewhere on the page.
    pub fn outside_click(
        &mut self,
        element: &Element,
        target_is_overlay: bool,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<EditOutcome> {
        let Some(edit) = self.edit.as_ref() else {
            return Ok(EditOutcome::Continue);
        };
        let outcome = edit.on_click(target_is_overlay, &self.host.value()?);
        self.resolve(element, &outcome, widgets, on_change)?;
        Ok(outcome)
    }

    /// Commit the open edit, if any.
    pub fn commit_active(
        &mut self,
        element: &Element,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<()> {
        if self.edit.is_none() {
            return Ok(());
        }
        let value = self.host.value()?;
        self.resolve(element, &EditOutcome::Commit(value), widgets, on_change)
    }

    /// Close the open edit without touching the record.
    pub fn cancel_active(&mut self, widgets: &mut WidgetManager) -> OverlayResult<()> {
        self.resolve_cancel(widgets)
    }

    fn resolve(
        &mut self,
        element: &Element,
        outcome: &EditOutcome,
        widgets: &mut WidgetManager,
        on_change: &mut dyn FnMut(Element),
    ) -> OverlayResult<()> {
        match outcome {
            EditOutcome::Continue => Ok(()),
            EditOutcome::Cancel => self.resolve_cancel(widgets),
            EditOutcome::Commit(text) => {
                let Some(edit) = self.edit.take() else {
                    return Ok(());
                };
                let closed = self.close(widgets);
                let updated = edit.apply(element, text)?;
                on_change(updated);
                closed
            }
        }
    }

    fn resolve_cancel(&mut self, widgets: &mut WidgetManager) -> OverlayResult<()> {
        if self.edit.take().is_some() {
            self.close(widgets)
        } else {
            Ok(())
        }
    }

    /// Unmount the overlay and clear the editing flag.
    fn close(&mut self, widgets: &mut WidgetManager) -> OverlayResult<()> {
        if widgets.focused() == Some(self.element_id) {
            widgets.exit_editing();
        }
        if self.host.is_mounted() {
            self.host.unmount()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Flashcards, TextBlock};
    use crate::scene::Stage;
    use crate::widget::WidgetState;
    use kurbo::Size;

    struct Fixture {
        element: Element,
        editor: ElementEditor,
        widgets: WidgetManager,
        changes: Vec<Element>,
    }

    fn fixture() -> Fixture {
        let scene = SceneStore::new();
        scene
            .mount(Stage::new(Point::new(0.0, 0.0), Size::new(1000.0, 800.0)))
            .unwrap();
        let element = Element::Flashcards(Flashcards::new(Point::new(200.0, 100.0)));
        let editor = ElementEditor::new(element.id(), scene, HeadlessOverlay::new());
        Fixture {
            element,
            editor,
            widgets: WidgetManager::new(),
            changes: Vec::new(),
        }
    }

    impl Fixture {
        fn double_click(&mut self, part: PartKind) -> bool {
            let changes = &mut self.changes;
            self.editor
                .double_click(&self.element, part, &mut self.widgets, &mut |e| changes.push(e))
                .unwrap()
        }

        fn key(&mut self, key: Key, modifiers: Modifiers) -> EditOutcome {
            let changes = &mut self.changes;
            self.editor
                .overlay_key(&self.element, &key, modifiers, &mut self.widgets, &mut |e| changes.push(e))
                .unwrap()
        }

        fn click(&mut self, target_is_overlay: bool) -> EditOutcome {
            let changes = &mut self.changes;
            self.editor
                .outside_click(&self.element, target_is_overlay, &mut self.widgets, &mut |e| changes.push(e))
                .unwrap()
        }
    }

    #[test]
    fn test_enter_commits_only_edited_text() {
        let mut f = fixture();
        f.editor.select(&mut f.widgets);
        assert!(f.double_click(PartKind::Word));
        assert_eq!(
            f.widgets.state(f.element.id()),
            WidgetState::Editing(crate::widget::EditingKind::Text(PartKind::Word))
        );

        f.editor.host_mut().set_value("Hund").unwrap();
        assert_eq!(f.key(Key::Enter, Modifiers::NONE), EditOutcome::Commit("Hund".into()));

        assert_eq!(f.changes.len(), 1);
        let expected = f.element.with_part_text(PartKind::Word, "Hund").unwrap();
        assert_eq!(f.changes[0], expected);
        assert!(!f.editor.host().is_mounted());
        assert!(!f.widgets.is_editing());
        assert_eq!(f.widgets.state(f.element.id()), WidgetState::Selected);
    }

    #[test]
    fn test_shift_enter_keeps_editing() {
        let mut f = fixture();
        f.double_click(PartKind::Meaning);
        assert_eq!(f.key(Key::Enter, Modifiers::SHIFT), EditOutcome::Continue);
        assert!(f.editor.is_editing());
        assert!(f.changes.is_empty());
    }

    #[test]
    fn test_escape_leaves_record_unchanged() {
        let mut f = fixture();
        f.double_click(PartKind::Theme);
        f.editor.host_mut().set_value("discarded").unwrap();
        assert_eq!(f.key(Key::Escape, Modifiers::NONE), EditOutcome::Cancel);
        assert!(f.changes.is_empty());
        assert!(!f.editor.host().is_mounted());
        assert!(!f.widgets.is_editing());
    }

    #[test]
    fn test_outside_click_commits() {
        let mut f = fixture();
        f.double_click(PartKind::Button);
        f.editor.host_mut().set_value("Go").unwrap();
        assert_eq!(f.click(true), EditOutcome::Continue);
        assert!(f.changes.is_empty());
        assert_eq!(f.click(false), EditOutcome::Commit("Go".into()));
        assert_eq!(f.changes[0].part(PartKind::Button).unwrap().text(), "Go");
        assert!(!f.editor.is_editing());
    }

    #[test]
    fn test_second_double_click_commits_first_edit() {
        let mut f = fixture();
        f.double_click(PartKind::Theme);
        f.editor.host_mut().set_value("Animals").unwrap();
        f.double_click(PartKind::Word);
        assert_eq!(f.changes.len(), 1);
        assert_eq!(f.changes[0].part(PartKind::Theme).unwrap().text(), "Animals");
        assert!(f.editor.host().is_mounted());
        assert_eq!(f.widgets.editing(), Some((f.element.id(), PartKind::Word)));
    }

    #[test]
    fn test_result_double_click_is_ignored() {
        let mut f = fixture();
        assert!(!f.double_click(PartKind::Result));
        assert!(!f.editor.host().is_mounted());
    }

    #[test]
    fn test_double_click_without_stage_fails() {
        let element = Element::TextBlock(TextBlock::new(Point::ZERO));
        let mut editor = ElementEditor::new(element.id(), SceneStore::new(), HeadlessOverlay::new());
        let mut widgets = WidgetManager::new();
        let err = editor
            .double_click(&element, PartKind::Body, &mut widgets, &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, OverlayError::Scene(_)));
        assert!(!widgets.is_editing());
    }

    #[test]
    fn test_input_grows_overlay() {
        let mut f = fixture();
        f.double_click(PartKind::Meaning);
        f.editor.host_mut().set_value("one\ntwo").unwrap();
        f.editor.overlay_input().unwrap();
        let style = f.editor.host().style().unwrap();
        // two lines of 20px plus one font size
        assert!((style.height - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_is_bounded() {
        let f = fixture();
        // stage 1000x800: margin (100, 40)
        assert_eq!(f.editor.margin(), Vec2::new(100.0, 40.0));
        let bounded = f.editor.drag_move(&f.element, PartKind::Input, Point::new(-500.0, -500.0));
        assert_eq!(bounded, Point::new(300.0, 140.0));
    }

    #[test]
    fn test_drag_end_stores_relative_position() {
        let mut f = fixture();
        let changes = &mut f.changes;
        f.editor
            .drag_end(&f.element, PartKind::Word, Point::new(320.0, 180.0), &mut |e| changes.push(e));
        let moved = f.changes[0].part(PartKind::Word).unwrap().position();
        assert_eq!(moved, Point::new(120.0, 80.0));
    }

    #[test]
    fn test_drag_end_hides_result() {
        let mut f = fixture();
        let Element::Flashcards(card) = &mut f.element else {
            unreachable!()
        };
        card.result.visible = true;
        let changes = &mut f.changes;
        f.editor
            .drag_end(&f.element, PartKind::Result, Point::new(320.0, 250.0), &mut |e| changes.push(e));
        let Element::Flashcards(card) = &f.changes[0] else {
            unreachable!()
        };
        assert!(!card.result.visible);
    }

    #[test]
    fn test_transform_gesture_end() {
        let mut f = fixture();
        f.editor.transform_start(&f.element, HandleKind::BottomRight, Point::new(680.0, 420.0));
        let node = f.editor.transform_move(Point::new(920.0, 420.0), false, false).unwrap();
        assert!((node.scale.x - 1.5).abs() < 1e-9);

        let mut node = f.editor.live_node().unwrap();
        let changes = &mut f.changes;
        f.editor.transform_end(&f.element, &mut node, &mut |e| changes.push(e));
        assert_eq!(node.scale, Vec2::new(1.0, 1.0));
        assert!((f.changes[0].frame().width - 720.0).abs() < 1e-9);
        assert!(f.editor.live_node().is_none());
    }

    #[test]
    fn test_deselect_commits_edit() {
        let mut f = fixture();
        f.editor.select(&mut f.widgets);
        f.double_click(PartKind::Theme);
        f.editor.host_mut().set_value("Food").unwrap();
        let changes = &mut f.changes;
        f.editor
            .deselect(&f.element, &mut f.widgets, &mut |e| changes.push(e))
            .unwrap();
        assert_eq!(f.changes[0].part(PartKind::Theme).unwrap().text(), "Food");
        assert!(!f.widgets.is_selected(f.element.id()));
    }
}
