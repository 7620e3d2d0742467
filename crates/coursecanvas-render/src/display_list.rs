//! Display list renderer.
//!
//! Produces a flat list of draw commands that a platform backend (canvas 2D,
//! GPU, snapshot tests) can replay.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use coursecanvas_core::elements::{Element, ElementId, Part, PartKind, SerializableColor, TextStyle};
use coursecanvas_core::widget::{HandleKind, HandleShape};
use kurbo::{Affine, Point, Rect, RoundedRect, Size};

/// One draw command. Colors are RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Filled (and optionally stroked) rounded rectangle.
    Shape {
        element: ElementId,
        part: Option<PartKind>,
        shape: RoundedRect,
        transform: Affine,
        fill: SerializableColor,
        stroke: Option<(SerializableColor, f64)>,
    },
    /// Text laid out in a box.
    Text {
        element: ElementId,
        part: PartKind,
        text: String,
        bounds: Rect,
        transform: Affine,
        style: TextStyle,
    },
    /// Dashed outline of a selected frame.
    SelectionOutline {
        element: ElementId,
        rect: Rect,
        transform: Affine,
        color: SerializableColor,
    },
    /// Transformer handle, in stage coordinates.
    Handle {
        element: ElementId,
        kind: HandleKind,
        shape: HandleShape,
        rect: Rect,
        color: SerializableColor,
    },
}

impl DisplayItem {
    pub fn element(&self) -> ElementId {
        match self {
            DisplayItem::Shape { element, .. }
            | DisplayItem::Text { element, .. }
            | DisplayItem::SelectionOutline { element, .. }
            | DisplayItem::Handle { element, .. } => *element,
        }
    }
}

/// Renderer that records draw commands.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    items: Vec<DisplayItem>,
    background: Option<SerializableColor>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last built frame, back to front.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn take_items(&mut self) -> Vec<DisplayItem> {
        std::mem::take(&mut self.items)
    }

    /// Background of the last built frame.
    pub fn background(&self) -> Option<SerializableColor> {
        self.background
    }

    /// Whether the last frame draws the text of a part.
    pub fn draws_text(&self, id: ElementId, kind: PartKind) -> bool {
        self.items.iter().any(|item| {
            matches!(item, DisplayItem::Text { element, part, .. } if *element == id && *part == kind)
        })
    }

    /// Number of transformer handles drawn for an element.
    pub fn handle_count(&self, id: ElementId) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Handle { element, .. } if *element == id))
            .count()
    }

    fn render_element(&mut self, element: &Element, ctx: &RenderContext) -> RenderResult<()> {
        let id = element.id();
        let frame = element.frame();
        let finite = frame.position.is_finite()
            && frame.width.is_finite()
            && frame.height.is_finite()
            && frame.rotation.is_finite();
        if !finite {
            return Err(RendererError::RenderFailed(format!(
                "{} {} has a non-finite frame",
                element.kind_name(),
                id
            )));
        }

        let transform = Affine::translate(frame.position.to_vec2()) * Affine::rotate(frame.rotation.to_radians());
        let local = Rect::from_origin_size(Point::ZERO, frame.size());
        self.items.push(DisplayItem::Shape {
            element: id,
            part: None,
            shape: local.to_rounded_rect(frame.corner_radius),
            transform,
            fill: frame.fill,
            stroke: frame.stroke.map(|c| (c, frame.stroke_width)),
        });

        let selection_color: SerializableColor = ctx.selection_color.into();
        let state = ctx.widgets.state(id);
        let editing = state.editing_part();
        for &kind in element.part_kinds() {
            self.render_part(element, kind, transform, editing == Some(kind));
        }

        if state.is_selected() {
            self.items.push(DisplayItem::SelectionOutline {
                element: id,
                rect: local,
                transform,
                color: selection_color,
            });
        }

        let half = ctx.handle_size / 2.0;
        for handle in ctx.widgets.get_handles(element) {
            let center = handle.position;
            self.items.push(DisplayItem::Handle {
                element: id,
                kind: handle.kind,
                shape: handle.shape,
                rect: Rect::new(center.x - half, center.y - half, center.x + half, center.y + half),
                color: selection_color,
            });
        }
        Ok(())
    }

    fn render_part(&mut self, element: &Element, kind: PartKind, transform: Affine, hidden_text: bool) {
        let id = element.id();
        let (position, size, text, style, background) = match element {
            Element::Flashcards(card) => match kind {
                PartKind::Input | PartKind::Button => {
                    let part = if kind == PartKind::Input { &card.input } else { &card.button };
                    let rect = Rect::from_origin_size(part.position, Size::new(part.width, part.height));
                    let background = DisplayItem::Shape {
                        element: id,
                        part: Some(kind),
                        shape: rect.to_rounded_rect(part.corner_radius),
                        transform,
                        fill: part.background_fill,
                        stroke: part.stroke.map(|c| (c, part.stroke_width)),
                    };
                    let style = part.text_style();
                    (part.position, rect.size(), part.text.clone(), style, Some(background))
                }
                PartKind::Result if !card.result.visible => return,
                _ => match element.part(kind) {
                    Some(part) => (part.position(), part.size(), part.text().to_string(), part.text_style(), None),
                    None => return,
                },
            },
            Element::TextBlock(_) => match element.part(kind) {
                Some(part) => (part.position(), part.size(), part.text().to_string(), part.text_style(), None),
                None => return,
            },
        };

        if let Some(background) = background {
            self.items.push(background);
        }
        if hidden_text {
            return;
        }
        let padding = style.padding;
        let bounds = Rect::from_origin_size(position, size).inset(-padding);
        self.items.push(DisplayItem::Text {
            element: id,
            part: kind,
            text,
            bounds,
            transform,
            style,
        });
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.items.clear();
        self.background = Some(self.background_color(ctx).into());
        for element in ctx.document.elements_ordered() {
            self.render_element(element, ctx)?;
        }
        log::trace!("Built display list with {} items", self.items.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecanvas_core::canvas::{CourseCanvas, EditorEvent};
    use coursecanvas_core::elements::{Flashcards, TextBlock};
    use coursecanvas_core::input::{Key, Modifiers};
    use coursecanvas_core::scene::Stage;

    fn build(canvas: &CourseCanvas) -> DisplayListRenderer {
        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::for_canvas(canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx).unwrap();
        renderer
    }

    fn canvas_with_card() -> (CourseCanvas, ElementId) {
        let mut canvas = CourseCanvas::new();
        canvas
            .mount_stage(Stage::new(Point::ZERO, Size::new(800.0, 600.0)))
            .unwrap();
        let id = canvas.add_element(Element::Flashcards(Flashcards::new(Point::new(50.0, 50.0))));
        (canvas, id)
    }

    #[test]
    fn test_build_empty_scene() {
        let canvas = CourseCanvas::new();
        let renderer = build(&canvas);
        assert!(renderer.items().is_empty());
        assert_eq!(renderer.background(), Some(SerializableColor::new(250, 250, 250, 255)));
    }

    #[test]
    fn test_hidden_result_is_not_drawn() {
        let (canvas, id) = canvas_with_card();
        let renderer = build(&canvas);
        assert!(renderer.draws_text(id, PartKind::Word));
        assert!(renderer.draws_text(id, PartKind::Button));
        assert!(!renderer.draws_text(id, PartKind::Result));
        assert_eq!(renderer.handle_count(id), 0);
    }

    #[test]
    fn test_selection_draws_transformer() {
        let (mut canvas, id) = canvas_with_card();
        canvas.dispatch(id, EditorEvent::Select).unwrap();
        let renderer = build(&canvas);
        assert_eq!(renderer.handle_count(id), 5);
    }

    #[test]
    fn test_editing_hides_text_and_transformer() {
        let (mut canvas, id) = canvas_with_card();
        canvas.dispatch(id, EditorEvent::Select).unwrap();
        canvas.dispatch(id, EditorEvent::DoubleClick { part: PartKind::Theme }).unwrap();

        let renderer = build(&canvas);
        assert!(!renderer.draws_text(id, PartKind::Theme));
        assert!(renderer.draws_text(id, PartKind::Word));
        assert_eq!(renderer.handle_count(id), 0);

        canvas
            .dispatch(id, EditorEvent::OverlayKey { key: Key::Escape, modifiers: Modifiers::NONE })
            .unwrap();
        let renderer = build(&canvas);
        assert!(renderer.draws_text(id, PartKind::Theme));
        assert_eq!(renderer.handle_count(id), 5);
    }

    #[test]
    fn test_editing_button_keeps_its_box() {
        let (mut canvas, id) = canvas_with_card();
        canvas.dispatch(id, EditorEvent::DoubleClick { part: PartKind::Button }).unwrap();
        let renderer = build(&canvas);
        assert!(!renderer.draws_text(id, PartKind::Button));
        assert!(renderer.items().iter().any(|item| matches!(
            item,
            DisplayItem::Shape { part: Some(PartKind::Button), .. }
        )));
    }

    #[test]
    fn test_z_order() {
        let (mut canvas, card) = canvas_with_card();
        let block = canvas.add_element(Element::TextBlock(TextBlock::new(Point::ZERO)));
        let renderer = build(&canvas);
        let first = renderer.items().first().map(DisplayItem::element);
        let last = renderer.items().last().map(DisplayItem::element);
        assert_eq!(first, Some(card));
        assert_eq!(last, Some(block));
    }

    #[test]
    fn test_non_finite_rotation_fails() {
        let (mut canvas, id) = canvas_with_card();
        let mut element = canvas.document.get_element(id).cloned().unwrap();
        element.frame_mut().rotation = f64::INFINITY;
        canvas.document.apply_change(element);

        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::for_canvas(&canvas, Size::new(800.0, 600.0));
        assert!(matches!(renderer.build_scene(&ctx), Err(RendererError::RenderFailed(_))));
    }

    #[test]
    fn test_non_finite_frame_fails() {
        let (mut canvas, id) = canvas_with_card();
        let mut element = canvas.document.get_element(id).cloned().unwrap();
        element.frame_mut().width = f64::NAN;
        canvas.document.apply_change(element);

        let mut renderer = DisplayListRenderer::new();
        let ctx = RenderContext::for_canvas(&canvas, Size::new(800.0, 600.0));
        assert!(renderer.build_scene(&ctx).is_err());
    }
}
