//! Offline course document inspection.

use coursecanvas_core::{CourseDocument, DocumentError, PartMargins, WidgetManager};
use coursecanvas_render::{DisplayListRenderer, RenderContext, Renderer, RendererError};
use kurbo::{Rect, Size, Vec2};
use thiserror::Error;

/// Viewport used when no stage size is given.
const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 720.0);

#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementLine {
    pub kind: &'static str,
    pub id: String,
    pub bounds: Rect,
}

/// Result of loading and re-clamping a document.
#[derive(Debug)]
pub struct InspectReport {
    pub document: CourseDocument,
    pub margin: Vec2,
    pub moved_parts: usize,
    pub display_items: usize,
    pub elements: Vec<ElementLine>,
}

impl InspectReport {
    pub fn lines(&self) -> Vec<String> {
        let title = if self.document.title.is_empty() { "(untitled)" } else { &self.document.title };
        let mut lines = vec![
            format!("{title}: {} elements", self.document.len()),
            format!(
                "margin {:.1}x{:.1}, {} parts re-clamped, {} draw commands",
                self.margin.x, self.margin.y, self.moved_parts, self.display_items
            ),
        ];
        for element in &self.elements {
            let b = element.bounds;
            lines.push(format!(
                "  {} {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
                element.kind,
                element.id,
                b.x0,
                b.y0,
                b.width(),
                b.height()
            ));
        }
        lines
    }
}

/// Parse a course document, clamp every part into its frame and build one frame.
///
/// With a stage size the margin is the default fraction of it, otherwise zero.
pub fn inspect_document(json: &str, stage: Option<Size>) -> Result<InspectReport, InspectError> {
    let mut document = CourseDocument::from_json(json)?;
    let margin = stage.map_or(Vec2::ZERO, |size| PartMargins::default().margin_for(size));
    let moved_parts = document.reclamp_all(margin);
    if moved_parts > 0 {
        log::info!("Re-clamped {moved_parts} parts");
    }

    let widgets = WidgetManager::new();
    let mut renderer = DisplayListRenderer::new();
    let ctx = RenderContext::new(&document, &widgets, stage.unwrap_or(DEFAULT_VIEWPORT));
    renderer.build_scene(&ctx)?;
    let display_items = renderer.items().len();

    let elements = document
        .elements_ordered()
        .map(|element| ElementLine {
            kind: element.kind_name(),
            id: element.id().to_string(),
            bounds: element.bounds(),
        })
        .collect();

    Ok(InspectReport {
        document,
        margin,
        moved_parts,
        display_items,
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecanvas_core::{Element, Flashcards, PartKind, TextBlock};
    use kurbo::Point;

    fn sample() -> (String, coursecanvas_core::ElementId) {
        let mut document = CourseDocument::new().with_title("Lesson 1");
        let mut card = Flashcards::new(Point::new(100.0, 100.0));
        card.word.position = Point::new(5000.0, -300.0);
        let id = document.add_element(Element::Flashcards(card));
        document.add_element(Element::TextBlock(TextBlock::new(Point::new(400.0, 50.0))));
        (document.to_json().unwrap(), id)
    }

    #[test]
    fn test_inspect_reclamps_stray_part() {
        let (json, id) = sample();
        let report = inspect_document(&json, None).unwrap();
        assert!(report.moved_parts >= 1);
        assert_eq!(report.margin, Vec2::ZERO);

        let element = report.document.get_element(id).unwrap();
        let frame = element.frame().as_rect();
        let word = element.part_bounds(PartKind::Word).unwrap();
        assert!(word.x0 >= frame.x0 && word.y0 >= frame.y0);
        assert!(word.x1 <= frame.x1 + 1e-9 || word.width() > frame.width());
    }

    #[test]
    fn test_inspect_uses_stage_margin() {
        let (json, _) = sample();
        let report = inspect_document(&json, Some(Size::new(1000.0, 800.0))).unwrap();
        assert_eq!(report.margin, Vec2::new(100.0, 40.0));
    }

    #[test]
    fn test_report_lines() {
        let (json, _) = sample();
        let report = inspect_document(&json, None).unwrap();
        let lines = report.lines();
        assert_eq!(lines[0], "Lesson 1: 2 elements");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("Flashcards"));
        assert!(report.display_items > 0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(inspect_document("{", None), Err(InspectError::Document(_))));
    }
}
