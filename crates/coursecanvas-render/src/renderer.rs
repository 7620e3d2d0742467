//! Renderer trait abstraction.

use coursecanvas_core::canvas::CourseCanvas;
use coursecanvas_core::document::CourseDocument;
use coursecanvas_core::overlay::OverlayHost;
use coursecanvas_core::widget::WidgetManager;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The course page to render.
    pub document: &'a CourseDocument,
    /// Selection and editing state.
    pub widgets: &'a WidgetManager,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Transformer and selection outline color.
    pub selection_color: Color,
    /// Transformer handle size in pixels.
    pub handle_size: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(document: &'a CourseDocument, widgets: &'a WidgetManager, viewport_size: Size) -> Self {
        Self {
            document,
            widgets,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            handle_size: 10.0,
        }
    }

    /// Render context for a whole canvas.
    pub fn for_canvas<H: OverlayHost + Default>(canvas: &'a CourseCanvas<H>, viewport_size: Size) -> Self {
        Self::new(&canvas.document, &canvas.widgets, viewport_size)
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the draw commands for a frame.
    ///
    /// Text parts being edited in place and the transformer of an element in
    /// editing mode are left out; the overlay draws them instead.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
