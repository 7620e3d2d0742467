//! CourseCanvas Render Library
//!
//! Renderer abstraction for the course canvas. The display list renderer
//! records draw commands that platform backends replay.

mod display_list;
mod renderer;

pub use display_list::{DisplayItem, DisplayListRenderer};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
