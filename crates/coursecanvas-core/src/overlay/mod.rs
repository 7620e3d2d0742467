//! Inline text editing overlay.
//!
//! Double-clicking a text part opens a text area over the stage. The layout
//! and keyboard protocol live here; the host that actually owns the text area
//! (a DOM `<textarea>` in the browser, an in-memory buffer elsewhere) sits
//! behind [`OverlayHost`].

mod host;
mod layout;
mod session;

pub use host::{HeadlessOverlay, OverlayHost};
pub use layout::{Browser, OverlayStyle};
pub use session::{EditOutcome, InlineEdit, PLACEHOLDER};

use crate::elements::PartKind;
use crate::scene::SceneError;
use thiserror::Error;

/// Overlay errors.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("An overlay is already mounted")]
    AlreadyMounted,
    #[error("No overlay is mounted")]
    NotMounted,
    #[error("Part {} is not text-editable", .0.name())]
    PartNotEditable(PartKind),
    #[error("Element has no {} part", .0.name())]
    MissingPart(PartKind),
    #[error("Overlay host error: {0}")]
    Host(String),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for overlay operations.
pub type OverlayResult<T> = Result<T, OverlayError>;
