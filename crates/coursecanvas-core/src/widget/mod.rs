//! Widget system for managing interactive element states.
//!
//! This module provides a unified way to manage UI state for elements:
//! - Selection state with the frame transformer
//! - Editing state (inline text editing of one part)
//! - Hover tracking
//!
//! Elements remain pure data. Widgets wrap elements with UI state, and the
//! render layer reads that state instead of nodes being hidden imperatively.

mod handles;
mod manager;
mod state;

pub use handles::{Handle, HandleKind, HandleShape, hit_test_handle, transformer_handles};
pub use manager::WidgetManager;
pub use state::{EditingKind, WidgetState};
