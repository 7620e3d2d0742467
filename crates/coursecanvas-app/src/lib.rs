//! CourseCanvas Application
//!
//! Course backend client, pages and the platform entry points.

pub mod api;
pub mod config;
pub mod inspect;
pub mod pages;

pub use api::{ApiClient, ApiError, ApiResult};
pub use config::AppConfig;
pub use inspect::{InspectError, InspectReport, inspect_document};
pub use pages::{FetchError, MyCoursesPage};

#[cfg(feature = "native")]
pub use config::{Cli, Command};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasHandle, DomOverlay, WebCanvas, detect_browser, key_from_event, run_wasm, show_my_courses, web_canvas};
