//! Application pages.

mod my_courses;

pub use my_courses::{FetchError, HEADING, LOADING_TEXT, MyCoursesPage};
