//! "My courses" page.

use crate::api::{ApiClient, ApiError};
use coursecanvas_core::CourseSummary;

pub const LOADING_TEXT: &str = "wait, please";
pub const HEADING: &str = "My courses";

/// Last failed fetch, kept next to the stale list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub message: String,
    pub retryable: bool,
}

impl From<&ApiError> for FetchError {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// List of the signed-in user's courses.
#[derive(Debug, Clone, Default)]
pub struct MyCoursesPage {
    courses: Vec<CourseSummary>,
    loading: bool,
    error: Option<FetchError>,
}

impl MyCoursesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[CourseSummary] {
        &self.courses
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Settle a fetch. A failure keeps whatever list was shown before.
    pub fn finish_load(&mut self, result: Result<Vec<CourseSummary>, ApiError>) {
        self.loading = false;
        match result {
            Ok(courses) => {
                self.courses = courses;
                self.error = None;
            }
            Err(err) => {
                log::warn!("Failed to load courses: {err}");
                self.error = Some(FetchError::from(&err));
            }
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.begin_load();
        let result = client.my_courses().await;
        self.finish_load(result);
    }

    /// Text lines of the page as it would be shown.
    pub fn view(&self) -> Vec<String> {
        if self.loading {
            return vec![LOADING_TEXT.to_string()];
        }
        let mut lines = Vec::with_capacity(self.courses.len() + 2);
        lines.push(HEADING.to_string());
        for course in &self.courses {
            match &course.description {
                Some(description) => lines.push(format!("{}: {}", course.title, description)),
                None => lines.push(course.title.clone()),
            }
        }
        if let Some(error) = &self.error {
            let hint = if error.retryable { " (try again later)" } else { "" };
            lines.push(format!("Could not load courses: {}{hint}", error.message));
        }
        lines
    }
}
