//! Course summaries as listed by the course API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the "my courses" list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields this client does not interpret, kept as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CourseSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_api_record() {
        let json = r#"{"_id": "64f1", "title": "German A1", "author": "u1", "published": true}"#;
        let course: CourseSummary = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, "64f1");
        assert_eq!(course.title, "German A1");
        assert_eq!(course.description, None);
        assert_eq!(course.extra["author"], "u1");

        let back = serde_json::to_value(&course).unwrap();
        assert_eq!(back["_id"], "64f1");
        assert_eq!(back["published"], true);
    }

    #[test]
    fn test_accepts_plain_id() {
        let course: CourseSummary =
            serde_json::from_str(r#"{"id": "7", "title": "Spanish", "description": "Basics"}"#).unwrap();
        assert_eq!(course.id, "7");
        assert_eq!(course.description.as_deref(), Some("Basics"));
        assert!(course.extra.is_empty());
    }
}
