//! Course backend client.

use crate::config::AppConfig;
use coursecanvas_core::CourseSummary;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

const MY_COURSES_PATH: &str = "/api/course/mycourses";

/// Errors talking to the course backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("missing token; pass --token or set COURSECANVAS_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(err) => is_transient(err),
            ApiError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::InvalidBaseUrl(_) | ApiError::MissingToken | ApiError::Decode(_) => false,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[cfg(target_arch = "wasm32")]
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_request()
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client bound to one backend and one signed-in user.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        #[cfg(not(target_arch = "wasm32"))]
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        #[cfg(target_arch = "wasm32")]
        let http = reqwest::Client::new();

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|_| ApiError::InvalidBaseUrl(raw))
    }

    /// Courses owned by the signed-in user.
    pub async fn my_courses(&self) -> ApiResult<Vec<CourseSummary>> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        let url = self.endpoint(MY_COURSES_PATH)?;
        log::debug!("GET {url}");

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                message: error_message(status, &body),
            });
        }

        let courses: Vec<CourseSummary> = serde_json::from_slice(&body)?;
        log::info!("Fetched {} courses", courses.len());
        Ok(courses)
    }
}

fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ApiError::InvalidBaseUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ApiError::InvalidBaseUrl(raw.to_string())),
    }
}

/// `{"message": ...}` bodies win over the bare reason phrase.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{HeaderMap, header::AUTHORIZATION};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    pub(crate) const TOKEN: &str = "secret-token";

    async fn my_courses(headers: HeaderMap) -> Response {
        let authorized = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"));
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No authorization" }))).into_response();
        }
        Json(json!([
            { "_id": "c1", "title": "German A1", "author": "u1" },
            { "_id": "c2", "title": "Spanish basics", "description": "First steps" }
        ]))
        .into_response()
    }

    async fn broken() -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
    }

    async fn garbage() -> Response {
        "not json".into_response()
    }

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub(crate) async fn courses_server() -> String {
        serve(Router::new().route(MY_COURSES_PATH, get(my_courses))).await
    }

    pub(crate) async fn failing_server() -> String {
        serve(Router::new().route(MY_COURSES_PATH, get(broken))).await
    }

    fn client(base_url: &str, token: Option<&str>) -> ApiClient {
        let mut config = AppConfig::default()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5));
        config.token = token.map(str::to_string);
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_my_courses_sends_bearer_token() {
        let base = courses_server().await;
        let courses = client(&base, Some(TOKEN)).my_courses().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].id, "c1");
        assert_eq!(courses[1].description.as_deref(), Some("First steps"));
    }

    #[tokio::test]
    async fn test_unauthorized_uses_server_message() {
        let base = courses_server().await;
        let err = client(&base, Some("wrong")).my_courses().await.unwrap_err();
        match &err {
            ApiError::Status { status, message } => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "No authorization");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let base = failing_server().await;
        let err = client(&base, Some(TOKEN)).my_courses().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_bad_body_is_decode_error() {
        let base = serve(Router::new().route(MY_COURSES_PATH, get(garbage))).await;
        let err = client(&base, Some(TOKEN)).my_courses().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_request() {
        let err = client("http://127.0.0.1:9", None).my_courses().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_retryable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = client(&format!("http://{addr}"), Some(TOKEN)).my_courses().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = AppConfig::default().with_base_url("ftp://example.test");
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidBaseUrl(_))));
        let config = AppConfig::default().with_base_url("not a url");
        assert!(matches!(ApiClient::new(&config), Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = AppConfig::default().with_base_url("https://example.test/school/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(MY_COURSES_PATH).unwrap().as_str(),
            "https://example.test/school/api/course/mycourses"
        );
    }
}
