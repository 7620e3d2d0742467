//! Application configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings shared by the API client and the pages.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root URL of the course backend, without the `/api` suffix.
    pub base_url: String,
    /// Bearer token of the signed-in user.
    pub token: Option<String>,
    /// Per-request timeout (native only).
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(feature = "native")]
pub use cli::{Cli, Command};

#[cfg(feature = "native")]
mod cli {
    use super::{AppConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;
    use std::time::Duration;

    #[derive(Parser, Debug)]
    #[command(name = "coursecanvas", about = "Course canvas tools")]
    pub struct Cli {
        #[arg(long, env = "COURSECANVAS_BASE_URL", default_value = DEFAULT_BASE_URL)]
        pub base_url: String,

        #[arg(long, env = "COURSECANVAS_TOKEN", hide_env_values = true)]
        pub token: Option<String>,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        pub timeout_secs: u64,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand, Debug)]
    pub enum Command {
        /// Fetch and print the signed-in user's courses.
        MyCourses,
        /// Load a course document, re-clamp its parts and print a summary.
        Inspect {
            path: PathBuf,
            /// Stage width used to resolve part margins.
            #[arg(long, requires = "stage_height")]
            stage_width: Option<f64>,
            #[arg(long, requires = "stage_width")]
            stage_height: Option<f64>,
            /// Write the re-clamped document back to the file.
            #[arg(long, default_value_t = false)]
            write: bool,
        },
    }

    impl Cli {
        pub fn config(&self) -> AppConfig {
            AppConfig {
                base_url: self.base_url.clone(),
                token: self.token.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_my_courses() {
            let cli = Cli::try_parse_from([
                "coursecanvas",
                "--base-url",
                "http://example.test",
                "--token",
                "abc",
                "my-courses",
            ])
            .unwrap();
            let config = cli.config();
            assert_eq!(config.base_url, "http://example.test");
            assert_eq!(config.token.as_deref(), Some("abc"));
            assert!(matches!(cli.command, Command::MyCourses));
        }

        #[test]
        fn test_stage_size_needs_both_dimensions() {
            let result = Cli::try_parse_from(["coursecanvas", "inspect", "course.json", "--stage-width", "800"]);
            assert!(result.is_err());
        }
    }
}
