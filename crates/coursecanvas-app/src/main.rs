//! Command-line entry point (native).

#[cfg(feature = "native")]
mod native {
    use clap::Parser;
    use coursecanvas_app::{ApiClient, ApiError, Cli, Command, InspectError, MyCoursesPage, inspect_document};
    use coursecanvas_core::DocumentError;
    use kurbo::Size;
    use std::path::Path;

    #[derive(Debug, thiserror::Error)]
    pub enum CliError {
        #[error(transparent)]
        Api(#[from] ApiError),
        #[error(transparent)]
        Inspect(#[from] InspectError),
        #[error(transparent)]
        Document(#[from] DocumentError),
        #[error("{path}: {source}")]
        Io { path: String, source: std::io::Error },
        #[error("could not load courses: {0}")]
        Fetch(String),
    }

    pub async fn run() -> Result<(), CliError> {
        let cli = Cli::parse();
        let config = cli.config();
        match cli.command {
            Command::MyCourses => {
                let client = ApiClient::new(&config)?;
                let mut page = MyCoursesPage::new();
                page.load(&client).await;
                for line in page.view() {
                    println!("{line}");
                }
                if let Some(error) = page.error() {
                    return Err(CliError::Fetch(error.message.clone()));
                }
            }
            Command::Inspect { path, stage_width, stage_height, write } => {
                let json = read(&path)?;
                let stage = stage_width.zip(stage_height).map(|(w, h)| Size::new(w, h));
                let report = inspect_document(&json, stage)?;
                for line in report.lines() {
                    println!("{line}");
                }
                if write && report.moved_parts > 0 {
                    let json = report.document.to_json()?;
                    std::fs::write(&path, json).map_err(|source| CliError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                    log::info!("Wrote {}", path.display());
                }
            }
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<String, CliError> {
        std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(feature = "native")]
#[tokio::main]
async fn main() {
    env_logger::init();
    log::debug!("Starting coursecanvas");

    if let Err(err) = native::run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
