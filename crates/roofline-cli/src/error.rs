//! CLI error type. Every variant maps to exit code 1.

use roofline_core::RooflineError;
use roofline_terminal::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Roofline(#[from] RooflineError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid [plot] section in {}: {source}", path.display())]
    PlotConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown theme '{0}' (expected tokyo_night or paper)")]
    UnknownTheme(String),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
