//! Error types for roofline-terminal.

use thiserror::Error;

/// Errors that can occur while rendering a diagram.
#[derive(Debug, Error)]
pub enum RenderError {
    /// IO error from terminal output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested plot does not fit the minimum layout.
    #[error("Plot too small: {width}x{height} (minimum {min_width}x{min_height})")]
    PlotTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    /// Log axis bounds must satisfy `0 < min < max`.
    #[error("Invalid {axis} axis bounds [{min}, {max}]: log scale needs 0 < min < max")]
    InvalidAxis {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}
