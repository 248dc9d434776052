//! Error types for notebook export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a notebook.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file, or to launch the converter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The notebook is not valid JSON.
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The notebook JSON does not have the expected structure.
    #[error("Invalid notebook: {0}")]
    InvalidNotebook(String),

    /// No notebook name was given or found.
    #[error("No notebook name was found. Export manually.")]
    MissingNotebook,

    /// The target format is not one nbconvert understands.
    #[error("Unknown export format '{0}'. Choose one of: {formats}", formats = crate::ExportFormat::names().join(", "))]
    UnknownFormat(String),

    /// The requested template is not in the template directory.
    #[error("Unknown template '{name}'. Available: {}", .available.join(", "))]
    UnknownTemplate { name: String, available: Vec<String> },

    /// The converter exited unsuccessfully.
    #[error("{program} exited with {}: {stderr}", .code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()))]
    ConverterFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}
