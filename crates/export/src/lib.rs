//! Notebook export through nbconvert.
//!
//! Resolves notebook names and templates, renumbers execution counts so the
//! exported notebook reads top to bottom, and runs the converter.

pub mod error;
pub mod exporter;
pub mod format;
pub mod notebook;
pub mod templates;

pub use error::{Error, Result};
pub use exporter::{ConverterOutput, ExportOptions, ExportPlan, ExportRequest, Exporter};
pub use format::ExportFormat;
pub use notebook::{normalize_notebook_name, renumber_execution_counts};
pub use templates::find_templates;
