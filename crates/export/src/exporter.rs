//! Building and running the nbconvert command line.

use crate::error::{Error, Result};
use crate::format::ExportFormat;
use crate::notebook::{normalize_notebook_name, renumber_execution_counts};
use crate::templates::find_templates;
use nbkit_core::presentation::{DEFAULT_CDN, DEFAULT_REVEAL_VERSION};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Default directory searched for `.tpl` templates.
pub const DEFAULT_TEMPLATE_DIR: &str = "~/.ipython/extensions/templates";

/// Default template file extension.
pub const TEMPLATE_EXT: &str = ".tpl";

/// How exports are carried out.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Program providing the `nbconvert` subcommand.
    pub converter: String,

    /// Directory searched for templates; `~` is expanded.
    pub template_dir: PathBuf,

    /// Template file extension.
    pub template_ext: String,

    /// reveal.js location passed for slide exports.
    pub reveal_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            converter: "jupyter".to_string(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            template_ext: TEMPLATE_EXT.to_string(),
            reveal_prefix: format!("{}/{}", DEFAULT_CDN, DEFAULT_REVEAL_VERSION),
        }
    }
}

/// One export as requested by the user.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Notebook name, possibly split on whitespace and quoted.
    pub notebook: Vec<String>,

    pub to: ExportFormat,

    /// Template file name; the lowest-sorting template is used when `None`.
    pub template: Option<String>,
}

/// A fully resolved converter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub notebook: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for ExportPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Output of a successful converter run.
#[derive(Debug, Clone, Default)]
pub struct ConverterOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Exports notebooks through nbconvert.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Resolve the notebook name and template and build the command line.
    pub fn plan(&self, request: &ExportRequest) -> Result<ExportPlan> {
        let notebook = normalize_notebook_name(&request.notebook)?;
        let template = self.resolve_template(request.template.as_deref())?;

        let mut args = vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            request.to.to_string(),
            notebook.to_string_lossy().into_owned(),
        ];

        if let Some(template) = template {
            args.push("--template".to_string());
            args.push(template);
        }

        if request.to == ExportFormat::Slides {
            args.push("--reveal-prefix".to_string());
            args.push(self.options.reveal_prefix.clone());
        }

        Ok(ExportPlan {
            notebook,
            program: self.options.converter.clone(),
            args,
        })
    }

    /// Renumber the notebook's execution counts and run the converter.
    pub fn run(&self, plan: &ExportPlan) -> Result<ConverterOutput> {
        renumber_execution_counts(&plan.notebook)?;

        log::info!("Running: {}", plan);
        let output = Command::new(&plan.program).args(&plan.args).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::ConverterFailed {
                program: plan.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(ConverterOutput { stdout, stderr })
    }

    fn resolve_template(&self, requested: Option<&str>) -> Result<Option<String>> {
        let available = find_templates(&self.options.template_dir, &self.options.template_ext)?;

        match requested {
            Some(name) if available.iter().any(|t| t == name) => Ok(Some(name.to_string())),
            Some(name) => Err(Error::UnknownTemplate {
                name: name.to_string(),
                available,
            }),
            None => {
                let lowest = available.into_iter().next();
                if lowest.is_none() {
                    log::warn!(
                        "No {} templates in {}; using the converter's default",
                        self.options.template_ext,
                        self.options.template_dir.display()
                    );
                }
                Ok(lowest)
            }
        }
    }
}
