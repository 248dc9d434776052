//! Notebook file handling: name normalization and execution-count cleanup.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Notebook file extension.
pub const NOTEBOOK_EXT: &str = ".ipynb";

/// Turn a user-supplied notebook name into a file name.
///
/// Surrounding quotes are stripped from each part, parts are joined with a
/// space, and `.ipynb` is appended if missing.
pub fn normalize_notebook_name<S: AsRef<str>>(parts: &[S]) -> Result<PathBuf> {
    let name = parts
        .iter()
        .map(|p| p.as_ref().trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        return Err(Error::MissingNotebook);
    }

    if name.ends_with(NOTEBOOK_EXT) {
        Ok(PathBuf::from(name))
    } else {
        Ok(PathBuf::from(format!("{}{}", name, NOTEBOOK_EXT)))
    }
}

/// Renumber `execution_count` of every cell that has one to 1, 2, 3, ... in
/// document order. Returns how many cells were renumbered.
pub fn renumber_cells(notebook: &mut Value) -> Result<usize> {
    let cells = notebook
        .get_mut("cells")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::InvalidNotebook("missing \"cells\" array".to_string()))?;

    let mut count = 0;
    for cell in cells.iter_mut().filter_map(Value::as_object_mut) {
        if let Some(slot) = cell.get_mut("execution_count") {
            count += 1;
            *slot = Value::from(count);
        }
    }
    Ok(count)
}

/// Rewrite a notebook file in place with renumbered execution counts.
pub fn renumber_execution_counts(path: &Path) -> Result<usize> {
    let raw = fs::read_to_string(path)?;
    let mut notebook: Value = serde_json::from_str(&raw)?;
    let count = renumber_cells(&mut notebook)?;

    // Jupyter writes notebooks with a one-space indent.
    let mut out = Vec::with_capacity(raw.len());
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
    notebook.serialize(&mut serializer)?;
    out.push(b'\n');
    fs::write(path, out)?;

    log::debug!("Renumbered {} cell(s) in {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_adds_extension() {
        assert_eq!(
            normalize_notebook_name(&["Analysis"]).unwrap(),
            PathBuf::from("Analysis.ipynb")
        );
        assert_eq!(
            normalize_notebook_name(&["Analysis.ipynb"]).unwrap(),
            PathBuf::from("Analysis.ipynb")
        );
    }

    #[test]
    fn test_normalize_strips_quotes_and_joins() {
        assert_eq!(
            normalize_notebook_name(&["\"My", "Notebook\""]).unwrap(),
            PathBuf::from("My Notebook.ipynb")
        );
        assert_eq!(
            normalize_notebook_name(&["'report.ipynb'"]).unwrap(),
            PathBuf::from("report.ipynb")
        );
    }

    #[test]
    fn test_normalize_empty_is_missing() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            normalize_notebook_name(&empty),
            Err(Error::MissingNotebook)
        ));
        assert!(matches!(
            normalize_notebook_name(&["\"\""]),
            Err(Error::MissingNotebook)
        ));
    }

    #[test]
    fn test_renumber_cells_skips_markdown() {
        let mut notebook = json!({
            "cells": [
                {"cell_type": "code", "execution_count": 7},
                {"cell_type": "markdown"},
                {"cell_type": "code", "execution_count": null},
                {"cell_type": "code", "execution_count": 2}
            ]
        });

        assert_eq!(renumber_cells(&mut notebook).unwrap(), 3);
        let counts: Vec<Value> = notebook["cells"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.get("execution_count").cloned().unwrap_or(Value::Null))
            .collect();
        assert_eq!(counts, vec![json!(1), Value::Null, json!(2), json!(3)]);
    }

    #[test]
    fn test_renumber_requires_cells() {
        let mut notebook = json!({"worksheets": []});
        assert!(matches!(
            renumber_cells(&mut notebook),
            Err(Error::InvalidNotebook(_))
        ));
    }

    #[test]
    fn test_renumber_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        fs::write(
            &path,
            r#"{"cells": [{"execution_count": 5}, {"execution_count": 9}], "nbformat": 4}"#,
        )
        .unwrap();

        assert_eq!(renumber_execution_counts(&path).unwrap(), 2);

        let rewritten: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten["cells"][0]["execution_count"], 1);
        assert_eq!(rewritten["cells"][1]["execution_count"], 2);
        assert_eq!(rewritten["nbformat"], 4);
    }
}
