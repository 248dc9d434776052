//! Discovery of nbconvert template files.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// File names under `dir` (searched recursively) ending in `ext`, sorted.
///
/// A missing directory yields an empty list.
pub fn find_templates(dir: &Path, ext: &str) -> Result<Vec<String>> {
    let dir = expand_home(dir);
    let mut found = Vec::new();
    if dir.is_dir() {
        collect(&dir, ext, &mut found)?;
    } else {
        log::debug!("Template directory {} does not exist", dir.display());
    }
    found.sort();
    Ok(found)
}

fn collect(dir: &Path, ext: &str, found: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect(&path, ext, found)?;
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(ext) {
                found.push(name.to_string());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_templates_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("reveal")).unwrap();
        fs::write(dir.path().join("zeta.tpl"), "").unwrap();
        fs::write(dir.path().join("reveal").join("alpha.tpl"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = find_templates(dir.path(), ".tpl").unwrap();
        assert_eq!(found, vec!["alpha.tpl", "zeta.tpl"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = find_templates(&dir.path().join("missing"), ".tpl").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_expand_home() {
        let plain = Path::new("/tmp/templates");
        assert_eq!(expand_home(plain), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/.ipython/extensions/templates")),
                home.join(".ipython/extensions/templates")
            );
        }
    }
}
