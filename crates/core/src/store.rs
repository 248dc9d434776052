//! Persistence of rendered documents.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a rendered document under a name and reports where it went.
pub trait DocumentStore {
    fn write(&self, name: &str, html: &str) -> Result<PathBuf>;
}

/// Stores documents as files inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store rooted at the current working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::current_dir()
    }
}

impl DocumentStore for FileStore {
    fn write(&self, name: &str, html: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, html)?;
        log::debug!("Wrote {} bytes to {}", html.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("out"));

        let path = store.write("deck.slides.html", "<html></html>").unwrap();

        assert_eq!(path, dir.path().join("nested/out/deck.slides.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
