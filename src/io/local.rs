use super::FileSystem;
use crate::error::{PakError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| PakError::io(path, e))
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        std::fs::write(path, data).map_err(|e| PakError::io(path, e))
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(path).map_err(|e| PakError::io(path, e))
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                PakError::io(path, io)
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
