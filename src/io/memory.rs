use super::FileSystem;
use crate::error::{PakError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// An in-memory directory tree
///
/// Behaves like a disk for the operations in [`FileSystem`]: writing into
/// a directory that was never created fails, as does reading a missing
/// file.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories.
    pub fn insert(&mut self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files.insert(path, data.into());
    }

    /// Contents of a file, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Every file, ordered by path.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &[u8])> {
        self.files.iter().map(|(p, d)| (p.as_path(), d.as_slice()))
    }

    fn add_dirs(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }
}

fn not_found(path: &Path) -> PakError {
    PakError::io(path, std::io::Error::from(ErrorKind::NotFound))
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !self.is_dir(parent) {
            return Err(not_found(path));
        }
        if self.dirs.contains(path) {
            return Err(PakError::io(
                path,
                std::io::Error::from(ErrorKind::IsADirectory),
            ));
        }
        self.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        if let Some(file) = path.ancestors().find(|a| self.files.contains_key(*a)) {
            return Err(PakError::io(
                file,
                std::io::Error::from(ErrorKind::AlreadyExists),
            ));
        }
        self.add_dirs(path);
        Ok(())
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(root) {
            return Err(not_found(root));
        }
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }
}
