mod local;
mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem access needed to pack and unpack directory trees
///
/// The codec itself only works on memory; importing and exporting go
/// through this trait so that they can run against a real disk or an
/// in-memory tree.
pub trait FileSystem {
    /// Read a whole file into memory
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or truncate a file and write all of `data` to it
    fn write(&mut self, path: &Path, data: &[u8]) -> Result<()>;

    /// Create a directory and any missing parents
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Recursively list every regular file under `root`
    ///
    /// Returned paths start with `root`.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;
}
