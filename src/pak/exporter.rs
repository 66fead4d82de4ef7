use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::io::FileSystem;

use super::path::{check_file_name, decode_dir_name};
use super::structures::Archive;

/// Options for writing an archive out as a directory tree
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Replace files that already exist (otherwise they are skipped)
    pub overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Counts reported by [`export`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Write every file of `archive` under `root`, recreating its directories.
///
/// Directory names are decoded with [`decode_dir_name`]; names that would
/// escape `root` are rejected before anything is written for that file.
/// The first failure aborts the export; files already written stay on
/// disk.
pub fn export<F: FileSystem + ?Sized>(
    archive: &Archive,
    fs: &mut F,
    root: &Path,
    options: ExportOptions,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    for dir in &archive.directories {
        let parent = root.join(decode_dir_name(&dir.name)?);
        fs.create_dir_all(&parent)?;

        for file in &dir.files {
            check_file_name(&file.name)?;
            let output_path = parent.join(&file.name);

            if !options.overwrite && fs.exists(&output_path) {
                warn!(path = %output_path.display(), "skipping existing file");
                summary.skipped += 1;
                continue;
            }

            debug!(path = %output_path.display(), size = file.size, "extracting");
            fs.write(&output_path, &file.content)?;
            summary.written += 1;
            summary.bytes += file.content.len() as u64;
        }
    }

    info!(
        root = %root.display(),
        written = summary.written,
        skipped = summary.skipped,
        "exported archive"
    );
    Ok(summary)
}
