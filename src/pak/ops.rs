use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::io::FileSystem;

use super::exporter::{ExportOptions, ExportSummary, export};
use super::importer::import;
use super::parser::decode;
use super::structures::Archive;
use super::writer::encode;

/// Read and decode an archive file.
///
/// The raw buffer is dropped as soon as decoding finishes; the returned
/// model owns copies of every file's content.
pub fn read_archive<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Archive> {
    let data = fs.read(path)?;
    let archive = decode(&data)?;
    info!(
        path = %path.display(),
        bytes = data.len(),
        directories = archive.directories.len(),
        files = archive.file_count(),
        "loaded archive"
    );
    Ok(archive)
}

/// Encode an archive and write it to `path`.
pub fn write_archive<F: FileSystem + ?Sized>(fs: &mut F, path: &Path, archive: &Archive) -> Result<()> {
    let data = encode(archive)?;
    fs.write(path, &data)?;
    info!(path = %path.display(), bytes = data.len(), "wrote archive");
    Ok(())
}

/// Unpack the archive at `pak` into the directory `dir`.
pub fn unpak<F: FileSystem + ?Sized>(
    fs: &mut F,
    pak: &Path,
    dir: &Path,
    verify: bool,
    options: ExportOptions,
) -> Result<ExportSummary> {
    let archive = read_archive(&*fs, pak)?;
    if verify {
        archive.verify()?;
    }
    export(&archive, fs, dir, options)
}

/// Pack the directory `dir` into an archive at `pak`.
pub fn repak<F: FileSystem + ?Sized>(fs: &mut F, dir: &Path, pak: &Path) -> Result<Archive> {
    let archive = import(&*fs, dir)?;
    write_archive(fs, pak, &archive)?;
    Ok(archive)
}
