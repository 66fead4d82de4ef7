//! # pkbe
//!
//! Unpack and repack PKBE archives, the big-endian `.pak` container read
//! by the game engine.
//!
//! An archive is a flat list of directories, each holding a list of files
//! with their size, CRC-32 and absolute offset. This crate decodes an
//! archive into an [`Archive`] model, writes that model out as a
//! directory tree, and builds it back from a tree, so that unpacking and
//! repacking an archive reproduces it byte for byte.
//!
//! ## Features
//!
//! - Lossless decode/encode of the binary format
//! - Strict validation: reserved fields, name lengths and bounds are
//!   checked and reported as errors
//! - Deterministic import ordering, so repacking is reproducible
//! - Pluggable filesystem access through [`FileSystem`]
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use pkbe::{ExportOptions, LocalFileSystem, read_archive, export};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut fs = LocalFileSystem::new();
//!     let archive = read_archive(&fs, Path::new("effects.pak"))?;
//!     for dir in &archive.directories {
//!         for file in &dir.files {
//!             println!("{}{}", dir.name, file.name);
//!         }
//!     }
//!     archive.verify()?;
//!     export(&archive, &mut fs, Path::new("effects"), ExportOptions::default())?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod pak;

pub use cli::Cli;
pub use error::{ExitStatus, PakError, Result};
pub use io::{FileSystem, LocalFileSystem, MemoryFileSystem};
pub use pak::{
    Archive, Directory, ExportOptions, ExportSummary, FileEntry, decode, encode, export, import,
    read_archive, repak, unpak, write_archive,
};
