//! PKBE archive reading and writing.
//!
//! This module translates between three representations of an archive:
//! raw bytes, the in-memory [`Archive`] model, and a directory tree.
//!
//! ## Architecture
//!
//! - [`structures`]: the archive model and header size arithmetic
//! - [`cursor`]: big-endian reads and writes over a byte buffer
//! - [`parser`] / [`writer`]: bytes to model and back
//! - [`importer`] / [`exporter`]: directory tree to model and back
//! - [`path`]: the directory name encoding shared by both sides
//! - [`crc`]: the CRC-32 stored for every file
//!
//! ## Format Overview
//!
//! A PAK is big-endian and keeps all metadata at the front:
//! 1. Archive header (tag `PKBE\0\0\0\x01`, base offset, directory count)
//! 2. For each directory: its header, then the headers of its files
//! 3. File contents, packed back to back starting at the base offset
//!
//! Every header ends its fixed part with a 32-bit field that is always 0.
//!
//! ## Limitations
//!
//! - No compression or encryption
//! - Archives and file contents are held entirely in memory

pub mod crc;
pub mod cursor;
pub mod exporter;
pub mod importer;
pub mod ops;
pub mod parser;
pub mod path;
pub mod structures;
pub mod writer;

pub use exporter::{ExportOptions, ExportSummary, export};
pub use importer::import;
pub use ops::{read_archive, repak, unpak, write_archive};
pub use parser::decode;
pub use structures::*;
pub use writer::encode;
