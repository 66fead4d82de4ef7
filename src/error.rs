use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for PAK operations
pub type Result<T> = std::result::Result<T, PakError>;

/// Process exit status for each error kind.
///
/// The numbering matches the tool this format shipped with, so scripts
/// written against it keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    AllocationError = 1,
    IoError = 2,
    ArgumentError = 3,
    FormatError = 4,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Errors raised while decoding, encoding, importing or exporting archives
#[derive(Error, Debug)]
pub enum PakError {
    /// File open, read, write or directory creation failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive bytes (or a hand-built model) violate the wire format
    #[error("invalid pak: {0}")]
    Format(String),

    /// A path cannot be represented in an archive
    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    /// Malformed command line
    #[error("{0}")]
    Argument(String),

    /// A buffer of the requested size could not be allocated
    #[error("cannot allocate {size} bytes: {source}")]
    Allocation {
        size: u64,
        #[source]
        source: TryReserveError,
    },
}

impl PakError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PakError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        PakError::Format(msg.into())
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            PakError::Io { .. } => ExitStatus::IoError,
            PakError::Format(_) => ExitStatus::FormatError,
            PakError::InvalidPath { .. } | PakError::Argument(_) => ExitStatus::ArgumentError,
            PakError::Allocation { .. } => ExitStatus::AllocationError,
        }
    }
}

/// Allocate a zeroed buffer of `size` bytes, reporting failure instead of aborting.
pub(crate) fn alloc_buffer(size: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(size)
        .map_err(|_| PakError::format(format!("buffer size {size} exceeds address space")))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| PakError::Allocation { size, source })?;
    buf.resize(len, 0);
    Ok(buf)
}
