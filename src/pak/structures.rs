use crate::error::{PakError, Result};

use super::crc;

/// Archive header: tag, base offset, directory count, reserved
pub const ARCHIVE_HEADER_SIZE: u64 = 8 + 8 + 4 + 4;

/// Fixed part of a directory header: index, name length, file count, reserved
pub const DIR_HEADER_FIXED_SIZE: u64 = 4 + 4 + 4 + 4;

/// Fixed part of a file header: name length, size, offset, checksum, reserved
pub const FILE_HEADER_FIXED_SIZE: u64 = 4 + 8 + 8 + 4 + 4;

/// Length of a name on the wire, including its NUL terminator.
pub fn encoded_name_len(name: &str) -> u64 {
    name.len() as u64 + 1
}

/// One packed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    /// Absolute offset of the content within the archive
    pub archive_offset: u64,
    pub checksum: u32,
    /// Raw file bytes, empty until loaded
    pub content: Vec<u8>,
}

impl FileEntry {
    /// Build an entry from its content, computing size and checksum.
    ///
    /// The offset is left at 0; [`Archive::assign_offsets`] fills it in.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            archive_offset: 0,
            checksum: crc::checksum(&content),
            content,
        }
    }

    /// Size of this entry's header on the wire.
    pub fn header_size(&self) -> u64 {
        FILE_HEADER_FIXED_SIZE + encoded_name_len(&self.name)
    }

    /// Whether the stored checksum matches the content.
    pub fn checksum_matches(&self) -> bool {
        self.content.len() as u64 == self.size && crc::checksum(&self.content) == self.checksum
    }
}

/// Files that shared a parent directory in the packed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// 1-based position in the archive
    pub index: u32,
    /// Encoded relative path, see [`super::path`]
    pub name: String,
    pub files: Vec<FileEntry>,
}

impl Directory {
    /// Size of this directory's own header, excluding nested file headers.
    pub fn header_size(&self) -> u64 {
        DIR_HEADER_FIXED_SIZE + encoded_name_len(&self.name)
    }

    /// Size of this directory's header plus all of its file headers.
    pub fn total_header_size(&self) -> u64 {
        self.header_size() + self.files.iter().map(FileEntry::header_size).sum::<u64>()
    }
}

/// A whole PAK archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub tag: u64,
    /// Absolute offset of the first file's content (the size of all headers)
    pub base_offset: u64,
    pub directories: Vec<Directory>,
}

impl Archive {
    /// "PKBE" followed by format version 1
    pub const TAG_MAGIC: u64 = 0x504B_4245_0000_0001;

    /// Build an archive from directories, numbering them and laying out
    /// file offsets so that every layout invariant holds.
    pub fn from_directories(mut directories: Vec<Directory>) -> Self {
        for (i, dir) in directories.iter_mut().enumerate() {
            dir.index = i as u32 + 1;
        }
        let mut archive = Self {
            tag: Self::TAG_MAGIC,
            base_offset: 0,
            directories,
        };
        archive.assign_offsets();
        archive
    }

    /// Recompute `base_offset` from the headers and lay out file contents
    /// contiguously after them, in header order.
    ///
    /// Offsets saturate at `u64::MAX`; such a layout fails [`Archive::verify`]
    /// and [`super::writer::encode`].
    pub fn assign_offsets(&mut self) {
        self.base_offset = self.headers_size();
        let mut offset = self.base_offset;
        for file in self.files_mut() {
            file.archive_offset = offset;
            offset = offset.saturating_add(file.size);
        }
    }

    /// Total size of every header in the archive.
    pub fn headers_size(&self) -> u64 {
        ARCHIVE_HEADER_SIZE
            + self
                .directories
                .iter()
                .map(Directory::total_header_size)
                .sum::<u64>()
    }

    /// Total size of all file contents.
    ///
    /// # Errors
    ///
    /// Returns [`PakError::Format`] if the declared sizes overflow a `u64`.
    pub fn content_size(&self) -> Result<u64> {
        self.files()
            .try_fold(0u64, |total, f| total.checked_add(f.size))
            .ok_or_else(|| PakError::format("total content size overflows"))
    }

    /// Size of the encoded archive.
    ///
    /// # Errors
    ///
    /// Returns [`PakError::Format`] if the declared sizes overflow a `u64`.
    pub fn encoded_len(&self) -> Result<u64> {
        self.headers_size()
            .checked_add(self.content_size()?)
            .ok_or_else(|| PakError::format("archive size overflows"))
    }

    /// Number of files across all directories.
    pub fn file_count(&self) -> usize {
        self.directories.iter().map(|d| d.files.len()).sum()
    }

    /// Every file in header order.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.directories.iter().flat_map(|d| d.files.iter())
    }

    fn files_mut(&mut self) -> impl Iterator<Item = &mut FileEntry> {
        self.directories.iter_mut().flat_map(|d| d.files.iter_mut())
    }

    /// Check the layout and integrity invariants that decoding alone does
    /// not enforce: base offset, offset contiguity and checksums.
    pub fn verify(&self) -> Result<()> {
        let headers = self.headers_size();
        if self.base_offset != headers {
            return Err(PakError::format(format!(
                "base offset {} does not match header size {}",
                self.base_offset, headers
            )));
        }

        let mut expected = self.base_offset;
        for dir in &self.directories {
            for file in &dir.files {
                if file.archive_offset != expected {
                    return Err(PakError::format(format!(
                        "{}{}: offset {} breaks contiguity, expected {}",
                        dir.name, file.name, file.archive_offset, expected
                    )));
                }
                expected = file.archive_offset.checked_add(file.size).ok_or_else(|| {
                    PakError::format(format!(
                        "{}{}: size {} at offset {} overflows",
                        dir.name, file.name, file.size, file.archive_offset
                    ))
                })?;
                if !file.checksum_matches() {
                    return Err(PakError::format(format!(
                        "{}{}: checksum mismatch",
                        dir.name, file.name
                    )));
                }
            }
        }
        Ok(())
    }
}
