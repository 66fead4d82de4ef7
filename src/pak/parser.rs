//! PAK archive decoder.
//!
//! ## Parsing Strategy
//!
//! Unlike ZIP, a PAK keeps all of its metadata at the front:
//! 1. The archive header gives the tag, base offset and directory count
//! 2. Each directory header is followed directly by its file headers
//! 3. File contents follow the last header, each at its absolute offset
//!
//! Headers are walked sequentially with a [`ByteReader`]; contents are
//! then copied out of the buffer by offset, so the header walk and the
//! content copy are independently bounds-checked.

use tracing::debug;

use crate::error::{PakError, Result, alloc_buffer};

use super::cursor::ByteReader;
use super::structures::{Archive, Directory, FileEntry};

/// Decode a complete archive from memory.
///
/// # Errors
///
/// Returns [`PakError::Format`] if the tag is unknown, a reserved field is
/// non-zero, a declared name length disagrees with the name, or any header
/// or content read would run past the end of `data`, or file contents
/// overlap the headers or each other.
pub fn decode(data: &[u8]) -> Result<Archive> {
    let mut reader = ByteReader::new(data);

    let tag = reader.read_u64("archive tag")?;
    if tag != Archive::TAG_MAGIC {
        return Err(PakError::format(format!(
            "unknown tag {tag:#018x}, expected {:#018x}",
            Archive::TAG_MAGIC
        )));
    }
    let base_offset = reader.read_u64("base offset")?;
    let num_dirs = reader.read_u32("directory count")?;
    reader.read_reserved("archive header")?;

    // Counts are untrusted; don't let them size an allocation up front.
    let mut directories = Vec::with_capacity(num_dirs.min(1024) as usize);
    for _ in 0..num_dirs {
        directories.push(parse_directory(&mut reader)?);
    }
    let headers_end = reader.position();

    let mut archive = Archive {
        tag,
        base_offset,
        directories,
    };

    // Contents must follow the headers in header order without overlapping,
    // so the total allocated never exceeds the size of `data`.
    let mut content_end = headers_end;
    for dir in &mut archive.directories {
        for file in &mut dir.files {
            if file.archive_offset < content_end {
                return Err(PakError::format(format!(
                    "{}{}: content at offset {} overlaps preceding data ending at {}",
                    dir.name, file.name, file.archive_offset, content_end
                )));
            }
            let bytes = reader.slice_at(file.archive_offset, file.size, &file.name)?;
            content_end = file.archive_offset + file.size;
            let mut content = alloc_buffer(file.size)?;
            content.copy_from_slice(bytes);
            file.content = content;
        }
    }

    debug!(
        directories = archive.directories.len(),
        files = archive.file_count(),
        headers_end,
        "decoded archive"
    );
    Ok(archive)
}

fn parse_directory(reader: &mut ByteReader<'_>) -> Result<Directory> {
    let index = reader.read_u32("directory index")?;
    let name_length = reader.read_u32("directory name length")?;
    let num_files = reader.read_u32("file count")?;
    reader.read_reserved("directory header")?;
    let name = reader.read_name(name_length, "directory name")?;

    let mut files = Vec::with_capacity(num_files.min(1024) as usize);
    for _ in 0..num_files {
        files.push(parse_file(reader)?);
    }

    debug!(index, name = %name, files = files.len(), "parsed directory header");
    Ok(Directory { index, name, files })
}

fn parse_file(reader: &mut ByteReader<'_>) -> Result<FileEntry> {
    let name_length = reader.read_u32("file name length")?;
    let size = reader.read_u64("file size")?;
    let archive_offset = reader.read_u64("file offset")?;
    let checksum = reader.read_u32("file checksum")?;
    reader.read_reserved("file header")?;
    let name = reader.read_name(name_length, "file name")?;

    Ok(FileEntry {
        name,
        size,
        archive_offset,
        checksum,
        content: Vec::new(),
    })
}
