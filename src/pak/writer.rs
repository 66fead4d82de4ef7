use tracing::debug;

use crate::error::{PakError, Result, alloc_buffer};

use super::cursor::ByteWriter;
use super::structures::{Archive, encoded_name_len};

/// Encode an archive to its binary form.
///
/// Offsets are written exactly as they appear in the model; nothing is
/// recomputed. A model built by hand must already lay its contents out
/// after the headers (see [`Archive::assign_offsets`]).
///
/// # Errors
///
/// Returns [`PakError::Format`] if a name is too long for its length
/// field, the declared sizes overflow, a file's content length disagrees
/// with its size, or a file's content would land inside the headers or
/// past the end of the archive.
pub fn encode(archive: &Archive) -> Result<Vec<u8>> {
    let headers_len = archive.headers_size();
    let total_len = archive.encoded_len()?;

    let mut out = ByteWriter::with_capacity(headers_len as usize);
    out.write_u64(archive.tag);
    out.write_u64(archive.base_offset);
    out.write_u32(count_u32(archive.directories.len(), "directory count")?);
    out.write_reserved();

    for dir in &archive.directories {
        out.write_u32(dir.index);
        out.write_u32(name_len_u32(&dir.name)?);
        out.write_u32(count_u32(dir.files.len(), &dir.name)?);
        out.write_reserved();
        out.write_name(&dir.name);

        for file in &dir.files {
            out.write_u32(name_len_u32(&file.name)?);
            out.write_u64(file.size);
            out.write_u64(file.archive_offset);
            out.write_u32(file.checksum);
            out.write_reserved();
            out.write_name(&file.name);
        }
    }
    debug_assert_eq!(out.position(), headers_len);

    let mut buf = alloc_buffer(total_len)?;
    buf[..headers_len as usize].copy_from_slice(&out.into_inner());

    for dir in &archive.directories {
        for file in &dir.files {
            if file.content.len() as u64 != file.size {
                return Err(PakError::format(format!(
                    "{}{}: content is {} bytes but size says {}",
                    dir.name,
                    file.name,
                    file.content.len(),
                    file.size
                )));
            }
            let start = file.archive_offset;
            let end = start
                .checked_add(file.size)
                .filter(|&end| start >= headers_len && end <= total_len)
                .ok_or_else(|| {
                    PakError::format(format!(
                        "{}{}: content at offset {} does not fit between headers ({} bytes) and archive end ({} bytes)",
                        dir.name, file.name, start, headers_len, total_len
                    ))
                })?;
            buf[start as usize..end as usize].copy_from_slice(&file.content);
        }
    }

    debug!(
        directories = archive.directories.len(),
        files = archive.file_count(),
        bytes = total_len,
        "encoded archive"
    );
    Ok(buf)
}

fn name_len_u32(name: &str) -> Result<u32> {
    u32::try_from(encoded_name_len(name))
        .map_err(|_| PakError::format(format!("name too long: {name}")))
}

fn count_u32(count: usize, what: &str) -> Result<u32> {
    u32::try_from(count).map_err(|_| PakError::format(format!("too many entries in {what}")))
}
