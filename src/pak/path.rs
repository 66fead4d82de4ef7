//! Directory name encoding.
//!
//! A directory's name is its path relative to the packed root, written as
//! a leading `\`, components joined by a doubled `\\`, and a trailing `\`:
//!
//! | relative path      | encoded name           |
//! |--------------------|------------------------|
//! | *(root)*           | `\`                    |
//! | `effects`          | `\effects\`            |
//! | `bin_win32/effects`| `\bin_win32\\effects\` |
//!
//! Decoding splits on `\` and drops empty components, so it inverts the
//! encoder and also accepts names written with single separators.

use std::path::{Component, Path, PathBuf};

use crate::error::{PakError, Result};

/// Separator used inside encoded directory names
pub const SEPARATOR: char = '\\';

/// Encode a path relative to the packed root as a directory name.
pub fn encode_dir_name(relative: &Path) -> Result<String> {
    let mut components = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => components.push(component_str(part, relative)?),
            Component::CurDir => {}
            _ => {
                return Err(PakError::InvalidPath {
                    path: relative.to_path_buf(),
                    reason: "directory must be relative to the packed root",
                });
            }
        }
    }

    if components.is_empty() {
        return Ok(SEPARATOR.to_string());
    }
    let doubled = format!("{SEPARATOR}{SEPARATOR}");
    Ok(format!("{SEPARATOR}{}{SEPARATOR}", components.join(doubled.as_str())))
}

/// Decode a directory name back into a relative path.
///
/// # Errors
///
/// Returns [`PakError::Format`] for components that could escape the
/// output root (`.`, `..`, drive prefixes or embedded `/`).
pub fn decode_dir_name(name: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for part in name.split(SEPARATOR).filter(|p| !p.is_empty()) {
        check_component(part, name)?;
        path.push(part);
    }
    Ok(path)
}

/// Check that a file name can be used as a single path component.
pub fn check_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(PakError::format(format!("unsafe file name {name:?}")));
    }
    check_component(name, name)
}

fn check_component(part: &str, whole: &str) -> Result<()> {
    let mut components = Path::new(part).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == part => Ok(()),
        _ => Err(PakError::format(format!(
            "unsafe path component {part:?} in {whole:?}"
        ))),
    }
}

/// Borrow an OS path component as UTF-8, rejecting anything that cannot be
/// stored in an archive name.
pub(crate) fn component_str<'a>(part: &'a std::ffi::OsStr, whole: &Path) -> Result<&'a str> {
    let s = part.to_str().ok_or_else(|| PakError::InvalidPath {
        path: whole.to_path_buf(),
        reason: "name is not valid UTF-8",
    })?;
    if s.contains(SEPARATOR) {
        return Err(PakError::InvalidPath {
            path: whole.to_path_buf(),
            reason: "name contains a backslash",
        });
    }
    Ok(s)
}
