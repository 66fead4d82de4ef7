use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PakError, Result};
use crate::io::FileSystem;

use super::path::{component_str, encode_dir_name};
use super::structures::{Archive, Directory, FileEntry};

/// Build an archive from every regular file under `root`.
///
/// Files are grouped by their parent directory; a directory that holds
/// only subdirectories gets no entry of its own. Groups are ordered by
/// relative path and files within a group by [`compare_names`]. Offsets
/// are laid out contiguously after the headers.
///
/// # Errors
///
/// Fails without producing a partial archive if any file cannot be read
/// or any name cannot be stored (non UTF-8, or containing `\`).
pub fn import<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<Archive> {
    // BTreeMap over relative paths orders groups component by component.
    let mut groups: BTreeMap<PathBuf, Vec<(String, PathBuf)>> = BTreeMap::new();
    for path in fs.list_files(root)? {
        let relative = path.strip_prefix(root).map_err(|_| PakError::InvalidPath {
            path: path.clone(),
            reason: "file is outside the directory being packed",
        })?;
        let file_name = relative.file_name().ok_or_else(|| PakError::InvalidPath {
            path: path.clone(),
            reason: "file has no name",
        })?;
        let name = component_str(file_name, &path)?.to_string();
        let parent = relative.parent().unwrap_or(Path::new("")).to_path_buf();
        groups.entry(parent).or_default().push((name, path));
    }

    let mut directories = Vec::with_capacity(groups.len());
    for (relative, mut files) in groups {
        files.sort_by(|a, b| compare_names(&a.0, &b.0));

        let name = encode_dir_name(&relative)?;
        let mut entries = Vec::with_capacity(files.len());
        for (file_name, path) in files {
            let content = fs.read(&path)?;
            entries.push(FileEntry::new(file_name, content));
        }

        debug!(dir = %name, files = entries.len(), "imported directory");
        directories.push(Directory {
            index: 0,
            name,
            files: entries,
        });
    }

    let archive = Archive::from_directories(directories);
    let bytes = archive.encoded_len()?;
    info!(
        root = %root.display(),
        directories = archive.directories.len(),
        files = archive.file_count(),
        bytes,
        "imported directory tree"
    );
    Ok(archive)
}

/// Order file names case-insensitively by comparing their bytes with
/// ASCII letters uppercased.
///
/// Non-ASCII bytes compare as-is. Names that fold to the same string fall
/// back to byte order, so the result is deterministic.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let upper_a = a.bytes().map(|c| c.to_ascii_uppercase());
    let upper_b = b.bytes().map(|c| c.to_ascii_uppercase());
    upper_a.cmp(upper_b).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFileSystem;
    use crate::pak::crc;

    fn names(dir: &Directory) -> Vec<&str> {
        dir.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn case_insensitive_file_order() {
        let mut fs = MemoryFileSystem::new();
        for name in ["B.txt", "a.txt", "C.txt"] {
            fs.insert(format!("root/d/{name}"), name.as_bytes().to_vec());
        }
        let archive = import(&fs, Path::new("root")).unwrap();
        assert_eq!(names(&archive.directories[0]), ["a.txt", "B.txt", "C.txt"]);
    }

    #[test]
    fn compare_names_folds_case() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("_x", "a"), Ordering::Greater);
        assert_eq!(compare_names("A", "a"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn compare_names_only_folds_ascii() {
        // No multi-character expansion: "ß" is not treated as "SS"
        assert_eq!(compare_names("ss", "ß"), Ordering::Less);
        assert_eq!(compare_names("ST", "ß"), Ordering::Less);
        assert_eq!(compare_names("Z", "é"), Ordering::Less);
        assert_eq!(compare_names("É", "é"), Ordering::Less);
    }

    #[test]
    fn groups_by_parent_and_skips_intermediate_dirs() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("root/top.bin", b"t".to_vec());
        fs.insert("root/bin_win32/effects/fx.bin", b"fx".to_vec());
        fs.insert("root/bin_win32/effects/deeper/d.bin", b"d".to_vec());
        fs.insert("root/audio/a.ogg", b"ogg".to_vec());

        let archive = import(&fs, Path::new("root")).unwrap();
        let dirs: Vec<(u32, &str)> = archive
            .directories
            .iter()
            .map(|d| (d.index, d.name.as_str()))
            .collect();
        let expected: Vec<(u32, &str)> = vec![
            (1, "\\"),
            (2, "\\audio\\"),
            (3, "\\bin_win32\\\\effects\\"),
            (4, "\\bin_win32\\\\effects\\\\deeper\\"),
        ];
        assert_eq!(dirs, expected);
        archive.verify().unwrap();
    }

    #[test]
    fn assets_scenario() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("root/assets/x.bin", vec![0xDE, 0xAD, 0xBE, 0xEF]);
        fs.insert("root/assets/y.bin", vec![0xCA, 0xFE]);

        let archive = import(&fs, Path::new("root")).unwrap();
        assert_eq!(archive.directories.len(), 1);
        let dir = &archive.directories[0];
        assert_eq!(dir.files.len(), 2);

        // 24 + (16 + "\assets\" 9) + 2 * (28 + "x.bin" 6)
        assert_eq!(archive.base_offset, 24 + 25 + 68);
        let (x, y) = (&dir.files[0], &dir.files[1]);
        assert_eq!(x.archive_offset, archive.base_offset);
        assert_eq!(y.archive_offset, archive.base_offset + 4);
        assert_eq!(x.checksum, crc::checksum(&[0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(y.checksum, crc32fast::hash(&[0xCA, 0xFE]));
    }

    #[test]
    fn unreadable_file_aborts() {
        struct Broken(MemoryFileSystem);
        impl FileSystem for Broken {
            fn read(&self, path: &Path) -> Result<Vec<u8>> {
                if path.ends_with("bad") {
                    return Err(PakError::io(path, std::io::Error::other("denied")));
                }
                self.0.read(path)
            }
            fn write(&mut self, path: &Path, data: &[u8]) -> Result<()> {
                self.0.write(path, data)
            }
            fn create_dir_all(&mut self, path: &Path) -> Result<()> {
                self.0.create_dir_all(path)
            }
            fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
                self.0.list_files(root)
            }
            fn exists(&self, path: &Path) -> bool {
                self.0.exists(path)
            }
        }

        let mut inner = MemoryFileSystem::new();
        inner.insert("root/good", b"g".to_vec());
        inner.insert("root/bad", b"b".to_vec());
        let err = import(&Broken(inner), Path::new("root")).unwrap_err();
        assert!(matches!(err, PakError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut fs = MemoryFileSystem::new();
        fs.insert(Path::new("root").join(OsStr::from_bytes(b"\xff")), b"x".to_vec());
        let err = import(&fs, Path::new("root")).unwrap_err();
        assert!(matches!(err, PakError::InvalidPath { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_backslash_in_name() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("root/we\\ird", b"x".to_vec());
        assert!(matches!(
            import(&fs, Path::new("root")),
            Err(PakError::InvalidPath { .. })
        ));
    }
}
