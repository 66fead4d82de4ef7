use pkbe::pak::crc;
use pkbe::{
    Archive, Directory, ExportOptions, FileEntry, LocalFileSystem, PakError, decode, encode, export,
    import, read_archive, repak, unpak,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn populate(root: &Path) {
    write(root, "readme.txt", b"top level file");
    write(root, "bin_win32/effects/campfire_01.fxt", b"fire");
    write(root, "bin_win32/effects/Ash.fxt", &[0u8; 300]);
    write(root, "bin_win32/effects/empty.fxt", b"");
    write(root, "audio/music/theme.ogg", &(0..=255u8).collect::<Vec<_>>());
    fs::create_dir_all(root.join("only_subdirs/nothing_here")).unwrap();
}

#[test]
fn test_disk_roundtrip_reproduces_tree() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    let pak = tmp.path().join("game.pak");
    populate(&src);

    let mut fs_access = LocalFileSystem::new();
    repak(&mut fs_access, &src, &pak).unwrap();
    unpak(&mut fs_access, &pak, &dst, true, ExportOptions::default()).unwrap();

    for rel in [
        "readme.txt",
        "bin_win32/effects/campfire_01.fxt",
        "bin_win32/effects/Ash.fxt",
        "bin_win32/effects/empty.fxt",
        "audio/music/theme.ogg",
    ] {
        assert_eq!(
            fs::read(dst.join(rel)).unwrap(),
            fs::read(src.join(rel)).unwrap(),
            "{rel}"
        );
    }
    // Directories without files are not stored
    assert!(!dst.join("only_subdirs").exists());
}

#[test]
fn test_repack_is_byte_identical() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let mid = tmp.path().join("mid");
    populate(&src);

    let mut fs_access = LocalFileSystem::new();
    let first = tmp.path().join("first.pak");
    let second = tmp.path().join("second.pak");
    repak(&mut fs_access, &src, &first).unwrap();
    unpak(&mut fs_access, &first, &mid, true, ExportOptions::default()).unwrap();
    repak(&mut fs_access, &mid, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_imported_archive_invariants() {
    let tmp = tempdir().unwrap();
    populate(tmp.path());

    let archive = import(&LocalFileSystem::new(), tmp.path()).unwrap();
    let names: Vec<&str> = archive.directories.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["\\", "\\audio\\\\music\\", "\\bin_win32\\\\effects\\"]
    );

    let effects: Vec<&str> = archive.directories[2]
        .files
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(effects, vec!["Ash.fxt", "campfire_01.fxt", "empty.fxt"]);

    let mut expected = archive.base_offset;
    for file in archive.files() {
        assert_eq!(file.archive_offset, expected);
        assert_eq!(file.checksum, crc32fast::hash(&file.content));
        expected += file.size;
    }
    assert_eq!(archive.base_offset, archive.headers_size());
    archive.verify().unwrap();
}

#[test]
fn test_decoded_checksums_match_content() {
    let tmp = tempdir().unwrap();
    populate(&tmp.path().join("src"));
    let pak = tmp.path().join("a.pak");
    let mut fs_access = LocalFileSystem::new();
    repak(&mut fs_access, &tmp.path().join("src"), &pak).unwrap();

    let archive = read_archive(&fs_access, &pak).unwrap();
    for file in archive.files() {
        assert_eq!(file.checksum, crc::checksum(&file.content));
    }
}

#[test]
fn test_hand_built_archive_roundtrip() {
    let archive = Archive::from_directories(vec![
        Directory {
            index: 0,
            name: "\\textures\\".to_string(),
            files: vec![
                FileEntry::new("a.dds", vec![1; 10]),
                FileEntry::new("b.dds", vec![2; 20]),
            ],
        },
        Directory {
            index: 0,
            name: "\\empty\\".to_string(),
            files: Vec::new(),
        },
    ]);
    let bytes = encode(&archive).unwrap();
    assert_eq!(bytes.len() as u64, archive.encoded_len().unwrap());
    assert_eq!(&bytes[..8], b"PKBE\0\0\0\x01");
    assert_eq!(decode(&bytes).unwrap(), archive);
}

#[test]
fn test_export_failure_is_fatal() {
    let tmp = tempdir().unwrap();
    let archive = Archive::from_directories(vec![Directory {
        index: 0,
        name: "\\blocked\\".to_string(),
        files: vec![FileEntry::new("f", b"x".to_vec())],
    }]);
    // A regular file where the directory should go
    fs::write(tmp.path().join("blocked"), b"in the way").unwrap();

    let err = export(
        &archive,
        &mut LocalFileSystem::new(),
        tmp.path(),
        ExportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PakError::Io { .. }));
}
