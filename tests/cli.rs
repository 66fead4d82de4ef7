use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn pkbe() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pkbe"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_arguments_prints_usage() {
    let out = pkbe().output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
}

#[test]
fn test_bad_arguments_exit_with_argument_error() {
    let out = pkbe().args(["explode", "x"]).output().unwrap();
    assert_eq!(out.status.code(), Some(3));

    let out = pkbe().args(["unpak", "only-one"]).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn test_missing_input_is_argument_error() {
    let tmp = tempdir().unwrap();
    let out = pkbe()
        .arg("unpak")
        .arg(tmp.path().join("missing.pak"))
        .arg(tmp.path().join("out"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));

    let out = pkbe()
        .arg("repak")
        .arg(tmp.path().join("no-such-dir"))
        .arg(tmp.path().join("x.pak"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn test_corrupt_archive_is_format_error() {
    let tmp = tempdir().unwrap();
    let pak = tmp.path().join("bad.pak");
    fs::write(&pak, b"PKBE\0\0\0\x01\0\0").unwrap();

    let out = pkbe()
        .arg("unpak")
        .arg(&pak)
        .arg(tmp.path().join("out"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid pak"));
}

#[test]
fn test_repak_unpak_list_verify() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("effects")).unwrap();
    fs::write(src.join("effects/b.txt"), b"bee").unwrap();
    fs::write(src.join("effects/A.txt"), b"ay").unwrap();
    let pak = tmp.path().join("src.pak");

    let out = pkbe().arg("repak").arg(&src).arg(&pak).output().unwrap();
    assert_eq!(out.status.code(), Some(0));

    let out = pkbe().arg("list").arg(&pak).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "\\effects\\A.txt\n\\effects\\b.txt\n"
    );

    let out = pkbe().arg("verify").arg(&pak).output().unwrap();
    assert_eq!(out.status.code(), Some(0));

    let dst = tmp.path().join("dst");
    let out = pkbe().arg("-q").arg("unpak").arg(&pak).arg(&dst).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read(dst.join("effects/b.txt")).unwrap(), b"bee");
    assert_eq!(fs::read(dst.join("effects/A.txt")).unwrap(), b"ay");
}
