//! End-to-end runs of the tbwz binary.

use std::fs;
use std::path::Path;
use std::process::Command;

fn tbwz() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tbwz"))
}

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sample.txt");
    fs::write(&path, b"how much wood would a woodchuck chuck ".repeat(64)).unwrap();
    path
}

#[test]
fn compress_then_decompress_tbwz() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let status = tbwz().arg("-c").arg(&input).status().unwrap();
    assert!(status.success());
    let packed = dir.path().join("sample.txt.tbwz");
    assert!(packed.exists());

    let original = fs::read(&input).unwrap();
    fs::remove_file(&input).unwrap();

    let status = tbwz().arg("-d").arg(&packed).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn compress_then_decompress_bwz() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let status = tbwz().arg("-c").arg("--bwt").arg(&input).status().unwrap();
    assert!(status.success());
    let packed = dir.path().join("sample.txt.bwz");
    assert!(packed.exists());

    let out = dir.path().join("restored.txt");
    let status = tbwz()
        .arg("-d")
        .arg("--bwt")
        .arg(&packed)
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&out).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn info_flag_prints_telemetry() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());

    let output = tbwz().arg("-c").arg("-i").arg(&input).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("block size"));
    assert!(text.contains("tunneled blocks"));
}

#[test]
fn missing_input_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let status = tbwz()
        .arg("-c")
        .arg(dir.path().join("no-such-file"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn corrupt_input_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let junk = dir.path().join("junk.tbwz");
    fs::write(&junk, b"this is not a tbwz stream at all").unwrap();
    let status = tbwz().arg("-d").arg(&junk).status().unwrap();
    assert!(!status.success());
}

#[test]
fn conflicting_modes_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let status = tbwz().arg("-c").arg("-d").arg(&input).status().unwrap();
    assert!(!status.success());
}
