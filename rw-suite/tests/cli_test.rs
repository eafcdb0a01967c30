//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use rw_core::{ChunkTag, ChunkWriter, RwVersion};
use std::fs;
use tempfile::TempDir;

const DEFINITIONS: &str = "\
objs
1000, wall01, generic, 299, 0
end
txdp
generic, common
end
";

fn rw_suite() -> Command {
    Command::cargo_bin("rw-suite").unwrap()
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("walls.ide"), DEFINITIONS).unwrap();
    dir
}

#[test]
fn test_formats_lists_every_extension() {
    let assert = rw_suite().arg("formats").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for extension in ["dff", "txd", "col", "ifp", "ide", "ipl", "img"] {
        assert!(output.contains(extension), "{extension} missing from {output}");
    }
}

#[test]
fn test_info_text() {
    let dir = workspace();
    rw_suite()
        .arg("info")
        .arg(dir.path().join("walls.ide"))
        .assert()
        .success()
        .stdout(predicate::str::contains("IDE - Item Definition File"))
        .stdout(predicate::str::contains("objs: 1 typed rows"));
}

#[test]
fn test_info_json() {
    let dir = workspace();
    let assert = rw_suite()
        .args(["info", "--json"])
        .arg(dir.path().join("walls.ide"))
        .assert()
        .success();
    let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(summary["format"], "Ide");
    assert_eq!(summary["stats"][0]["label"], "Sections");
    assert_eq!(summary["stats"][0]["value"], "2");
}

#[test]
fn test_info_json_full() {
    let dir = workspace();
    rw_suite()
        .args(["info", "--json", "--full"])
        .arg(dir.path().join("walls.ide"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"wall01\""));
}

#[test]
fn test_validate_reports_failures() {
    let dir = workspace();
    let broken = dir.path().join("broken.ipl");
    fs::write(&broken, "zone\nA, 0, 1, 2, 3, 4, 5, 6\nend\n").unwrap();

    rw_suite()
        .arg("validate")
        .arg(dir.path().join("walls.ide"))
        .assert()
        .success()
        .stdout(predicate::str::contains("walls.ide"));

    rw_suite()
        .arg("validate")
        .arg(dir.path().join("walls.ide"))
        .arg(&broken)
        .assert()
        .failure()
        .stdout(predicate::str::contains("line 2: expected 9 fields, found 8"))
        .stderr(predicate::str::contains("1 of 2 files failed validation"));
}

#[test]
fn test_convert_round_trips() {
    let dir = workspace();
    let output = dir.path().join("copy.IDE");
    rw_suite()
        .arg("convert")
        .arg(dir.path().join("walls.ide"))
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(output).unwrap(), DEFINITIONS);
}

#[test]
fn test_convert_rejects_other_kind() {
    let dir = workspace();
    rw_suite()
        .arg("convert")
        .arg(dir.path().join("walls.ide"))
        .arg(dir.path().join("walls.dff"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("can not be saved as Dff"));
    assert!(!dir.path().join("walls.dff").exists());
}

#[test]
fn test_unknown_extension() {
    let dir = workspace();
    let path = dir.path().join("gta3.dir");
    fs::write(&path, [0; 32]).unwrap();
    rw_suite()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no codec handles this extension"));
}

#[test]
fn test_missing_file() {
    rw_suite()
        .args(["info", "does/not/exist.dff"])
        .assert()
        .failure();
}

fn texture_dictionary() -> Vec<u8> {
    let mut writer = ChunkWriter::new(RwVersion::VICE_CITY);
    {
        let mut dictionary = writer.begin_chunk(ChunkTag::TEXTURE_DICTIONARY);
        {
            let mut data = dictionary.begin_chunk(ChunkTag::STRUCT);
            data.write_u16(0);
            data.write_u16(0);
        }
        dictionary.write_empty_chunk(ChunkTag::EXTENSION);
    }
    writer.into_bytes()
}

#[test]
fn test_tree_of_chunk_stream() {
    let dir = workspace();
    // detection goes by content, not by the misleading extension
    let path = dir.path().join("generic.bin");
    fs::write(&path, texture_dictionary()).unwrap();
    rw_suite()
        .args(["tree", "--no-color"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("generic.bin 3.4.0.3 (Vice City)"))
        .stdout(predicate::str::contains("├── 💾 Struct (4 B) @0xc"))
        .stdout(predicate::str::contains("└── 💾 Extension (0 B) @0x1c"));
}

#[test]
fn test_tree_depth_limit() {
    let dir = workspace();
    let path = dir.path().join("generic.txd");
    fs::write(&path, texture_dictionary()).unwrap();
    rw_suite()
        .args(["tree", "--no-color", "--depth", "1"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Texture Dictionary"))
        .stdout(predicate::str::contains("Struct").not());
}

#[test]
fn test_tree_of_text_table() {
    let dir = workspace();
    rw_suite()
        .args(["tree", "--no-color"])
        .arg(dir.path().join("walls.ide"))
        .assert()
        .success()
        .stdout(predicate::str::contains("IDE - Item Definition File"))
        .stdout(predicate::str::contains("Section: objs: 1 typed rows"));
}

#[test]
fn test_tree_of_unknown_file() {
    let dir = workspace();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();
    rw_suite()
        .arg("tree")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognised file format"));
}
