//! Command-line smoke tests against the built `terrain` binary.

use std::process::Command;

fn terrain() -> Command {
    Command::new(env!("CARGO_BIN_EXE_terrain"))
}

#[test]
fn test_region_json_contains_request() {
    let out = terrain()
        .args(["--format", "json", "region", "--lat", "59.853952", "--lon", "8.648471"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["side_km"], 2.0);
    let url = value["url"].as_str().unwrap();
    assert!(url.starts_with("https://wms.geonorge.no/"));
    assert!(url.contains("BBOX="));
}

#[test]
fn test_region_outside_norway_fails() {
    let out = terrain()
        .args(["region", "--lat", "68.55", "--lon", "40.18"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("TERRAIN-2002"));
}

#[test]
fn test_config_file_sets_side() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("terrain.toml");
    std::fs::write(&config, "[region]\nside_km = 5.0\n").unwrap();

    let out = terrain()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "region", "--lat", "60", "--lon", "10"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["side_km"], 5.0);
}

#[test]
fn test_build_missing_raster_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.stl");

    let out = terrain()
        .arg("build")
        .arg(dir.path().join("missing.png"))
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn test_info_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = terrain()
        .arg("info")
        .arg(dir.path().join("missing.stl"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}
