use assert_cmd::Command;
use predicates::prelude::*;

fn write_config(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("detector.json");
    std::fs::write(&path, json).expect("write config");
    path
}

const SINGLE_PC: &str = r#"{
    "shape": [60, 80],
    "px_size": 59.2,
    "binning": 8,
    "pc": [0.4, 0.2, 0.6],
    "convention": "bruker"
}"#;

#[test]
fn info_prints_the_detector_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args(["info", config.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("EbsdDetector (60, 80)"))
        .stdout(predicate::str::contains("pc (0.400, 0.200, 0.600)"));
}

#[test]
fn info_writes_a_geometry_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);
    let report = dir.path().join("report.json");

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "info",
            config.to_str().expect("utf8 path"),
            "--report",
            report.to_str().expect("utf8 path"),
        ])
        .assert()
        .success();

    let raw = std::fs::read_to_string(&report).expect("report written");
    assert!(raw.contains("\"aspect_ratio\""), "report was: {raw}");
}

#[test]
fn convert_rejects_unknown_conventions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "convert",
            config.to_str().expect("utf8 path"),
            "--to",
            "unknown",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("recognised conventions"));
}

#[test]
fn convert_exports_emsoft_pcs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "convert",
            config.to_str().expect("utf8 path"),
            "--to",
            "emsoft",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("17049.6"));
}

#[test]
fn crop_writes_a_remapped_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(
        &dir,
        r#"{"shape": [6, 6], "pc": [0.5, 0.3333333333333333, 0.5]}"#,
    );
    let output = dir.path().join("cropped.json");

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "crop",
            config.to_str().expect("utf8 path"),
            "--top",
            "1",
            "--bottom",
            "5",
            "--left",
            "2",
            "--right",
            "6",
            "--output",
            output.to_str().expect("utf8 path"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("EbsdDetector (4, 4)"));

    let raw = std::fs::read_to_string(&output).expect("cropped config");
    assert!(raw.contains("\"shape\""), "config was: {raw}");
}

#[test]
fn crop_with_empty_window_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);
    let output = dir.path().join("cropped.json");

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "crop",
            config.to_str().expect("utf8 path"),
            "--top",
            "4",
            "--bottom",
            "2",
            "--left",
            "0",
            "--right",
            "6",
            "--output",
            output.to_str().expect("utf8 path"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bottom must exceed top"));
}

#[test]
fn plot_writes_an_svg_screen_diagram() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);
    let output = dir.path().join("screen.svg");

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "plot",
            config.to_str().expect("utf8 path"),
            "--coordinates",
            "gnomonic",
            "--circles",
            "--output",
            output.to_str().expect("utf8 path"),
        ])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&output).expect("svg written");
    assert!(svg.starts_with("<svg"), "not an svg: {svg}");
    assert!(svg.contains("<circle"), "gnomonic circles missing");
}

#[test]
fn pc_plot_of_a_single_pc_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(&dir, SINGLE_PC);
    let output = dir.path().join("pc.svg");

    Command::cargo_bin("ebsd-detector")
        .expect("binary")
        .args([
            "plot",
            config.to_str().expect("utf8 path"),
            "--kind",
            "pc",
            "--output",
            output.to_str().expect("utf8 path"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one projection center"));
}
