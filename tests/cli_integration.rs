//! Integration tests for CLI argument handling and command dispatch.

use assert_cmd::cargo::cargo_bin_cmd;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("checklist"))
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_inputs_prints_getting_started() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    // An empty project root means no trained model is found
    cmd.env("PROJECT_DIR", temp.path());
    cmd.env("XDG_CONFIG_HOME", temp.path());
    cmd.env_remove("BIRDSPOT_MODEL");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("birdspot config init"))
        .stdout(predicate::str::contains("Run 'birdspot -h' for all options."));
}

#[test]
fn test_gpu_cpu_flags_conflict() {
    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("--gpu").arg("--cpu").arg("photo.jpg");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_confidence_range_is_validated() {
    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("-c").arg("1.5").arg("photo.jpg");

    cmd.assert().failure().stderr(predicate::str::contains(
        "confidence must be between 0.0 and 1.0",
    ));
}

#[test]
fn test_missing_model_fails_before_touching_inputs() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("-m")
        .arg(temp.path().join("absent.onnx"))
        .arg("photo.jpg");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Starting predictions").not())
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_unrecognized_model_format_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let model = temp.path().join("weights.bin");
    fs::write(&model, b"not a model").unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("-m").arg(&model).arg("photo.jpg");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid model file format"));
}

#[test]
fn test_pt_weights_point_to_export() {
    let temp = tempfile::tempdir().unwrap();
    let model = temp.path().join("best.pt");
    fs::write(&model, b"torch checkpoint").unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("-m").arg(&model).arg("photo.jpg");

    cmd.assert().failure().stderr(predicate::str::contains(
        "export the weights to ONNX first",
    ));
}

#[test]
fn test_scrape_requires_api_key() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.env("XDG_CONFIG_HOME", temp.path());
    cmd.env_remove("FLICKR_API_KEY");
    cmd.arg("scrape").arg("-s").arg("Mallard");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("FLICKR_API_KEY"));
}

#[test]
fn test_config_path_prints_location() {
    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("config").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file_once() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.env("XDG_CONFIG_HOME", temp.path());
    cmd.arg("config").arg("init");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(temp.path().join("birdspot").join("config.toml").exists());

    let mut again = cargo_bin_cmd!("birdspot");
    again.env("XDG_CONFIG_HOME", temp.path());
    again.arg("config").arg("init");

    again
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_verify_flags_broken_images() {
    let temp = tempfile::tempdir().unwrap();
    let species_dir = temp.path().join("Mallard");
    fs::create_dir_all(&species_dir).unwrap();
    ImageBuffer::from_pixel(8, 8, Rgb([60u8, 120, 180]))
        .save(species_dir.join("Mallard_0.jpg"))
        .unwrap();
    fs::write(species_dir.join("Mallard_1.jpg"), b"truncated garbage").unwrap();

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("verify").arg("--dataset-dir").arg(temp.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Mallard: 1 images, 1 defect(s)"))
        .stdout(predicate::str::contains("not a valid image"))
        .stderr(predicate::str::contains("defect"));
}

#[test]
fn test_verify_accepts_clean_dataset() {
    let temp = tempfile::tempdir().unwrap();
    for species in ["Mallard", "Snowy Egret"] {
        let dir = temp.path().join(species);
        fs::create_dir_all(&dir).unwrap();
        ImageBuffer::from_pixel(8, 8, Rgb([60u8, 120, 180]))
            .save(dir.join(format!("{species}_0.jpg")))
            .unwrap();
    }

    let mut cmd = cargo_bin_cmd!("birdspot");
    cmd.arg("verify").arg("--dataset-dir").arg(temp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 species, 2 valid images"));
}
