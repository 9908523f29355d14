//! End-to-end CLI tests over the compiled binary.
//!
//! These stay offline: commands that would touch the record store are
//! only exercised through their failure paths, with config isolated in
//! a temp directory.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from any real user config. The returned `TempDir`
/// must stay alive for the duration of the run.
fn gatepass() -> (Command, TempDir) {
    let isolated = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gatepass").unwrap();
    cmd.env("XDG_CONFIG_HOME", isolated.path());
    cmd.env_remove("GATEPASS_PROFILE");
    (cmd, isolated)
}

#[test]
fn help_lists_the_command_tree() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("issue"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn version_flag_reports_the_crate_version() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_is_a_usage_error() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.assert().failure().code(2);
}

#[test]
fn config_path_prints_a_toml_location() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_generate_for_bash() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gatepass"));
}

#[test]
fn store_commands_fail_without_a_profile() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.args(["verify", "some-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in configuration"));
}

#[test]
fn scan_decodes_a_rendered_frame_offline() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("frame.png");

    let img = gatepass_core::encode::render_qr_text("https://example.org/verify-visitor/abc")
        .unwrap();
    img.save(&frame).unwrap();

    let (mut cmd, _config_dir) = gatepass();
    cmd.arg("scan")
        .arg(&frame)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://example.org/verify-visitor/abc",
        ));
}

#[test]
fn scan_of_blank_frames_reports_no_code() {
    let dir = tempfile::tempdir().unwrap();
    let frame = dir.path().join("blank.png");
    image::GrayImage::from_pixel(64, 64, image::Luma([255])).save(&frame).unwrap();

    let (mut cmd, _config_dir) = gatepass();
    cmd.arg("scan")
        .arg(&frame)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("No QR code found"));
}

#[test]
fn issue_requires_the_visitor_fields() {
    let (mut cmd, _config_dir) = gatepass();
    cmd.args(["issue", "--visitor", "Alice Tan"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--phone"));
}
