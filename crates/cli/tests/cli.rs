use assert_cmd::Command;
use predicates::prelude::*;

fn whirl() -> Command {
    let mut cmd = Command::cargo_bin("whirl-cli").unwrap();
    // Keep a developer's .env or shell settings out of the run
    for key in [
        "WHIRL_SEARCH_URL",
        "WHIRL_BROWSER",
        "WHIRL_PASTE_DELAY_MS",
        "WHIRL_SCRATCH_DIR",
        "WHIRL_CLEANUP_DELAY_MS",
        "WHIRL_OVERLAY_SETTLE_MS",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn help_lists_public_subcommands() {
    whirl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Google Lens"))
        .stdout(predicate::str::contains("daemon"))
        .stdout(predicate::str::contains("capture"))
        .stdout(predicate::str::contains("overlay").not());
}

#[test]
fn version_prints_package_version() {
    whirl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_fails() {
    whirl().arg("dance").assert().failure();
}

#[test]
fn bad_delay_in_environment_is_reported_before_any_ui() {
    whirl()
        .arg("capture")
        .env("WHIRL_PASTE_DELAY_MS", "soon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WHIRL_PASTE_DELAY_MS"));
}

#[test]
fn non_http_url_is_rejected() {
    whirl()
        .args(["capture", "--url", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http"));
}

#[test]
fn dotenv_in_working_directory_is_read() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "WHIRL_CLEANUP_DELAY_MS=later\n").unwrap();

    whirl()
        .current_dir(dir.path())
        .arg("capture")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WHIRL_CLEANUP_DELAY_MS"));
}
