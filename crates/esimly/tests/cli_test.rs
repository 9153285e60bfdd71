#![allow(clippy::unwrap_used)]
// CLI smoke tests: argument parsing, help output, and the guard rails
// that must fail before any network traffic.

use assert_cmd::Command;
use predicates::prelude::*;

fn esimly() -> Command {
    let mut cmd = Command::cargo_bin("esimly").unwrap();
    // Isolate from any real config/session on the build machine.
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd.env_remove("XDG_CONFIG_HOME");
    cmd.env_remove("ESIMLY_PROFILE");
    cmd
}

#[test]
fn help_lists_the_command_families() {
    esimly()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("shop"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn version_flag_works() {
    esimly()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_args_shows_usage() {
    esimly()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn admin_commands_require_a_session() {
    esimly()
        .args(["admin", "users", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn shop_commands_require_a_session() {
    esimly()
        .args(["shop", "bundles"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn unknown_profile_is_reported() {
    esimly()
        .args(["--profile", "staging", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn config_path_prints_a_path() {
    esimly()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn esim_reject_requires_reason_flag() {
    // Clap-level: --reason is mandatory for reject.
    esimly()
        .args(["admin", "esim", "reject", "r1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--reason"));
}
