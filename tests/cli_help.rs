use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("bagplot").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--plot-header-timediff"));
}

#[test]
fn cli_requires_a_plot_kind() {
    let mut cmd = Command::cargo_bin("bagplot").unwrap();
    cmd.args(["run.bag", "/odom"]).assert().failure().code(2);
}

#[test]
fn cli_rejects_two_plot_kinds() {
    let mut cmd = Command::cargo_bin("bagplot").unwrap();
    cmd.args(["run.bag", "-t", "-o"]).assert().failure().code(2);
}

#[test]
fn cli_lists_plot_kinds() {
    let mut cmd = Command::cargo_bin("bagplot").unwrap();
    cmd.arg("--list-kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("header_timediff").and(predicate::str::contains("nav_msgs/Odometry")));
}

#[test]
fn cli_missing_bag_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("bagplot").unwrap();
    cmd.current_dir(dir.path())
        .args(["does_not_exist.bag", "/odom", "--plot-odometry"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("recording not found"));
    assert!(!dir.path().join("plots").exists());
}
