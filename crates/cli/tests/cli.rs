//! End-to-end tests for the `hsboot` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn hsboot(root: &Path) -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("hsboot");
    cmd.env_remove("RUST_LOG")
        .env_remove("HSBOOT_PROJECT_ROOT")
        .arg("--root")
        .arg(root);
    cmd
}

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("backend")).unwrap();
    fs::write(
        root.join("backend/backend.cabal"),
        "name: backend\nversion: 0.1\nlibrary\n  hs-source-dirs: src\n  default-extensions: OverloadedStrings\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("common")).unwrap();
    fs::write(
        root.join("common/package.yaml"),
        "library:\n  source-dirs: src\n  default-extensions: [GADTs, OverloadedStrings]\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("frontend")).unwrap();
    fs::write(
        root.join("frontend/frontend.cabal"),
        "name: frontend\nversion: 0.1\nlibrary\n",
    )
    .unwrap();

    temp_dir
}

#[test]
fn test_ide_args() {
    let project = project();
    let root = project.path().canonicalize().unwrap();
    let expected = format!(
        "-no-user-package-db -i{}:{}:{} -XGADTs -XOverloadedStrings\n",
        root.join("backend/src").display(),
        root.join("common/src").display(),
        root.join("frontend/.").display(),
    );

    hsboot(project.path())
        .arg("ide-args")
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_ide_args_json() {
    let project = project();
    hsboot(project.path())
        .args(["ide-args", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"["-no-user-package-db","-i"#))
        .stdout(predicate::str::contains(r#""-XGADTs","-XOverloadedStrings"]"#));
}

#[test]
fn test_package_flag_limits_packages() {
    let project = project();
    let root = project.path().canonicalize().unwrap();
    hsboot(project.path())
        .args(["--package", "backend", "ide-args"])
        .assert()
        .success()
        .stdout(format!(
            "-no-user-package-db -i{} -XOverloadedStrings\n",
            root.join("backend/src").display()
        ));
}

#[test]
fn test_missing_packages_warn_but_continue() {
    let project = project();
    hsboot(project.path())
        .args(["--package", "backend", "--package", "missing", "ide-args"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to find pkgs in"))
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_no_packages_is_fatal() {
    let empty = TempDir::new().unwrap();
    hsboot(empty.path())
        .arg("ide-args")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No valid pkgs found in"))
        .stderr(predicate::str::contains("backend"))
        .stderr(predicate::str::contains("frontend"));
}

#[test]
fn test_parse_errors_are_reported() {
    let project = project();
    fs::write(
        project.path().join("frontend/frontend.cabal"),
        "library\n  hs-source-dirs: src\n",
    )
    .unwrap();

    hsboot(project.path())
        .arg("ide-args")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to parse"))
        .stderr(predicate::str::contains("No 'name' field."));
}

#[cfg(unix)]
#[test]
fn test_repl_dry_run() {
    let project = project();
    hsboot(project.path())
        .args(["repl", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ghci -ghci-script "))
        .stdout(predicate::str::contains("/.ghci -no-user-package-db -i"))
        .stdout(predicate::str::contains("Working directory: "));
}

#[test]
fn test_watch_dry_run() {
    let project = project();
    hsboot(project.path())
        .args(["watch", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ghcid -W '--command=ghci -Wall"))
        .stdout(predicate::str::contains("--reload=config --outputfile=ghcid-output.txt"))
        .stdout(predicate::str::contains("--test").not());
}

#[test]
fn test_init_writes_detected_packages() {
    let project = project();
    hsboot(project.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 packages: backend, common, frontend"));

    let written = fs::read_to_string(project.path().join(".hsboot.json")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["packages"], serde_json::json!(["backend", "common", "frontend"]));
    assert_eq!(config["reloader"], "ghcid");
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let project = project();
    fs::write(project.path().join(".hsboot.json"), r#"{"packages": ["backend"]}"#).unwrap();

    hsboot(project.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config already exists"));
    assert_eq!(
        fs::read_to_string(project.path().join(".hsboot.json")).unwrap(),
        r#"{"packages": ["backend"]}"#
    );

    hsboot(project.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert_ne!(
        fs::read_to_string(project.path().join(".hsboot.json")).unwrap(),
        r#"{"packages": ["backend"]}"#
    );
}

#[test]
fn test_config_packages_are_used() {
    let project = project();
    fs::write(project.path().join(".hsboot.json"), r#"{"packages": ["common"]}"#).unwrap();

    hsboot(project.path())
        .arg("ide-args")
        .assert()
        .success()
        .stdout(predicate::str::contains("common"))
        .stdout(predicate::str::contains("backend").not());
}

#[test]
fn test_invalid_root_is_fatal() {
    let project = project();
    hsboot(&project.path().join("nope"))
        .arg("ide-args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project root"));
}
