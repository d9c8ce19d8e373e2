use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::PredicateBooleanExt;
use tempfile::tempdir;

// D depends on B; B and C depend on A.
const SCENARIO: &str = r#"{
  "a": { "version": "1.0.0", "dependencies": [] },
  "b": { "version": "1.1.0", "dependencies": ["a"] },
  "c": { "version": "0.3.0", "dependencies": ["a"] },
  "d": { "version": "2.0.0", "dependencies": ["b"] }
}
"#;

fn pipdeps() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("pipdeps"));
    cmd.env_remove("PIPDEPS_SNAPSHOT").env_remove("PIPDEPS_PIP");
    cmd
}

#[test]
fn test_check_reports_orphan_roots() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("check")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("c 0.3.0"))
        .stdout(predicates::str::contains("d 2.0.0"))
        .stdout(predicates::str::contains("a 1.0.0").not())
        .stdout(predicates::str::contains("b 1.1.0").not());
}

#[test]
fn test_plan_delete_includes_unshared_dependencies() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("plan-delete")
        .arg("d")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("safe to remove"))
        .stdout(predicates::str::contains("Also removable with it: b"));
}

#[test]
fn test_plan_delete_reports_target_in_use() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("plan-delete")
        .arg("a")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("`a` is required by: b, c"));
}

#[test]
fn test_plan_delete_normalizes_the_query() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("plan-delete")
        .arg("D")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("Also removable with it: b"));
}

#[test]
fn test_plan_delete_unknown_package_fails() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("plan-delete")
        .arg("nonexistent")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicates::str::contains("`nonexistent` is not in the snapshot"));
}

#[test]
fn test_check_without_snapshot_fails_with_hint() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");

    pipdeps()
        .arg("check")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicates::str::contains("pipdeps refresh"));
}

#[test]
fn test_malformed_snapshot_fails_with_hint() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, "not json").unwrap();

    pipdeps()
        .arg("check")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicates::str::contains("Snapshot is malformed"));
}

#[test]
fn test_refresh_failure_preserves_existing_snapshot() {
    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("requirements.json");
    std::fs::write(&snapshot, SCENARIO).unwrap();

    pipdeps()
        .arg("refresh")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--pip")
        .arg("pipdeps-test-no-such-pip-executable")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Could not query installed packages"));

    assert_eq!(std::fs::read_to_string(&snapshot).unwrap(), SCENARIO);
}

/// Shell stub standing in for pip: a fixed environment of three packages
/// where requests requires idna and urllib3.
#[cfg(unix)]
fn write_stub_pip(dir: &std::path::Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
if [ "$1" = "list" ]; then
  printf '[{"name": "Requests", "version": "2.31.0"}, {"name": "idna", "version": "3.7"}, {"name": "urllib3", "version": "2.2.1"}]\n'
  exit 0
fi
if [ "$1" = "show" ]; then
  case "$2" in
    Requests) printf 'Name: requests\nVersion: 2.31.0\nRequires: idna, urllib3\n' ;;
    idna) printf 'Name: idna\nVersion: 3.7\nRequires:\n' ;;
    urllib3) printf 'Name: urllib3\nVersion: 2.2.1\nRequires:\n' ;;
    *) exit 1 ;;
  esac
  exit 0
fi
exit 1
"#;
    let path = dir.join("pip-stub");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_end_to_end_refresh_then_analyze() {
    let dir = tempdir().unwrap();
    let pip = write_stub_pip(dir.path());
    let snapshot = dir.path().join("requirements.json");

    pipdeps()
        .arg("refresh")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--pip")
        .arg(&pip)
        .assert()
        .success()
        .stdout(predicates::str::contains("3 packages"));

    let content = std::fs::read_to_string(&snapshot).unwrap();
    assert!(content.contains("\"requests\""));
    assert!(content.contains("\"idna\""));
    assert!(content.contains("\"urllib3\""));

    // requests is the only root; removing it frees idna and urllib3.
    pipdeps()
        .arg("check")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("requests 2.31.0"));

    pipdeps()
        .arg("plan-delete")
        .arg("requests")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicates::str::contains("Also removable with it: idna, urllib3"));
}

#[cfg(unix)]
#[test]
fn test_refresh_is_byte_deterministic() {
    let dir = tempdir().unwrap();
    let pip = write_stub_pip(dir.path());
    let snapshot = dir.path().join("requirements.json");

    pipdeps()
        .arg("refresh")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--pip")
        .arg(&pip)
        .assert()
        .success();
    let first = std::fs::read_to_string(&snapshot).unwrap();

    pipdeps()
        .arg("refresh")
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--pip")
        .arg(&pip)
        .assert()
        .success();
    let second = std::fs::read_to_string(&snapshot).unwrap();

    assert_eq!(first, second);
}
