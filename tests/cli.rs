use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn command(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kube-schema-lint").unwrap();
    cmd.current_dir(workdir).env_remove("KUBE_SCHEMA_PATH");
    cmd
}

#[test]
fn test_lint_reports_unknown_property() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/pod-bogus.yaml"))
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("pod-bogus.yaml:5:3"))
        .stdout(predicate::str::contains("Property 'bogus' is not expected here."))
        .stdout(predicate::str::contains("Fix: Delete property 'bogus'"));
}

#[test]
fn test_no_fail_exits_zero() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests"))
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .arg("--no-fail")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 issue(s)."));
}

#[test]
fn test_error_threshold_passes_warnings() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/pod-bogus.yaml"))
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .args(["--threshold", "error"])
        .assert()
        .success();
}

#[test]
fn test_json_output() {
    let workdir = tempfile::tempdir().unwrap();
    let output = command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/deployment.yaml"))
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["totalFailures"], 1);
    assert_eq!(json["failures"][0]["check"], "unknown-property");
    assert_eq!(json["failures"][0]["resource"], "apps/v1/Deployment");
    assert_eq!(json["failures"][0]["line"], 22);
    assert_eq!(json["failures"][0]["fix"]["kind"], "deleteProperty");
}

#[test]
fn test_github_output() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/multi.yaml"))
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .args(["--format", "github", "--no-fail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("::warning file="))
        .stdout(predicate::str::contains("line=12,col=3::[unknown-property]"));
}

#[test]
fn test_schemas_from_config_file() {
    let workdir = tempfile::tempdir().unwrap();
    let config = format!(
        "schemaPaths:\n  - {}\nnoFail: true\n",
        fixtures().join("schemas").display()
    );
    std::fs::write(workdir.path().join(".kube-schema-lint.yaml"), config).unwrap();

    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/pod-bogus.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Property 'bogus' is not expected here."));
}

#[test]
fn test_schemas_from_environment() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .env("KUBE_SCHEMA_PATH", fixtures().join("schemas"))
        .arg("lint")
        .arg(fixtures().join("manifests/list.yaml"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("restartPolcy"));
}

#[test]
fn test_missing_schemas_is_an_error() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("lint")
        .arg(fixtures().join("manifests/pod-bogus.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no schema paths configured"));
}

#[test]
fn test_detect() {
    let workdir = tempfile::tempdir().unwrap();
    command(workdir.path())
        .arg("detect")
        .arg(fixtures().join("manifests"))
        .assert()
        .success()
        .stdout(predicate::str::contains("values.yaml: not kubernetes"))
        .stdout(predicate::str::contains("pod-bogus.yaml: kubernetes"));
}

#[test]
fn test_detect_honours_ignore_paths() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(
        workdir.path().join(".kube-schema-lint.yaml"),
        "ignorePaths:\n  - values.yaml\n",
    )
    .unwrap();

    command(workdir.path())
        .arg("detect")
        .arg(fixtures().join("manifests"))
        .assert()
        .success()
        .stdout(predicate::str::contains("values.yaml").not())
        .stdout(predicate::str::contains("list.yaml: kubernetes"));
}

#[test]
fn test_schemas_listing() {
    let workdir = tempfile::tempdir().unwrap();
    let output = command(workdir.path())
        .arg("schemas")
        .arg("--schemas")
        .arg(fixtures().join("schemas"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let versions: Vec<&str> = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["version"].as_str())
        .collect();
    assert_eq!(versions, vec!["v1.28.0", "v1.29.0"]);

    let resources: Vec<&str> = json["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r.as_str())
        .collect();
    assert!(resources.contains(&"v1/Pod"));
    assert!(resources.contains(&"batch/v1/Job"));
}
