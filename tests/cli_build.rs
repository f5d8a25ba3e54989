use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn specbuild(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_specbuild"))
        .current_dir(dir)
        .args(args)
        .env_remove("SPECBUILD_LOG")
        .output()
        .expect("failed to execute specbuild")
}

fn workspace_with_dangling_ref() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "spec/roles/admin.toml", "[role]\nid = \"admin\"\n");
    write(
        tmp.path(),
        "spec/guards/auth.toml",
        "[guard]\nid = \"auth-guard\"\n[relations]\nroles = [\"admin\", \"ghost\"]\n",
    );
    tmp
}

#[test]
fn no_argument_build_uses_defaults() {
    let tmp = workspace_with_dangling_ref();
    let output = specbuild(tmp.path(), &[]);
    assert!(
        output.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let generated = tmp.path().join("generated");
    for file in [
        "tree.json",
        "relations.json",
        "routes.json",
        "manifest.json",
        "status.json",
        "content/roles/admin.toml.json",
        "content/guards/auth.toml.json",
    ] {
        assert!(generated.join(file).is_file(), "missing artifact {}", file);
    }
}

#[test]
fn deny_warnings_exits_with_status_two() {
    let tmp = workspace_with_dangling_ref();
    let output = specbuild(tmp.path(), &["build", "--deny-warnings"]);
    assert_eq!(output.status.code(), Some(2));
    // Artifacts are still written.
    assert!(tmp.path().join("generated/manifest.json").is_file());
}

#[test]
fn missing_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let output = specbuild(tmp.path(), &["build", "--root", "does-not-exist"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("specbuild error"), "stderr: {}", stderr);
    assert!(!tmp.path().join("generated").exists());
}

#[test]
fn check_reports_without_writing() {
    let tmp = workspace_with_dangling_ref();
    let output = specbuild(tmp.path(), &["check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ghost"), "stdout: {}", stdout);
    assert!(!tmp.path().join("generated").exists());
}

#[test]
fn json_summary_and_config_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "docs/spec/roles/admin.toml", "[role]\nid = \"admin\"\n");
    write(
        tmp.path(),
        "specbuild.toml",
        "[build]\nroot = \"docs/spec\"\nout = \"build/spec\"\n",
    );

    let output = specbuild(tmp.path(), &["build", "--format", "json"]);
    assert!(output.status.success());
    let status: Value = serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(status["summary"]["entities"], 1);
    assert_eq!(status["summary"]["warnings"], 0);
    assert!(tmp.path().join("build/spec/manifest.json").is_file());
}

#[test]
fn malformed_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "specbuild.toml", "[build\n");
    let output = specbuild(tmp.path(), &["build"]);
    assert_eq!(output.status.code(), Some(1));
}
