use std::{path::Path, process::Command};

const MANIFEST: &str = r#"
[output]
path = "web/api.ts"

[declarations.User]
fields = [{ name = "Username", type = "string" }]

[types]
TestUser = "User"
"#;

const EXPECTED: &str = "// NOTE: This file was auto-generated
// and should NOT be edited manually.

export namespace GoGenerated {
\texport type TestUser = {
\t\tUsername: string
\t}
}
";

fn tsmirror(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tsmirror"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_generate_writes_output_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tsmirror.toml"), MANIFEST).unwrap();

    let output = tsmirror(dir.path(), &["generate"]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.path().join("web/api.ts")).unwrap();
    assert_eq!(written, EXPECTED);

    let again = tsmirror(dir.path(), &["generate"]);
    assert!(again.status.success());
    assert!(String::from_utf8_lossy(&again.stdout).contains("up to date"));
}

#[test]
fn test_generate_to_stdout_with_namespace() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tsmirror.toml"), MANIFEST).unwrap();

    let output = tsmirror(dir.path(), &["generate", "-o", "-", "--namespace", "Api"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, EXPECTED.replace("GoGenerated", "Api"));
    assert!(!dir.path().join("web/api.ts").exists());
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tsmirror.toml"), MANIFEST).unwrap();

    let output = tsmirror(dir.path(), &["generate", "--dry-run"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Would write"));
    assert!(!dir.path().join("web/api.ts").exists());
}

#[test]
fn test_invalid_manifest_exits_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tsmirror.toml"),
        "[types]\nUsers = \"[]User\"\n",
    )
    .unwrap();

    let output = tsmirror(dir.path(), &["check"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown type 'User'"));
}

#[test]
fn test_init_then_check() {
    let dir = tempfile::tempdir().unwrap();

    let output = tsmirror(dir.path(), &["init"]);
    assert!(output.status.success());
    assert!(dir.path().join("tsmirror.toml").exists());

    let output = tsmirror(dir.path(), &["check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("is valid"));
    assert!(stdout.contains("2 types, 1 route, 1 constant"));

    let output = tsmirror(dir.path(), &["init"]);
    assert!(!output.status.success());
}
