use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lexm() -> Command {
    let mut cmd = Command::cargo_bin("lexm").unwrap();
    cmd.env_remove("LEXM_CONFIG")
        .env_remove("LEXM_VERBOSE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn scan_text_prints_lexemes() {
    lexm()
        .args(["--no-color", "scan", "--text", "let x = 0x1F;"])
        .assert()
        .success()
        .stdout(predicate::str::contains("numeric \"0x1F\" @ 1:9 = 31 (i8)"))
        .stdout(predicate::str::contains("';' \";\" @ 1:13"));
}

#[test]
fn scan_reports_unrecognized_input() {
    lexm()
        .args(["scan", "--text", "a \u{e9} b", "--deny-unrecognized"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("W0101"));
}

#[test]
fn scan_file_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input.txt");
    std::fs::write(&path, "a\nb = 2").unwrap();
    let output = lexm()
        .arg("scan")
        .arg(&path)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(4));
    assert_eq!(json[3]["value"]["type"], "i8");
}

#[test]
fn config_file_changes_separators() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("lexm.toml");
    std::fs::write(&config, "[numeric]\nseparator = \"_\"\ndefault-float = \"f64\"\n").unwrap();
    lexm()
        .arg("--config")
        .arg(&config)
        .args(["extract", "1_000", "0.5"])
        .assert()
        .success()
        .stdout("1_000\ti16\t1000\n0.5\tf64\t0.5\n");
}

#[test]
fn missing_config_fails() {
    lexm()
        .args(["--config", "/nonexistent/lexm.toml", "extract", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn generate_is_seeded() {
    let run = || {
        lexm()
            .args(["generate", "--seed", "42", "-n", "5", "--check"])
            .output()
            .unwrap()
    };
    let first = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, run().stdout);
    assert_eq!(String::from_utf8_lossy(&first.stdout).lines().count(), 5);
}
