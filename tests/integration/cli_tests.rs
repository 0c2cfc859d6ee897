use super::Workspace;
use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("errflags").unwrap();
    cmd.arg("--version").assert().success();
}

#[allow(deprecated)]
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("errflags").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("categories"));
}

#[test]
fn test_check_requires_files() {
    Workspace::new().errflags().arg("check").assert().failure();
}

#[test]
fn test_check_clean_file() {
    let ws = Workspace::new();
    let path = ws.file("svc.toml", "name = \"svc\"\n[log]\nlevel = \"info\"\n");

    ws.errflags()
        .args(["check", "--require", "name", "--require", "log.level"])
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no errors to report for 1 file(s)"));
}

#[test]
fn test_check_reports_grouped_errors() {
    let ws = Workspace::new();
    let broken = ws.file("broken.toml", "name = ");
    let partial = ws.file("partial.toml", "name = \"svc\"\n");

    ws.errflags()
        .args(["check", "-r", "name", "-r", "port"])
        .arg(&broken)
        .arg(&partial)
        .arg("absent.toml")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("[ParsingError]\n\t"))
        .stdout(predicate::str::contains(
            "[MissingField]\n\t".to_string()
                + &partial.display().to_string()
                + ": missing required key 'port'",
        ))
        .stdout(predicate::str::contains("[IOError]\n\tabsent.toml: "));
}

#[test]
fn test_check_only_filters_categories() {
    let ws = Workspace::new();
    let partial = ws.file("partial.toml", "other = 1\n");

    ws.errflags()
        .args(["check", "-r", "name", "--only", "io"])
        .arg(&partial)
        .arg("absent.toml")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("[IOError]"))
        .stdout(predicate::str::contains("MissingField").not());

    ws.errflags()
        .args(["check", "-r", "name", "--only", "parsing"])
        .arg(&partial)
        .assert()
        .code(0);
}

#[test]
fn test_check_only_unknown_category() {
    let ws = Workspace::new();
    let path = ws.file("svc.toml", "");

    ws.errflags()
        .args(["check", "--only", "network"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown category 'network'"));
}

#[test]
fn test_check_json_output() {
    let ws = Workspace::new();
    let a = ws.file("a.toml", "x = 1\n");
    let b = ws.file("b.toml", "y = 1\n");

    let output = ws
        .errflags()
        .args(["check", "-r", "z", "--format", "json"])
        .arg(&a)
        .arg(&b)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["flag"], "MissingField");
    assert_eq!(report["groups"][0]["bits"], serde_json::json!([2]));
    assert_eq!(report["groups"][0]["messages"].as_array().unwrap().len(), 2);
}

#[test]
fn test_warnings_logged_to_stderr_by_default() {
    let ws = Workspace::new();

    ws.errflags()
        .args(["check", "absent.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("flag=IOError"))
        .stderr(predicate::str::contains("file=absent.toml"));
}

#[test]
fn test_log_output_to_file() {
    let ws = Workspace::new();
    let log = ws.dir.path().join("run.log");

    ws.errflags()
        .args(["check", "absent.toml", "--logout"])
        .arg(&log)
        .assert()
        .code(3)
        .stderr(predicate::str::is_empty());

    let written = std::fs::read_to_string(&log).unwrap();
    assert!(written.contains("config check failed"));
}

#[test]
fn test_settings_file_sets_log_level() {
    let ws = Workspace::new();
    ws.file("conf.toml", "[log]\nlevel = \"error\"\n");

    ws.errflags()
        .args(["check", "absent.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("flag=IOError").not());
}

#[test]
fn test_bad_settings_file_exit_code() {
    let ws = Workspace::new();
    let conf = ws.file("custom.toml", "[log]\nlevel = \"loud\"\n");
    let path = ws.file("svc.toml", "");

    ws.errflags()
        .arg("--conf")
        .arg(&conf)
        .args(["check"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("log level not recognized 'loud'"));
}

#[test]
fn test_categories_lists_bits() {
    Workspace::new()
        .errflags()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("IOError"))
        .stdout(predicate::str::contains("InputError"))
        .stdout(predicate::str::contains("bits 1,2"));
}
