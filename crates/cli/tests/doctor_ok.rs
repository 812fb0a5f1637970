use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn ngraph() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ngraph"))
}

fn write_config(path: &Path, toml: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, toml).unwrap();
}

#[test]
fn doctor_prints_resolved_profile() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    write_config(
        &cfg,
        r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/v"
cache_dir = "{{vault_root}}/.graph-cache"
excluded_folders = ["templates", "archive"]
"#,
    );

    ngraph()
        .arg("doctor")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK   ngraph doctor"))
        .stdout(predicate::str::contains("profile: default"))
        .stdout(predicate::str::contains("cache_dir: /tmp/v/.graph-cache"))
        .stdout(predicate::str::contains("excluded_folders: templates, archive"))
        .stdout(predicate::str::contains("logging.level: info"));
}

#[test]
fn doctor_falls_back_to_xdg_config_home() {
    let tmp = tempdir().unwrap();
    write_config(
        &tmp.path().join("notegraph").join("config.toml"),
        "version = 1\n[profiles.default]\nvault_root = \"/tmp/v\"\n",
    );

    ngraph()
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("cache_dir: /tmp/v/.notegraph"));
}

#[test]
fn doctor_shows_vault_and_cache_state() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    let cfg = tmp.path().join("config.toml");
    write_config(&cfg, &format!("version = 1\n[profiles.default]\nvault_root = '{}'\n", vault.display()));

    ngraph()
        .arg("--config")
        .arg(&cfg)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("(missing)"))
        .stdout(predicate::str::contains("cache_file: (none yet"));

    fs::create_dir_all(&vault).unwrap();
    fs::write(vault.join("note.md"), "# Note\n").unwrap();
    ngraph().arg("--config").arg(&cfg).arg("reindex").assert().success();

    ngraph()
        .arg("--config")
        .arg(&cfg)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("(missing)").not())
        .stdout(predicate::str::contains(".notegraph/").and(predicate::str::contains(".json")));
}
