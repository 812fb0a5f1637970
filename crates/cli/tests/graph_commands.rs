use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

/// Vault with `alpha` <-> `beta` links, a dangling link, tasks and one orphan.
fn setup_vault() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    fs::create_dir_all(&vault).unwrap();

    fs::write(
        vault.join("alpha.md"),
        "# Alpha\n\n[[Beta]] and [[Ghost]]\n\n- [ ] ship it (@[[2000-01-01]])\n- [ ] fix #urgent\n- [x] done\n",
    )
    .unwrap();
    fs::write(vault.join("beta.md"), "---\ncolor: red\n---\n# Beta\n\n## Details\n\n[[alpha]]\n").unwrap();
    fs::write(vault.join("lonely.md"), "# Lonely\n").unwrap();

    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "version = 1\n[profiles.default]\nvault_root = '{}'\n\n[logging]\nlevel = \"error\"\n",
            vault.display()
        ),
    )
    .unwrap();

    (dir, config)
}

fn ngraph(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ngraph"));
    cmd.arg("--config").arg(config);
    cmd
}

fn json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn reindex_reuses_cache_on_second_run() {
    let (_dir, config) = setup_vault();

    ngraph(&config)
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files found:    3"))
        .stdout(predicate::str::contains("Parsed:         3"))
        .stdout(predicate::str::contains("Broken links:   2"));

    ngraph(&config)
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("From cache:     3"))
        .stdout(predicate::str::contains("Parsed:         0"));

    ngraph(&config)
        .args(["reindex", "--no-cache", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed:         3"))
        .stdout(predicate::str::contains("alpha.md (3 out, 1 in)"));
}

#[test]
fn links_reports_both_directions() {
    let (_dir, config) = setup_vault();

    let out = json(ngraph(&config).args(["links", "alpha.md", "--json"]));
    assert_eq!(out["note"]["title"], "Alpha");
    assert_eq!(out["backlinks"][0]["path"], "beta.md");
    assert_eq!(out["outlinks"][0]["path"], "beta.md");
    assert_eq!(out["unresolved"], serde_json::json!(["Ghost", "2000-01-01"]));

    let out = json(ngraph(&config).args(["links", "Beta", "--backlinks", "--json"]));
    assert_eq!(out["note"]["path"], "beta.md");
    assert!(out.get("outlinks").is_none());

    ngraph(&config)
        .args(["links", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backlinks"))
        .stdout(predicate::str::contains("Unresolved: Ghost, 2000-01-01"));

    ngraph(&config)
        .args(["links", "missing.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note not found: missing.md"));
}

#[test]
fn failed_lookup_still_writes_cache() {
    let (_dir, config) = setup_vault();

    ngraph(&config).args(["links", "missing.md"]).assert().failure();
    ngraph(&config).args(["resolve", "Ghost"]).assert().failure();

    ngraph(&config)
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("From cache:     3"))
        .stdout(predicate::str::contains("Parsed:         0"));
}

#[test]
fn resolve_prints_note_and_anchor() {
    let (_dir, config) = setup_vault();

    ngraph(&config)
        .args(["resolve", "beta#details"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beta.md"))
        .stdout(predicate::str::contains("heading: Details"));

    ngraph(&config)
        .args(["resolve", "Beta#Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not have"));

    ngraph(&config)
        .args(["resolve", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No note matches 'Ghost'"));
}

#[test]
fn orphans_lists_unlinked_notes() {
    let (_dir, config) = setup_vault();

    let out = json(ngraph(&config).args(["orphans", "--json"]));
    let paths: Vec<&str> = out.as_array().unwrap().iter().map(|n| n["path"].as_str().unwrap()).collect();
    assert_eq!(paths, vec!["lonely.md"]);

    ngraph(&config).arg("orphans").assert().success().stdout(predicate::str::contains("lonely.md"));
}

#[test]
fn tasks_summarises_per_note() {
    let (_dir, config) = setup_vault();

    let out = json(ngraph(&config).args(["tasks", "--json"]));
    assert_eq!(
        out,
        serde_json::json!([
            { "path": "alpha.md", "open": 2, "completed": 1, "critical": 1, "overdue": 1 }
        ])
    );

    ngraph(&config)
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 open tasks across 1 notes, 1 overdue"));
}

#[test]
fn layout_places_every_note() {
    let (_dir, config) = setup_vault();

    let out = json(ngraph(&config).args(["layout", "--algorithm", "color", "--json"]));
    let rows = out.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    // Default [layout] min_width is 120 and spacing_x 40: the red note gets the first column.
    let x_of = |id: &str| rows.iter().find(|r| r["id"] == id).unwrap()["x"].as_f64().unwrap();
    assert_eq!(x_of("beta.md"), 0.0);
    assert_eq!(x_of("alpha.md"), 160.0);
    assert_eq!(x_of("lonely.md"), 160.0);

    ngraph(&config)
        .args(["layout", "--algorithm", "hierarchical"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hierarchical layout, 3 nodes"));

    ngraph(&config).args(["layout", "--algorithm", "force"]).assert().failure();
}
