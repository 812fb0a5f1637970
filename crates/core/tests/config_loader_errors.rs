use std::fs;

use notegraph_core::config::loader::{ConfigError, ConfigLoader};
use rstest::rstest;
use tempfile::tempdir;

fn load_str(toml: &str, profile: Option<&str>) -> ConfigError {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, toml).unwrap();
    ConfigLoader::load(Some(&path), profile).unwrap_err()
}

#[test]
fn missing_file_fails() {
    let tmp = tempdir().unwrap();
    let err = ConfigLoader::load(Some(&tmp.path().join("nope/config.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(p) if p.ends_with("config.toml")));
}

#[test]
fn unreadable_path_fails() {
    // A directory exists but cannot be read as a file
    let tmp = tempdir().unwrap();
    let err = ConfigLoader::load(Some(tmp.path()), None).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError(..)), "got {err:?}");
}

#[test]
fn bad_version_fails() {
    let err = load_str("version = 2\nprofiles = {}\n", None);
    assert!(matches!(err, ConfigError::BadVersion(2)), "got {err:?}");
}

#[test]
fn no_profiles_fails() {
    let err = load_str("version = 1\nprofiles = {}\n", None);
    assert!(matches!(err, ConfigError::NoProfiles), "got {err:?}");
}

#[rstest]
#[case::override_missing(Some("missing"), "missing")]
#[case::file_profile_missing(None, "work")]
fn profile_not_found_fails(#[case] profile: Option<&str>, #[case] expected: &str) {
    let toml = r#"
version = 1
profile = "work"
[profiles.default]
vault_root = "/tmp/vault"
"#;
    match load_str(toml, profile) {
        ConfigError::ProfileNotFound(p) => assert_eq!(p, expected),
        other => panic!("expected ProfileNotFound, got {other:?}"),
    }
}

#[test]
fn invalid_toml_fails() {
    let err = load_str("version = 1\n[profiles.default\n", None);
    assert!(matches!(err, ConfigError::ParseError(p, _) if p.ends_with("config.toml")));
}

#[rstest]
#[case("spacing_x = -1.0", "spacing_x")]
#[case("min_height = -60.0", "min_height")]
#[case("padding = nan", "padding")]
fn negative_layout_values_fail(#[case] line: &str, #[case] field: &str) {
    let toml = format!(
        "version = 1\n[profiles.default]\nvault_root = \"/tmp/vault\"\n[layout]\n{line}\n"
    );
    match load_str(&toml, None) {
        ConfigError::InvalidLayout(name) => assert_eq!(name, field),
        other => panic!("expected InvalidLayout, got {other:?}"),
    }
}
