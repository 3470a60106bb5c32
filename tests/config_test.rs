//! Integration tests for Settings loading.
//!
//! Layered loads pass their global config path explicitly, so the host's
//! XDG config never leaks in. Tests touching `TESTPP_*` hold `ENV_LOCK`.

use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

use testpp::config::{local_config_path, Settings};

const ENV_KEYS: &[&str] = &[
    "TESTPP_META_FILE",
    "TESTPP_INPUT_EXTENSION",
    "TESTPP_EXPECTED_EXTENSION",
    "TESTPP_ANNOTATION_PREFIX",
    "TESTPP_COMMENT_MARKER",
    "TESTPP_TERMINATOR",
    "TESTPP_EXPECTED_BLOCK_SEPARATOR",
    "TESTPP_REQUIRE_CONTIGUOUS_IDS",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize environment access and start from a clean `TESTPP_*` slate.
fn clean_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for key in ENV_KEYS {
        env::remove_var(key);
    }
    guard
}

#[test]
fn given_explicit_config_file_when_loading_then_overrides_only_listed_keys() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("testpp.toml");
    fs::write(
        &path,
        r#"
terminator = "end"
expected_block_separator = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load_file(&path).expect("load settings");

    // Assert
    assert_eq!(settings.terminator, "end");
    assert!(settings.expected_block_separator);
    assert_eq!(settings.meta_file, "meta.json");
    assert_eq!(settings.input_extension, "inp");
    assert_eq!(settings.expected_extension, "cor");
}

#[test]
fn given_local_config_in_test_dir_when_loading_then_applies_it() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "meta_file = \"estructura.json\"\nrequire_contiguous_ids = false\n",
    )
    .unwrap();

    let settings = Settings::load_layers(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.meta_file, "estructura.json");
    assert!(!settings.require_contiguous_ids);
    assert_eq!(settings.terminator, "fin");
}

#[test]
fn given_global_and_local_config_when_loading_then_local_wins() {
    // Arrange
    let _env = clean_env();
    let global_dir = TempDir::new().unwrap();
    let global = global_dir.path().join("testpp.toml");
    fs::write(&global, "terminator = \"end\"\ncomment_marker = \"#\"\n").unwrap();
    let test_dir = TempDir::new().unwrap();
    fs::write(local_config_path(test_dir.path()), "terminator = \"stop\"\n").unwrap();

    // Act
    let settings =
        Settings::load_layers(Some(&global), Some(test_dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.terminator, "stop");
    assert_eq!(settings.comment_marker, "#");
}

#[test]
fn given_missing_global_config_when_loading_then_uses_defaults() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_layers(Some(&dir.path().join("absent.toml")), None)
        .expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_env_overrides_when_loading_then_they_beat_local_config() {
    // Arrange
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "terminator = \"stop\"\ninput_extension = \"in\"\n",
    )
    .unwrap();
    env::set_var("TESTPP_TERMINATOR", "END");
    env::set_var("TESTPP_EXPECTED_BLOCK_SEPARATOR", "true");

    // Act
    let result = Settings::load_layers(None, Some(dir.path()));
    for key in ENV_KEYS {
        env::remove_var(key);
    }

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.terminator, "END");
    assert!(settings.expected_block_separator);
    assert_eq!(settings.input_extension, "in");
}

#[test]
fn given_malformed_toml_when_loading_then_errors_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "terminator = [unclosed").unwrap();

    let err = Settings::load_file(&path).unwrap_err();

    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_same_extension_for_both_files_when_loading_then_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("same.toml");
    fs::write(&path, "expected_extension = \"inp\"\n").unwrap();

    assert!(Settings::load_file(&path).is_err());
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips_through_loader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rendered.toml");
    let original = Settings {
        comment_marker: "#".into(),
        ..Default::default()
    };

    fs::write(&path, original.to_toml().unwrap()).unwrap();
    let loaded = Settings::load_file(&path).unwrap();

    assert_eq!(loaded, original);
}
