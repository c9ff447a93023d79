use telemetry_gate::gate::consent::TELEMETRY_ENABLED_KEY;
use telemetry_gate::services::{FileSettings, InMemorySettings, SettingsError, SettingsStore};

#[test]
fn test_in_memory_defaults_and_overrides() {
    let settings = InMemorySettings::new();
    assert!(settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap());
    assert!(!settings.get_boolean(TELEMETRY_ENABLED_KEY, false).unwrap());

    settings.set_boolean(TELEMETRY_ENABLED_KEY, false).unwrap();
    assert!(!settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap());
}

#[test]
fn test_missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = FileSettings::new(dir.path().join("absent.json"));

    assert!(settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap());
}

#[test]
fn test_file_round_trip_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"units": "mmol", "dark_mode": true}"#).unwrap();

    let settings = FileSettings::new(path.clone());
    settings.set_boolean(TELEMETRY_ENABLED_KEY, false).unwrap();

    assert!(!settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap());
    assert!(settings.get_boolean("dark_mode", false).unwrap());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("mmol"));
}

#[test]
fn test_external_edits_are_seen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let settings = FileSettings::new(path.clone());

    std::fs::write(&path, r#"{"telemetry_enabled": false}"#).unwrap();
    assert!(!settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap());

    std::fs::write(&path, r#"{"telemetry_enabled": true}"#).unwrap();
    assert!(settings.get_boolean(TELEMETRY_ENABLED_KEY, false).unwrap());
}

#[test]
fn test_non_boolean_value_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"telemetry_enabled": "maybe"}"#).unwrap();

    let settings = FileSettings::new(path);
    let err = settings.get_boolean(TELEMETRY_ENABLED_KEY, true).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
}
