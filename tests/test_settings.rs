use std::fs;

use tempfile::tempdir;

use noisewatch::settings::Settings;

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let settings = Settings::new(Some(missing)).unwrap();
    assert_eq!(settings.calibration.min, 2900.0);
    assert_eq!(settings.calibration.max, 3100.0);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(
        &path,
        r#"
[calibration]
min = 0.0
max = 1024.0

[feed]
interval_ms = 250
max_level = 10
"#,
    )
    .unwrap();

    let settings = Settings::new(Some(path)).unwrap();
    assert_eq!(settings.calibration.min, 0.0);
    assert_eq!(settings.calibration.max, 1024.0);
    assert_eq!(settings.feed.interval_ms, 250);
    assert_eq!(settings.feed.max_level, 10);
    // untouched sections keep their defaults
    assert_eq!(settings.monitor.channel_capacity, 100);
}

#[test]
fn test_dump_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dumped.toml");

    let settings = Settings::default();
    fs::write(&path, settings.dump("toml").unwrap()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("min = 2900.0"));

    let reloaded = Settings::new(Some(path)).unwrap();
    assert_eq!(reloaded.calibration.max, settings.calibration.max);
    assert_eq!(reloaded.store.database_url, settings.store.database_url);
}

#[test]
fn test_yaml_dump_parses() {
    let settings = Settings::default();
    let dumped = settings.dump("yaml").unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&dumped).unwrap();
    assert!(value.get("calibration").is_some());
}
