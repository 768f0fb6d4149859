use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults() {
    let cfg = RuntimeConfig::default();
    assert_eq!((cfg.width, cfg.height), (400, 400));
    assert_eq!(cfg.frame_interval(), Some(Duration::from_millis(15)));
    assert_eq!(cfg.seed, 1);
    assert_eq!(cfg.screenshot_dir, PathBuf::from("."));
}

#[test]
fn manual_config_has_no_ticker() {
    let cfg = RuntimeConfig::manual(200, 100);
    assert_eq!(cfg.frame_interval(), None);
    assert_eq!((cfg.width, cfg.height), (200, 100));
}

#[test]
fn json_fills_missing_fields() {
    let cfg = RuntimeConfig::from_json_str(r#"{ "width": 64, "seed": 7 }"#).unwrap();
    assert_eq!(cfg.width, 64);
    assert_eq!(cfg.height, 400);
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.frame_interval_ms, Some(15));

    let cfg = RuntimeConfig::from_json_str(r#"{ "frame_interval_ms": null }"#).unwrap();
    assert_eq!(cfg.frame_interval(), None);
}

#[test]
fn json_rejects_unknown_fields() {
    let err = RuntimeConfig::from_json_str(r#"{ "fps": 60 }"#).unwrap_err();
    assert!(matches!(err, SketchError::Config(_)));
}

#[test]
fn json_file_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sketch.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = RuntimeConfig::from_json_path(&path).unwrap_err();
    assert!(err.to_string().contains("sketch.json"));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        RuntimeConfig::from_json_path(&missing),
        Err(SketchError::Io { .. })
    ));
}

#[test]
fn overrides_replace_fields() {
    let cfg = RuntimeConfig::default()
        .with_overrides_from(env(&[
            (ENV_FRAME_INTERVAL_MS, "40"),
            (ENV_SEED, " 99 "),
            (ENV_SCREENSHOT_DIR, "/tmp/shots"),
        ]))
        .unwrap();
    assert_eq!(cfg.frame_interval(), Some(Duration::from_millis(40)));
    assert_eq!(cfg.seed, 99);
    assert_eq!(cfg.screenshot_dir, PathBuf::from("/tmp/shots"));
}

#[test]
fn zero_interval_disables_the_ticker() {
    let cfg = RuntimeConfig::default()
        .with_overrides_from(env(&[(ENV_FRAME_INTERVAL_MS, "0")]))
        .unwrap();
    assert_eq!(cfg.frame_interval_ms, None);
}

#[test]
fn invalid_overrides_are_config_errors() {
    for (key, value) in [
        (ENV_FRAME_INTERVAL_MS, "fast"),
        (ENV_SEED, "-1"),
        (ENV_SCREENSHOT_DIR, "  "),
    ] {
        let err = RuntimeConfig::default()
            .with_overrides_from(env(&[(key, value)]))
            .unwrap_err();
        assert!(matches!(err, SketchError::Config(_)), "{key}");
        assert!(err.to_string().contains(key), "{err}");
    }
}

#[test]
fn absent_overrides_leave_config_unchanged() {
    let cfg = RuntimeConfig::manual(10, 10);
    assert_eq!(cfg.clone().with_overrides_from(env(&[])).unwrap(), cfg);
}
