use std::collections::HashMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::*;

use super::*;

fn settings_from(vars: &[(&str, &str)]) -> Settings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|name| vars.get(name).cloned())
}

#[rstest]
fn test_defaults_without_overrides() {
    let settings = settings_from(&[]);

    assert_eq!("http://localhost:5000", settings.stream_endpoint);
    assert_eq!("cadence-player-state", settings.storage_key);
    assert_eq!(100, settings.default_volume);
    assert_eq!(Duration::from_secs(3), settings.restart_threshold);
    assert_eq!(None, settings.shuffle_seed);
}

#[rstest]
fn test_valid_overrides() {
    let settings = settings_from(&[
        ("CADENCE_STREAM_ENDPOINT", "https://radio.example.com"),
        ("CADENCE_STORAGE_KEY", "other-state"),
        ("CADENCE_DEFAULT_VOLUME", " 40 "),
        ("CADENCE_RESTART_THRESHOLD_MS", "5000"),
        ("CADENCE_SHUFFLE_SEED", "12"),
    ]);

    assert_eq!("https://radio.example.com", settings.stream_endpoint);
    assert_eq!("other-state", settings.storage_key);
    assert_eq!(40, settings.default_volume);
    assert_eq!(Duration::from_millis(5000), settings.restart_threshold);
    assert_eq!(Some(12), settings.shuffle_seed);
}

#[rstest(value, case("abc"), case("-5"), case("300"), case(""))]
fn test_invalid_volume_falls_back(value: &str) {
    let settings = settings_from(&[("CADENCE_DEFAULT_VOLUME", value)]);

    assert_eq!(100, settings.default_volume);
}

#[rstest]
fn test_volume_clamped() {
    let settings = settings_from(&[("CADENCE_DEFAULT_VOLUME", "250")]);

    assert_eq!(100, settings.default_volume);
}

#[rstest(value, case("abc"), case("-5"), case("1.5"))]
fn test_invalid_threshold_falls_back(value: &str) {
    let settings = settings_from(&[
        ("CADENCE_RESTART_THRESHOLD_MS", value),
        ("CADENCE_SHUFFLE_SEED", value),
    ]);

    assert_eq!(Duration::from_secs(3), settings.restart_threshold);
    assert_eq!(None, settings.shuffle_seed);
}

#[rstest(
    value,
    expected,
    case("0", Duration::ZERO),
    case("250", Duration::from_millis(250)),
    case("10000", Duration::from_secs(10))
)]
fn test_threshold_in_millis(value: &str, expected: Duration) {
    let settings = settings_from(&[("CADENCE_RESTART_THRESHOLD_MS", value)]);

    assert_eq!(expected, settings.restart_threshold);
}
