use super::*;
use crate::collection::Collection;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_empty_toml_produces_defaults() {
    let cfg: UserConfig = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(cfg, UserConfig::default());
    assert_eq!(cfg.timeout(), Duration::from_secs(30));
    assert_eq!(cfg.cache_ttl(), Duration::from_secs(300));
    assert!(cfg.cache.enabled);
}

#[test]
fn test_full_config() {
    let toml_str = r#"
[api]
base_url = "https://portfolio.example.com/api"
timeout_secs = 5

[cache]
enabled = false
ttl_secs = 60

[endpoints]
interests = "/hobbies/"
"#;
    let cfg: UserConfig = toml::from_str(toml_str).expect("Should parse config");

    assert_eq!(
        cfg.api.base_url.as_deref(),
        Some("https://portfolio.example.com/api")
    );
    assert_eq!(cfg.timeout(), Duration::from_secs(5));
    assert!(!cfg.cache.enabled);
    assert_eq!(cfg.cache_ttl(), Duration::from_secs(60));

    let endpoints = cfg.resolved_endpoints().expect("endpoints");
    assert_eq!(endpoints.path(Collection::Interests), "hobbies");
    assert_eq!(endpoints.path(Collection::Timeline), "timeline");
}

#[test]
fn test_partial_section_keeps_field_defaults() {
    let cfg: UserConfig = toml::from_str("[cache]\nttl_secs = 10\n").expect("parse");
    assert!(cfg.cache.enabled);
    assert_eq!(cfg.cache.ttl_secs, 10);
}

#[test]
fn test_unknown_api_key_is_rejected() {
    let result: Result<UserConfig, _> = toml::from_str("[api]\nbase = \"x\"\n");
    assert!(result.is_err());
}

#[test]
fn test_unknown_endpoint_collection_is_rejected() {
    let cfg: UserConfig = toml::from_str("[endpoints]\narticles = \"articles\"\n").expect("parse");
    assert!(matches!(
        cfg.resolved_endpoints(),
        Err(UserConfigError::Endpoint(_))
    ));
}

#[test]
fn test_load_from_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("config.toml");

    match load_user_config_from(&missing) {
        Err(UserConfigError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "# folio user config\n\n[api]\nbase_url = \"http://localhost:5000/api\"\n",
    )
    .expect("write config");

    let cfg = load_user_config_from(&config_path).expect("load");
    assert_eq!(
        cfg.api.base_url.as_deref(),
        Some("http://localhost:5000/api")
    );
}

#[test]
fn test_load_from_invalid_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[api\n").expect("write config");

    assert!(matches!(
        load_user_config_from(&config_path),
        Err(UserConfigError::Toml(_))
    ));
}

#[test]
fn test_load_from_file_with_typo_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    let toml_str = r#"
[api]
base_ulr = "http://localhost:5000/api"

[endpoints]
interests = "hobbies"
"#;
    fs::write(&config_path, toml_str).expect("write config");

    assert!(matches!(
        load_user_config_from(&config_path),
        Err(UserConfigError::Toml(_))
    ));
}

#[test]
fn test_roundtrip_serialization() {
    let cfg = UserConfig::default();
    let serialized = toml::to_string(&cfg).expect("Should serialize");
    let deserialized: UserConfig = toml::from_str(&serialized).expect("Should deserialize");
    assert_eq!(cfg, deserialized);
}
