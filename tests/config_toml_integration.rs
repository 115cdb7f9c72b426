use gemchat::cli::ChatConfig;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization_roundtrip() {
    let original_config = ChatConfig::default();

    let toml_str = original_config
        .to_toml_string()
        .expect("Should be able to serialize config to TOML");

    assert!(toml_str.contains("[rate_limit]"), "Should contain rate_limit section");
    assert!(toml_str.contains("max_requests = 30"));
    assert!(toml_str.contains("gemini-2.0-flash"));

    let deserialized_config =
        ChatConfig::from_toml_str(&toml_str).expect("Should be able to deserialize TOML string");
    assert_eq!(original_config, deserialized_config);
}

#[test]
fn test_config_file_operations() {
    let mut original_config = ChatConfig::default();
    original_config.rate_limit.max_requests = 10;
    original_config.rate_limit.window_seconds = 120;
    original_config.persona.greeting = false;

    let temp_file = NamedTempFile::new().expect("Should be able to create temporary file");
    let temp_path = temp_file.path();

    original_config
        .to_toml_file(temp_path)
        .expect("Should be able to save config to file");

    let loaded_config =
        ChatConfig::from_toml_file(temp_path).expect("Should be able to load config from file");

    assert_eq!(original_config, loaded_config);
    assert_eq!(loaded_config.rate_limit_config().max_requests, 10);
    assert_eq!(loaded_config.rate_limit_config().window.as_secs(), 120);
    assert!(loaded_config.session_options().greeting.is_none());
}

#[test]
fn test_hand_written_config() {
    let mut temp_file = NamedTempFile::new().expect("Should be able to create temporary file");
    write!(
        temp_file,
        r#"
[provider]
base_url = "http://localhost:9000"

[models]
fallback = ["gemini-pro-latest"]

[persona]
enabled = false

[feedback]
log_path = "logs/feedback.json"
"#
    )
    .unwrap();

    let config = ChatConfig::from_toml_file(temp_file.path()).unwrap();

    assert_eq!(config.provider.base_url, "http://localhost:9000");
    assert_eq!(config.provider.api_version, "v1beta");
    assert_eq!(config.models.fallback, vec!["gemini-pro-latest".to_string()]);
    assert!(config.session_options().persona.is_none());
    assert!(config.session_options().greeting.is_some());
    assert_eq!(config.feedback.log_path, PathBuf::from("logs/feedback.json"));
    assert_eq!(config.rate_limit.max_requests, 30);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = ChatConfig::from_toml_file("/nonexistent/gemchat.toml");
    let err = result.expect_err("missing file must fail");
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}
