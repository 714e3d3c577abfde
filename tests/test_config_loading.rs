//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error handling.

use adzuna_mcp::config::{ConfigError, ServerConfig, DEFAULT_BASE_URL};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[server]
name = "Jobs Research"

[api]
base_url = "http://localhost:8080/v1/api/"
timeout_secs = 12
app_id_env = "JOBS_APP_ID"
app_key_env = "JOBS_APP_KEY"
"#,
    );

    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();
    assert_eq!(config.server.name, "Jobs Research");

    let settings = config.api.client_settings();
    assert_eq!(settings.base_url, "http://localhost:8080/v1/api");
    assert_eq!(settings.timeout, Duration::from_secs(12));
    assert_eq!(settings.app_id_env, "JOBS_APP_ID");
}

#[test]
fn test_empty_file_uses_defaults() {
    let temp_file = write_config("");
    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.api.app_id_env, "ADZUNA_APP_ID");
    assert_eq!(config.api.app_key_env, "ADZUNA_APP_KEY");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let temp_file = write_config("[api]\ntimeout_secs = 5\n");
    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.server.name, "Adzuna Jobs");
}

#[test]
fn test_missing_file_is_read_error() {
    let result = ServerConfig::load_from_file(std::path::Path::new("/nonexistent/adzuna-mcp.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let temp_file = write_config("[api\nbase_url = ");
    let result = ServerConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let temp_file = write_config("[api]\ntimeout_secs = \"thirty\"\n");
    let result = ServerConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_values_rejected() {
    let cases = [
        ("[api]\nbase_url = \"not a url\"\n", "base URL"),
        ("[api]\nbase_url = \"ftp://api.adzuna.com\"\n", "base URL"),
        ("[api]\ntimeout_secs = 0\n", "timeout_secs"),
        ("[api]\napp_id_env = \"\"\n", "environment variables"),
    ];

    for (content, expected) in cases {
        let temp_file = write_config(content);
        let err = ServerConfig::load_from_file(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "{content:?} gave {err}"
        );
    }
}

#[test]
fn test_credentials_resolved_from_named_variables() {
    let temp_file = write_config(
        "[api]\napp_id_env = \"CFG_TEST_RESOLVE_ID\"\napp_key_env = \"CFG_TEST_RESOLVE_KEY\"\n",
    );
    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();

    std::env::set_var("CFG_TEST_RESOLVE_ID", "abc123");
    std::env::set_var("CFG_TEST_RESOLVE_KEY", "secret456");
    let credentials = config.resolve_credentials().unwrap();
    std::env::remove_var("CFG_TEST_RESOLVE_ID");
    std::env::remove_var("CFG_TEST_RESOLVE_KEY");

    assert_eq!(credentials.app_id, "abc123");
    assert_eq!(credentials.app_key, "secret456");
    assert!(!format!("{credentials:?}").contains("secret456"));
}

#[test]
fn test_blank_credential_counts_as_missing() {
    let temp_file = write_config(
        "[api]\napp_id_env = \"CFG_TEST_BLANK_ID\"\napp_key_env = \"CFG_TEST_BLANK_KEY\"\n",
    );
    let config = ServerConfig::load_from_file(temp_file.path()).unwrap();

    std::env::set_var("CFG_TEST_BLANK_ID", "abc123");
    std::env::set_var("CFG_TEST_BLANK_KEY", "   ");
    let result = config.resolve_credentials();
    std::env::remove_var("CFG_TEST_BLANK_ID");
    std::env::remove_var("CFG_TEST_BLANK_KEY");

    assert!(matches!(result, Err(ConfigError::EnvVarNotFound(name)) if name == "CFG_TEST_BLANK_KEY"));
}
