use clap::Parser;
use loggly_shipper::app::{Cli, Config, ConfigError, LogLevel};
use loggly_shipper::LogEvent;
use serde_json::json;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn clean_all_env_vars() {
    let env_vars = [
        "LOGGLY_CONFIG",
        "LOGGLY_TOKEN",
        "LOGGLY_ENDPOINT",
        "LOGGLY_TAGS",
        "LOGGLY_TIMEOUT_SECS",
        "LOGGLY_CONNECTION_TIMEOUT_SECS",
        "LOGGLY_USER_AGENT",
        "LOG_LEVEL",
        "CONFIG_FILE",
    ];

    unsafe {
        for var in &env_vars {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();

    let config = Config::from_args([
        "loggly-shipper",
        "--token",
        "abc",
        "--endpoint",
        "http://collector.internal:8080",
        "--default-tags",
        "ios,prod",
        "--timeout-secs",
        "5",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(config.token, "abc");
    assert_eq!(config.endpoint, "http://collector.internal:8080");
    assert_eq!(config.tags, vec!["ios", "prod"]);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
#[serial]
fn test_config_from_args_rejects_bad_endpoint() {
    clean_all_env_vars();

    let result = Config::from_args(["loggly-shipper", "--endpoint", "not-a-url"]);
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
}

#[test]
#[serial]
fn test_config_from_env() {
    clean_all_env_vars();
    unsafe {
        env::set_var("LOGGLY_TOKEN", "env-token");
        env::set_var("LOGGLY_TAGS", "a, b,,c");
        env::set_var("LOGGLY_TIMEOUT_SECS", "12");
        env::set_var("LOG_LEVEL", "WARN");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.token, "env-token");
    assert_eq!(config.tags, vec!["a", "b", "c"]);
    assert_eq!(config.timeout, Duration::from_secs(12));
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.endpoint, "https://logs-01.loggly.com");

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_config_from_env_invalid_number() {
    clean_all_env_vars();
    unsafe {
        env::set_var("LOGGLY_TIMEOUT_SECS", "soon");
    }

    let result = Config::from_env();
    assert!(matches!(result, Err(ConfigError::EnvError(_))));

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_config_from_inline_toml_env() {
    clean_all_env_vars();
    unsafe {
        env::set_var(
            "LOGGLY_CONFIG",
            "token = \"inline\"\ntags = [\"x\"]\nconnection_timeout_secs = 3\n",
        );
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.token, "inline");
    assert_eq!(config.tags, vec!["x"]);
    assert_eq!(config.connection_timeout, Duration::from_secs(3));
    assert_eq!(config.timeout_secs, 30);

    clean_all_env_vars();
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
token = "file-token"
endpoint = "http://localhost:9600"
tags = ["svc", "  "]
log_level = "trace"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.token, "file-token");
    assert_eq!(config.endpoint, "http://localhost:9600");
    assert_eq!(config.tags, vec!["svc"]);
    assert_eq!(config.log_level, LogLevel::Trace);

    let client_config = config.client_config();
    assert_eq!(client_config.token, "file-token");
}

#[test]
fn test_config_file_with_zero_timeout() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timeout_secs = 0").unwrap();

    let result = Config::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/loggly-shipper.toml");
    assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[test]
#[serial]
fn test_resolve_prefers_config_file() {
    clean_all_env_vars();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "token = \"from-file\"").unwrap();

    let config = Config {
        token: "from-args".to_string(),
        config_file: Some(file.path().to_path_buf()),
        ..Config::default()
    };
    assert_eq!(config.resolve().unwrap().token, "from-file");
}

#[test]
#[serial]
fn test_cli_message_event() {
    clean_all_env_vars();

    let cli = Cli::try_parse_from([
        "loggly-shipper",
        "--token",
        "abc",
        "--message",
        "deploy finished",
        "--tag",
        "deploy",
        "--tag",
        "ci",
    ])
    .unwrap();

    assert_eq!(cli.config.token, "abc");
    assert_eq!(cli.event_tags, vec!["deploy", "ci"]);
    assert_eq!(cli.event().unwrap(), LogEvent::message("deploy finished"));
}

#[test]
#[serial]
fn test_cli_record_event() {
    clean_all_env_vars();

    let cli = Cli::try_parse_from([
        "loggly-shipper",
        "--record",
        r#"{"user":"ada","items":3}"#,
    ])
    .unwrap();

    let LogEvent::Record(fields) = cli.event().unwrap() else {
        panic!("expected a record");
    };
    assert_eq!(serde_json::Value::Object(fields), json!({ "user": "ada", "items": 3 }));
}

#[test]
#[serial]
fn test_cli_rejects_non_object_record() {
    clean_all_env_vars();

    let cli = Cli::try_parse_from(["loggly-shipper", "--record", "[1,2]"]).unwrap();
    assert!(cli.event().is_err());
}

#[test]
#[serial]
fn test_cli_requires_an_event() {
    clean_all_env_vars();

    assert!(Cli::try_parse_from(["loggly-shipper"]).is_err());
    assert!(
        Cli::try_parse_from(["loggly-shipper", "--message", "a", "--record", "{}"]).is_err()
    );
}
