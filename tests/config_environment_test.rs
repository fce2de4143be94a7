// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Runs serially because every test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::env;

use chat_relay_server::{
    config::{DatabaseUrl, ServerConfig},
    errors::ErrorCode,
    logging::{LogFormat, LoggingConfig},
};
use serial_test::serial;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "HTTP_PORT",
    "HOST",
    "DATABASE_URL",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "OPENAI_MODEL",
    "LLM_REQUEST_TIMEOUT_SECS",
    "CORS_ALLOWED_ORIGINS",
    "RUST_LOG",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8000);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(
        config.database.url,
        DatabaseUrl::parse_url("sqlite:./chat_history.db").unwrap()
    );
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.model, "gpt-3.5-turbo");
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.request_timeout_secs, 300);
    assert_eq!(config.cors.allowed_origins, "*");
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9100");
    env::set_var("HOST", "0.0.0.0");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("OPENAI_API_KEY", "sk-from-env");
    env::set_var("OPENAI_BASE_URL", "http://localhost:11434/v1");
    env::set_var("OPENAI_MODEL", "gpt-4o-mini");
    env::set_var("LLM_REQUEST_TIMEOUT_SECS", "45");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://app.example.com");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9100);
    assert_eq!(config.host, "0.0.0.0");
    assert!(config.database.url.is_memory());
    assert_eq!(config.llm.api_key.as_deref(), Some("sk-from-env"));
    assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.request_timeout_secs, 45);
    assert_eq!(config.cors.allowed_origins, "https://app.example.com");
    assert!(!config.summary().contains("sk-from-env"));

    clear_env();
}

#[test]
#[serial]
fn test_blank_api_key_counts_as_missing() {
    clear_env();
    env::set_var("OPENAI_API_KEY", "   ");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.llm.api_key.is_none());
    assert!(config.summary().contains("LLM API Key: Missing"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_config_errors() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains("HTTP_PORT"));

    clear_env();
    env::set_var("LLM_REQUEST_TIMEOUT_SECS", "0");
    assert_eq!(
        ServerConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigError
    );

    clear_env();
    env::set_var("DATABASE_URL", "postgresql://localhost/chat");
    assert_eq!(
        ServerConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigError
    );

    clear_env();
}

#[test]
#[serial]
fn test_logging_reads_dotenv_before_server_config() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "LOG_FORMAT=json\nRUST_LOG=debug\n").unwrap();
    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    let logging = LoggingConfig::from_env();

    env::set_current_dir(original_dir).unwrap();
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.level, "debug");

    clear_env();
}
