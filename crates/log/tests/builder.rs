//! Global subscriber installation
//!
//! Each integration test file is its own process, so this one owns the global
//! subscriber slot.

use pretty_assertions::assert_eq;
use varinterop_log::{Config, Format, LogError, LoggerBuilder};

#[test]
fn second_install_is_rejected() {
    let guard = LoggerBuilder::from_config(Config::production().with_level("warn"))
        .build()
        .unwrap();
    assert_eq!(guard.level(), "warn");
    assert_eq!(guard.format(), Format::Json);
    tracing::warn!(attempt = 1, "Installed");

    let err = LoggerBuilder::from_config(Config::development())
        .build()
        .unwrap_err();
    assert!(matches!(err, LogError::AlreadyInitialized(_)));

    // A later test bootstrap must not panic over the existing subscriber.
    varinterop_log::init_test();
}

#[test]
fn config_deserializes_with_defaults() {
    let config: Config = serde_json::from_str(r#"{"format":"pretty"}"#).unwrap();
    assert_eq!(config.format, Format::Pretty);
    assert_eq!(config.level, "info");
    assert!(config.ansi);
}
