//! # Configuration Validation Tests
//!
//! The sync configuration is validated before any AWS call; a missing field
//! is a fatal configuration error.

use cognito_param_sync::{SyncConfig, SyncError};

fn full_config() -> SyncConfig {
    SyncConfig {
        user_pool_id: "eu-west-1_TestPool".to_string(),
        app_client_name: "web".to_string(),
        parameter_name: "/acme/app/config".to_string(),
        region: "eu-west-1".to_string(),
    }
}

#[test]
fn test_full_config_is_valid() {
    assert!(full_config().validate().is_ok());
}

#[test]
fn test_each_missing_field_is_fatal() {
    let cases: Vec<(fn(&mut SyncConfig), &str)> = vec![
        (|c| c.user_pool_id.clear(), "userPoolId"),
        (|c| c.app_client_name.clear(), "appClientName"),
        (|c| c.parameter_name.clear(), "parameterName"),
        (|c| c.region.clear(), "region"),
    ];

    for (clear, field) in cases {
        let mut config = full_config();
        clear(&mut config);

        match config.validate() {
            Err(SyncError::Configuration(name)) => assert_eq!(name, field),
            other => panic!("expected Configuration({field}), got {other:?}"),
        }
    }
}

#[test]
fn test_config_deserializes_camel_case() {
    let config: SyncConfig = serde_json::from_str(
        r#"{
            "userPoolId": "eu-west-1_TestPool",
            "appClientName": "web",
            "parameterName": "/acme/app/config",
            "region": "eu-west-1"
        }"#,
    )
    .expect("deserializes");

    assert_eq!(config.user_pool_id, "eu-west-1_TestPool");
    assert!(config.validate().is_ok());
}
