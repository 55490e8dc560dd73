use std::io::Write;
use toolgate_app::config::{Config, ConfigError};
use toolgate_policy::Role;

#[test]
fn test_config_full_document() {
    let config_yaml = r#"
server:
  bind: 0.0.0.0:4000
  request_timeout_ms: 2500
logging:
  level: debug
  json: true
auth:
  api_keys:
    - id: ops
      key: s3cret
      role: ADMIN
    - id: dashboard
      key: view-only
      role: USER
seed:
  admin:
    email: admin@example.com
    password: password1
    name: Admin
"#;

    let config = Config::from_yaml(config_yaml).unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:4000");
    assert_eq!(config.request_timeout().as_millis(), 2500);
    assert!(config.logging.json);
    assert_eq!(config.auth.api_keys.len(), 2);
    assert_eq!(config.auth.api_keys[1].role, Role::User);
    assert_eq!(config.seed.admin.as_ref().unwrap().name, "Admin");
    config.validate().unwrap();
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config = Config::from_yaml("logging:\n  level: warn\n").unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.server, Config::default().server);
    assert!(config.auth.api_keys.is_empty());
}

#[test]
fn test_unknown_keys_rejected() {
    assert!(Config::from_yaml("server:\n  port: 80\n").is_err());
    assert!(Config::from_yaml(
        "auth:\n  api_keys:\n    - id: a\n      key: b\n      role: ROOT\n"
    )
    .is_err());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server: [not, a, mapping]").unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  bind: 127.0.0.1:9000").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.bind_addr().unwrap().port(), 9000);
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.server.request_timeout_ms = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = Config::from_yaml(
        "auth:\n  api_keys:\n    - {id: a, key: one, role: USER}\n    - {id: a, key: two, role: ADMIN}\n",
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Duplicate API key id `a`"));

    let config =
        Config::from_yaml("auth:\n  api_keys:\n    - {id: a, key: '  ', role: USER}\n").unwrap();
    assert!(config.validate().unwrap_err().to_string().contains("is empty"));

    let config = Config::from_yaml("server:\n  bind: not-an-address\n").unwrap();
    assert!(config.validate().is_err());
}
