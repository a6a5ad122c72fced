//! Configuration layering tests.

mod test_helpers;

use std::ffi::OsString;
use std::fs;

use eyre::Result;
use rstest::rstest;
use tasktrack::config::{AppConfig, ConfigError, LogFormat};
use tempfile::TempDir;
use test_helpers::EnvVarGuard;

const MANAGED_VARS: [&str; 6] = [
    "API_HOST",
    "API_PORT",
    "DATABASE_URL",
    "TASKTRACK__SERVER__PORT",
    "TASKTRACK__MIRROR__ENABLED",
    "TASKTRACK__LOGGING__FORMAT",
];

fn scoped_env(values: &[(&str, &str)]) -> EnvVarGuard {
    let changes: Vec<(OsString, Option<OsString>)> = MANAGED_VARS
        .iter()
        .map(|key| {
            let value = values
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| OsString::from(value));
            (OsString::from(key), value)
        })
        .collect();
    EnvVarGuard::set_many(&changes)
}

#[rstest]
fn defaults_apply_without_sources() -> Result<()> {
    let _env = scoped_env(&[]);

    let config = AppConfig::load(None)?;

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.server.listen_addr()?.to_string(), "127.0.0.1:8000");
    assert!(config.mirror.enabled);
    assert_eq!(config.logging.format, LogFormat::Pretty);
    Ok(())
}

#[rstest]
fn yaml_file_overrides_defaults() -> Result<()> {
    let _env = scoped_env(&[]);
    let temp = TempDir::new()?;
    let path = temp.path().join("tasktrack.yaml");
    fs::write(
        &path,
        "server:\n  port: 9100\nmirror:\n  dir: /var/lib/tasktrack\n  replay_on_empty: false\n",
    )?;

    let config = AppConfig::load(Some(path.as_path()))?;

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.mirror.dir.to_string_lossy(), "/var/lib/tasktrack");
    assert!(!config.mirror.replay_on_empty);
    Ok(())
}

#[rstest]
fn plain_variables_set_server_and_database() -> Result<()> {
    let _env = scoped_env(&[
        ("API_HOST", "0.0.0.0"),
        ("API_PORT", "8081"),
        ("DATABASE_URL", "postgres://db.internal/tracker"),
    ]);

    let config = AppConfig::load(None)?;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.database.url, "postgres://db.internal/tracker");
    Ok(())
}

#[rstest]
fn prefixed_variables_win_over_plain_ones() -> Result<()> {
    let _env = scoped_env(&[
        ("API_PORT", "8081"),
        ("TASKTRACK__SERVER__PORT", "9000"),
        ("TASKTRACK__MIRROR__ENABLED", "false"),
        ("TASKTRACK__LOGGING__FORMAT", "json"),
    ]);

    let config = AppConfig::load(None)?;

    assert_eq!(config.server.port, 9000);
    assert!(!config.mirror.enabled);
    assert_eq!(config.logging.format, LogFormat::Json);
    Ok(())
}

#[rstest]
fn explicit_missing_file_is_an_error() {
    let _env = scoped_env(&[]);
    let temp = TempDir::new().expect("temp dir");

    let result = AppConfig::load(Some(temp.path().join("absent.yaml").as_path()));

    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[rstest]
fn non_numeric_port_is_an_error() {
    let _env = scoped_env(&[("API_PORT", "eighty")]);

    let result = AppConfig::load(None);

    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[rstest]
fn hostname_is_not_a_listen_address() {
    let mut config = AppConfig::default();
    config.server.host = "localhost".to_owned();

    assert!(matches!(
        config.server.listen_addr(),
        Err(ConfigError::ListenAddress(_))
    ));
}
