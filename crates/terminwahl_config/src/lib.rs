use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Sources, later ones winning: `<CONFIG_DIR>/default`, `<CONFIG_DIR>/<RUN_ENV>`
/// and `TERMINWAHL__*` environment variables. `CONFIG_DIR` defaults to
/// `config`, `RUN_ENV` to `debug`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env, &env_vars::get_config_prefix())
}

/// Loads the configuration from an explicit directory, run environment and env prefix.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator(env_vars::CONFIG_SEPARATOR)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("portal.opening_hours_ids")
                .with_list_parse_key("telegram.chat_ids"),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_env_overrides_from_marker(raw_config)?;
    config.validate()?;
    Ok(config)
}

/// Replaces all `"secret_from_env"` markers with values from the environment.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    for path in env_vars::inject_env_vars(&mut json) {
        warn!("Secret for '{}' not found in the environment", path);
    }
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` selects the file, otherwise a first command line argument
/// starting with `.env`, otherwise `.env`. Loading happens at most once.
///
/// # Return
///
/// The path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_from_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [server]
            host = "0.0.0.0"
            port = 8086

            [portal]
            page_url = "https://example.org/frontend/termine.php"
            service_id = 147
            opening_hours_ids = [11, 12]

            [monitor]
            preferred_range = "week"
            "#,
        )
        .unwrap();
        fs::write(
            dir.path().join("test.toml"),
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            "#,
        )
        .unwrap();

        let config = load_config_from(dir.path(), "test", "TERMINWAHL_CFG_TEST_UNUSED").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        let portal = config.portal.unwrap();
        assert_eq!(portal.service_id, 147);
        assert_eq!(portal.opening_hours_ids, vec![11, 12]);
        assert_eq!(portal.language, "de");
        assert_eq!(config.monitor.preferred_range, "week");
        assert_eq!(config.monitor.interval_max_secs, 240);
    }

    #[test]
    fn test_load_config_from_fails_without_server() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(dir.path(), "none", "TERMINWAHL_CFG_TEST_EMPTY").is_err());
    }
}
