//! Environment variable handling for the Terminwahl toolkit.
//!
//! Configuration values can be overridden with `TERMINWAHL__SECTION__KEY`
//! variables; secrets marked `"secret_from_env"` in the config files are
//! read from `TERMINWAHL_SECRET_SECTION_KEY` or the legacy `SECTION_KEY`.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "TERMINWAHL";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "TERMINWAHL_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value replaced from the environment
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.host"` becomes `"TERMINWAHL__SERVER__HOST"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"telegram.bot_token"` becomes `"TERMINWAHL_SECRET_TELEGRAM_BOT_TOKEN"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name
///
/// `"telegram.bot_token"` becomes `"TELEGRAM_BOT_TOKEN"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    match parts.split_first() {
        Some((service, rest)) if !rest.is_empty() => {
            format!("{}_{}", service, rest.join(SECRET_SEPARATOR)).to_uppercase()
        }
        _ => path.to_uppercase(),
    }
}

/// Get an environment variable for a secret path, new naming first.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}

/// Inject environment variables into a JSON value
///
/// Recursively replaces every `"secret_from_env"` string with the value of
/// the matching secret environment variable.
///
/// # Returns
///
/// The paths whose marker could not be resolved.
pub fn inject_env_vars(value: &mut serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value, missing: &mut Vec<String>) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v, missing);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                match get_secret_env_var(&path_str) {
                    Some(env_val) => *s = env_val,
                    None => missing.push(path_str),
                }
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    walk(vec![], value, &mut missing);
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var("server.host"),
            "TERMINWAHL__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("monitor.lookahead_days"),
            "TERMINWAHL__MONITOR__LOOKAHEAD_DAYS"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("telegram.bot_token"),
            "TERMINWAHL_SECRET_TELEGRAM_BOT_TOKEN"
        );
        assert_eq!(
            secret_path_to_env_var("portal.token"),
            "TERMINWAHL_SECRET_PORTAL_TOKEN"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(
            legacy_secret_path_to_env_var("telegram.bot_token"),
            "TELEGRAM_BOT_TOKEN"
        );
        assert_eq!(legacy_secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn test_unresolved_markers_are_reported() {
        let mut value = serde_json::json!({
            "portal": { "token": "secret_from_env_does_not_match", "page_url": "x" },
            "nothing_here_xq": { "unset_secret_zz": "secret_from_env" }
        });
        let missing = inject_env_vars(&mut value);
        assert_eq!(missing, vec!["nothing_here_xq.unset_secret_zz".to_string()]);
        assert_eq!(value["portal"]["token"], "secret_from_env_does_not_match");
    }
}
