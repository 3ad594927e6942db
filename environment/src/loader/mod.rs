//! Resolve the environment record once at startup and hold it for the
//! lifetime of the process.
//!
//! Resolution order:
//!
//! 1. Base record: a JSON profile file if given, else the built-in profile
//! 2. `COFFEE_*` overrides from the process environment (optional)
//! 3. Validation, failing fast on the first broken record
//!
//! The resolved record can then be installed with [`init`] and read from
//! anywhere with [`get`] / [`current`]. It is never mutated afterwards.

use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{EnvironmentConfig, Profile};
use crate::validation::{production_warnings, validate_environment, validate_environment_value};

/// Override for [`EnvironmentConfig::production`].
pub const ENV_PRODUCTION: &str = "COFFEE_PRODUCTION";
/// Override for [`EnvironmentConfig::api_server_url`].
pub const ENV_API_SERVER_URL: &str = "COFFEE_API_SERVER_URL";
/// Override for `auth.domain_prefix`.
pub const ENV_AUTH_DOMAIN_PREFIX: &str = "COFFEE_AUTH_DOMAIN_PREFIX";
/// Override for `auth.audience`.
pub const ENV_AUTH_AUDIENCE: &str = "COFFEE_AUTH_AUDIENCE";
/// Override for `auth.client_id`.
pub const ENV_AUTH_CLIENT_ID: &str = "COFFEE_AUTH_CLIENT_ID";
/// Override for `auth.callback_url`.
pub const ENV_AUTH_CALLBACK_URL: &str = "COFFEE_AUTH_CALLBACK_URL";

/// A field that can be replaced from a `COFFEE_*` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    Production,
    ApiServerUrl,
    AuthDomainPrefix,
    AuthAudience,
    AuthClientId,
    AuthCallbackUrl,
}

impl Override {
    /// Every override, in application order.
    pub const ALL: [Override; 6] = [
        Override::Production,
        Override::ApiServerUrl,
        Override::AuthDomainPrefix,
        Override::AuthAudience,
        Override::AuthClientId,
        Override::AuthCallbackUrl,
    ];

    /// Variable name.
    pub fn key(self) -> &'static str {
        match self {
            Override::Production => ENV_PRODUCTION,
            Override::ApiServerUrl => ENV_API_SERVER_URL,
            Override::AuthDomainPrefix => ENV_AUTH_DOMAIN_PREFIX,
            Override::AuthAudience => ENV_AUTH_AUDIENCE,
            Override::AuthClientId => ENV_AUTH_CLIENT_ID,
            Override::AuthCallbackUrl => ENV_AUTH_CALLBACK_URL,
        }
    }

    fn apply(self, config: &mut EnvironmentConfig, value: &str) -> ConfigResult<()> {
        match self {
            Override::Production => config.production = parse_bool(self.key(), value)?,
            Override::ApiServerUrl => config.api_server_url = value.to_string(),
            Override::AuthDomainPrefix => config.auth.domain_prefix = value.to_string(),
            Override::AuthAudience => config.auth.audience = value.to_string(),
            Override::AuthClientId => config.auth.client_id = value.to_string(),
            Override::AuthCallbackUrl => config.auth.callback_url = value.to_string(),
        }
        Ok(())
    }
}

static ENVIRONMENT: OnceCell<EnvironmentConfig> = OnceCell::new();

/// How to resolve the record.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Built-in profile used when no file is given.
    pub profile: Profile,
    /// JSON profile file replacing the built-in values.
    pub file: Option<PathBuf>,
    /// Apply `COFFEE_*` variables from the process environment.
    pub use_env: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            profile: Profile::Development,
            file: None,
            use_env: true,
        }
    }
}

/// Read a record from a JSON profile file.
///
/// The raw JSON is schema-checked before deserialization so every missing
/// or malformed field is reported, not just the first.
pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<EnvironmentConfig> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading environment file");

    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    validate_environment_value(&value)?;

    Ok(serde_json::from_value(value)?)
}

/// Apply overrides from a lookup function (`key -> value`).
///
/// Only keys the lookup returns are changed. Blank values are ignored.
pub fn apply_overrides<F>(mut config: EnvironmentConfig, lookup: F) -> ConfigResult<EnvironmentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    for field in Override::ALL {
        let key = field.key();
        let Some(value) = lookup(key) else { continue };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        tracing::debug!(key, "applying environment override");
        field.apply(&mut config, value)?;
    }
    Ok(config)
}

/// Apply `COFFEE_*` overrides from the process environment.
pub fn apply_env_overrides(config: EnvironmentConfig) -> ConfigResult<EnvironmentConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Base record plus overrides, without field validation.
pub fn resolve(options: &LoadOptions) -> ConfigResult<EnvironmentConfig> {
    let base = match &options.file {
        Some(path) => load_file(path)?,
        None => {
            tracing::debug!(profile = %options.profile, "using built-in profile");
            EnvironmentConfig::for_profile(options.profile)
        }
    };

    if options.use_env {
        apply_env_overrides(base)
    } else {
        Ok(base)
    }
}

/// Resolve and validate a record.
///
/// Production records pointing at a local or plain-http backend are logged
/// as warnings but still accepted.
pub fn load(options: &LoadOptions) -> ConfigResult<EnvironmentConfig> {
    let config = resolve(options)?;
    validate_environment(&config)?;

    for warning in production_warnings(&config) {
        tracing::warn!(%warning, "suspicious production environment");
    }
    Ok(config)
}

/// Validate and install the process-wide record.
///
/// Fails with [`ConfigError::AlreadyInitialized`] on a second call; the
/// first record stays in place.
pub fn init(config: EnvironmentConfig) -> ConfigResult<&'static EnvironmentConfig> {
    validate_environment(&config)?;
    ENVIRONMENT
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;

    let installed = current()?;
    tracing::info!(
        production = installed.production,
        api = %installed.api_server_url,
        "environment initialized"
    );
    Ok(installed)
}

/// Resolve with [`load`] and install with [`init`].
pub fn init_from(options: &LoadOptions) -> ConfigResult<&'static EnvironmentConfig> {
    init(load(options)?)
}

/// The installed record, if any.
pub fn get() -> Option<&'static EnvironmentConfig> {
    ENVIRONMENT.get()
}

/// The installed record, or [`ConfigError::NotInitialized`].
pub fn current() -> ConfigResult<&'static EnvironmentConfig> {
    get().ok_or(ConfigError::NotInitialized)
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidOverride {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_builtin_without_env() {
        let options = LoadOptions {
            profile: Profile::Production,
            file: None,
            use_env: false,
        };
        let config = load(&options).unwrap();
        assert_eq!(config, EnvironmentConfig::production());
    }

    #[test]
    fn test_overrides_replace_named_fields_only() {
        let lookup = lookup_from(&[
            (ENV_API_SERVER_URL, "https://api.coffee.example"),
            (ENV_PRODUCTION, "yes"),
        ]);
        let config = apply_overrides(EnvironmentConfig::development(), lookup).unwrap();

        assert!(config.production);
        assert_eq!(config.api_server_url, "https://api.coffee.example");
        assert_eq!(config.auth, EnvironmentConfig::development().auth);
    }

    #[test]
    fn test_every_override_key_applies() {
        let pairs: Vec<(&str, &str)> = Override::ALL
            .iter()
            .map(|o| {
                let value = match o {
                    Override::Production => "true",
                    _ => "x",
                };
                (o.key(), value)
            })
            .collect();
        let config = apply_overrides(EnvironmentConfig::development(), lookup_from(&pairs)).unwrap();

        assert!(config.production);
        assert_eq!(config.api_server_url, "x");
        assert_eq!(config.auth.domain_prefix, "x");
        assert_eq!(config.auth.audience, "x");
        assert_eq!(config.auth.client_id, "x");
        assert_eq!(config.auth.callback_url, "x");
    }

    #[test]
    fn test_blank_override_ignored() {
        let lookup = lookup_from(&[(ENV_AUTH_AUDIENCE, "   ")]);
        let config = apply_overrides(EnvironmentConfig::development(), lookup).unwrap();
        assert_eq!(config.auth.audience, "Coffee");
    }

    #[test]
    fn test_bad_boolean_override() {
        let lookup = lookup_from(&[(ENV_PRODUCTION, "maybe")]);
        let err = apply_overrides(EnvironmentConfig::development(), lookup).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { ref key, .. } if key == ENV_PRODUCTION));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "production": true,
                "apiServerUrl": "https://api.coffee.example",
                "auth": {{
                    "domainPrefix": "coffee.eu",
                    "audience": "Coffee",
                    "clientId": "abc123",
                    "callbackUrl": "https://coffee.example"
                }}
            }}"#
        )
        .unwrap();

        let options = LoadOptions {
            profile: Profile::Development,
            file: Some(file.path().to_path_buf()),
            use_env: false,
        };
        let config = load(&options).unwrap();
        assert!(config.production);
        assert_eq!(config.auth.domain_prefix, "coffee.eu");
    }

    #[test]
    fn test_load_file_reports_schema_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "production": false, "auth": {{}} }}"#).unwrap();

        let err = load_file(file.path()).unwrap_err();
        match err {
            ConfigError::Validation(inner) => assert!(inner.errors().len() >= 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_init_once_and_stable_reads() {
        let first = init(EnvironmentConfig::development()).unwrap();

        let err = init(EnvironmentConfig::production()).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyInitialized));

        let a = current().unwrap();
        let b = get().unwrap();
        assert!(std::ptr::eq(first, a));
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.api_server_url, "http://127.0.0.1:5000");
        assert!(!a.production);
    }
}
