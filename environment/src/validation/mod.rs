//! Load-time validation of the environment record.
//!
//! Two layers:
//!
//! 1. **Schema** - the raw JSON is checked against the embedded
//!    `schemas/environment.json` (JSON Schema Draft 7): required fields,
//!    string types, non-empty strings, no unknown fields.
//! 2. **Fields** - the URLs must parse as absolute `http`/`https` URLs
//!    with a host, the tenant prefix must be DNS labels and the client id
//!    must be alphanumeric.
//!
//! Every problem is collected so a broken profile is reported in one go.
//!
//! # Example
//!
//! ```rust,ignore
//! use coffee_env::{validate_environment, EnvironmentConfig};
//!
//! let env = EnvironmentConfig::development();
//! assert!(validate_environment(&env).is_ok());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::{Host, Url};

use crate::error::{ValidationError, ValidationResult};
use crate::models::EnvironmentConfig;

static ENVIRONMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/environment.json"))
        .expect("Invalid embedded schema")
});

static DOMAIN_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
        .expect("Invalid domain prefix pattern")
});

static CLIENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid client id pattern"));

/// The embedded JSON Schema for the record.
pub fn environment_schema() -> &'static Value {
    &ENVIRONMENT_SCHEMA
}

/// Validate a JSON value against a JSON Schema.
///
/// Returns every schema violation as a message.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false check against a schema.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate raw JSON against the environment schema.
pub fn validate_environment_value(data: &Value) -> ValidationResult<()> {
    validate(environment_schema(), data).map_err(|errors| ValidationError::SchemaError { errors })
}

/// Quick check of raw JSON against the environment schema.
pub fn is_valid_environment_value(data: &Value) -> bool {
    is_valid(environment_schema(), data)
}

/// Validate a record: schema, then field formats.
///
/// Both layers always run and every problem ends up in one
/// [`ValidationError::Invalid`]. Empty strings are reported by the schema
/// layer only. Production findings are not checked here, see
/// [`production_warnings`].
pub fn validate_environment(env: &EnvironmentConfig) -> ValidationResult<()> {
    let value = serde_json::to_value(env).map_err(|e| ValidationError::SchemaError {
        errors: vec![e.to_string()],
    })?;

    let mut errors = match validate(environment_schema(), &value) {
        Ok(()) => Vec::new(),
        Err(schema_errors) => schema_errors,
    };

    if !env.api_server_url.is_empty() {
        check_url("apiServerUrl", &env.api_server_url, &mut errors);
    }
    if !env.auth.callback_url.is_empty() {
        check_url("auth.callbackUrl", &env.auth.callback_url, &mut errors);
    }
    if !env.auth.domain_prefix.is_empty() && !is_valid_domain_prefix(&env.auth.domain_prefix) {
        errors.push(format!(
            "auth.domainPrefix: '{}' is not a lowercase DNS name",
            env.auth.domain_prefix
        ));
    }
    if !env.auth.client_id.is_empty() && !CLIENT_ID.is_match(&env.auth.client_id) {
        errors.push(format!(
            "auth.clientId: '{}' must be alphanumeric",
            env.auth.client_id
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid { errors })
    }
}

/// Whether a tenant prefix is dot-separated lowercase DNS labels.
pub fn is_valid_domain_prefix(prefix: &str) -> bool {
    DOMAIN_PREFIX.is_match(prefix)
}

/// Quick check of a record.
pub fn is_valid_environment(env: &EnvironmentConfig) -> bool {
    validate_environment(env).is_ok()
}

/// Findings that are legal but unusual for a production record.
///
/// Empty for non-production records.
pub fn production_warnings(env: &EnvironmentConfig) -> Vec<String> {
    if !env.production {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    for (field, raw) in [
        ("apiServerUrl", env.api_server_url.as_str()),
        ("auth.callbackUrl", env.auth.callback_url.as_str()),
    ] {
        let Ok(url) = Url::parse(raw) else { continue };
        if url.scheme() == "http" {
            warnings.push(format!("{}: uses plain http", field));
        }
        if is_loopback(&url) {
            warnings.push(format!("{}: points at a loopback host", field));
        }
    }
    warnings
}

fn check_url(field: &str, raw: &str, errors: &mut Vec<String>) {
    match Url::parse(raw) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(format!("{}: unsupported scheme '{}'", field, url.scheme()));
            } else if url.host_str().map_or(true, str::is_empty) {
                errors.push(format!("{}: missing host", field));
            }
        }
        Err(e) => errors.push(format!("{}: {} ('{}')", field, e, raw)),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(addr)) => addr.is_loopback(),
        Some(Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}
