//! The environment record and its built-in profiles.
//!
//! - [`EnvironmentConfig`] - the record consumers read at startup
//! - [`AuthConfig`] - identity-provider integration values
//! - [`Profile`] - named deployment targets with built-in values
//!
//! The JSON shape (camelCase field names) is the contract with consumers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// =============================================================================
// Built-in values
// =============================================================================

/// Backend API base URL.
pub const API_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Identity-provider tenant (the part before `.auth0.com`).
pub const AUTH_DOMAIN_PREFIX: &str = "dev-pca1g5k8.us";

/// Protected API resource identifier.
pub const AUTH_AUDIENCE: &str = "Coffee";

/// Registered client application identifier.
pub const AUTH_CLIENT_ID: &str = "i8VbRaUPcXH21r7T0GAPUyWBVZzjqZ2T";

/// Redirect target after authentication.
pub const AUTH_CALLBACK_URL: &str = "http://localhost:8100";

// =============================================================================
// Environment record
// =============================================================================

/// Identity-provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthConfig {
    /// Tenant identifier, e.g. `dev-pca1g5k8.us`.
    pub domain_prefix: String,
    /// API resource the issued tokens are for.
    pub audience: String,
    /// Client application identifier.
    pub client_id: String,
    /// Where the provider redirects after login.
    pub callback_url: String,
}

/// Environment-specific constants for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Build/deployment mode.
    pub production: bool,
    /// Base URL of the backend service.
    pub api_server_url: String,
    /// Identity-provider settings.
    pub auth: AuthConfig,
}

impl EnvironmentConfig {
    /// Local development record.
    pub fn development() -> Self {
        Self {
            production: false,
            api_server_url: API_SERVER_URL.to_string(),
            auth: AuthConfig {
                domain_prefix: AUTH_DOMAIN_PREFIX.to_string(),
                audience: AUTH_AUDIENCE.to_string(),
                client_id: AUTH_CLIENT_ID.to_string(),
                callback_url: AUTH_CALLBACK_URL.to_string(),
            },
        }
    }

    /// Production record. Same endpoints as development until a deployment edits them.
    pub fn production() -> Self {
        Self {
            production: true,
            ..Self::development()
        }
    }

    /// Built-in record for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Development => Self::development(),
            Profile::Production => Self::production(),
        }
    }

    /// Parse from the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON in the wire shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::development()
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Named deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn is_production(self) -> bool {
        matches!(self, Profile::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Profile::Development),
            "prod" | "production" => Ok(Profile::Production),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}
