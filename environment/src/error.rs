//! Error types for loading and checking the environment record.
//!
//! - [`ValidationError`] - the record (or its raw JSON) is malformed
//! - [`ConfigError`] - top-level loading errors
//!
//! Error conversion is automatic via `From` implementations,
//! so `?` works from validation up to loading.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors found while checking an environment record.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Raw JSON does not match the embedded schema.
    #[error("Schema validation failed: {}", .errors.join("; "))]
    SchemaError { errors: Vec<String> },

    /// Fields are present but unusable (bad URL, bad identifier).
    #[error("Invalid environment: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
}

impl ValidationError {
    /// All individual messages carried by this error.
    pub fn errors(&self) -> &[String] {
        match self {
            ValidationError::SchemaError { errors } | ValidationError::Invalid { errors } => errors,
        }
    }
}

// =============================================================================
// Config Errors (top-level)
// =============================================================================

/// Errors while resolving the environment record at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a profile file.
    #[error("Failed to read environment file: {0}")]
    Io(#[from] std::io::Error),

    /// Profile file is not valid JSON or does not fit the record.
    #[error("Environment JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A derived URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Tenant prefix does not form a valid identity-provider host.
    #[error("Invalid auth domain prefix '{0}' (expected lowercase DNS labels)")]
    InvalidAuthDomain(String),

    /// An override variable could not be applied.
    #[error("Invalid value for {key}: {message}")]
    InvalidOverride { key: String, message: String },

    /// Profile name not recognised.
    #[error("Unknown profile '{0}' (expected 'development' or 'production')")]
    UnknownProfile(String),

    /// The process-wide record was already installed.
    #[error("Environment already initialized")]
    AlreadyInitialized,

    /// The process-wide record was read before being installed.
    #[error("Environment not initialized")]
    NotInitialized,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
