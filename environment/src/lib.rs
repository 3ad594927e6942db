//! # coffee-env - environment configuration for the Coffee Shop client
//!
//! A fixed, per-deployment record (backend URL, identity-provider tenant,
//! audience, client id, callback URL) resolved once at startup and read
//! by the rest of the application.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Profile   │────▶│  COFFEE_*   │────▶│  Validate   │────▶│  &'static   │
//! │ (built-in / │     │  overrides  │     │ (schema +   │     │ Environment │
//! │   file)     │     │             │     │  URLs)      │     │   Config    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coffee_env::{init_from, LoadOptions};
//!
//! let env = init_from(&LoadOptions::default())?;
//! println!("API at {}", env.drinks_url());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - The record and built-in profiles
//! - [`validation`] - Schema and field checks
//! - [`loader`] - Resolution and the process-wide holder
//! - [`endpoints`] - Backend routes and login/logout links

pub mod error;
pub mod models;

pub mod validation;

pub mod loader;

pub mod endpoints;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult, ValidationError, ValidationResult};

pub use models::{AuthConfig, EnvironmentConfig, Profile};

pub use validation::{
    environment_schema,
    is_valid,
    is_valid_domain_prefix,
    is_valid_environment,
    is_valid_environment_value,
    production_warnings,
    validate,
    validate_environment,
    validate_environment_value,
};

pub use loader::{
    apply_env_overrides,
    apply_overrides,
    current,
    get,
    init,
    init_from,
    load,
    load_file,
    resolve,
    LoadOptions,
    Override,
};

pub use endpoints::Permission;
