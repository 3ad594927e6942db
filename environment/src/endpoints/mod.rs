//! URLs derived from the environment record.
//!
//! # Backend routes
//!
//! | Method         | Path              | Permission          |
//! |----------------|-------------------|---------------------|
//! | GET            | `/drinks`         | public              |
//! | GET            | `/drinks-detail`  | `get:drinks-detail` |
//! | POST           | `/drinks`         | `post:drinks`       |
//! | PATCH          | `/drinks/<id>`    | `patch:drinks`      |
//! | DELETE         | `/drinks/<id>`    | `delete:drinks`     |
//!
//! # Identity provider
//!
//! Login and logout links for the `<domainPrefix>.auth0.com` tenant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{AuthConfig, EnvironmentConfig};
use crate::validation::is_valid_domain_prefix;

/// Identity-provider host suffix appended to the tenant prefix.
pub const AUTH_DOMAIN_SUFFIX: &str = "auth0.com";

// =============================================================================
// Permissions
// =============================================================================

/// Permission claims the backend checks on protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "get:drinks-detail")]
    GetDrinksDetail,
    #[serde(rename = "post:drinks")]
    PostDrinks,
    #[serde(rename = "patch:drinks")]
    PatchDrinks,
    #[serde(rename = "delete:drinks")]
    DeleteDrinks,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::GetDrinksDetail,
        Permission::PostDrinks,
        Permission::PatchDrinks,
        Permission::DeleteDrinks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::GetDrinksDetail => "get:drinks-detail",
            Permission::PostDrinks => "post:drinks",
            Permission::PatchDrinks => "patch:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

// =============================================================================
// Backend routes
// =============================================================================

impl EnvironmentConfig {
    /// Join a path onto the API base URL without doubling slashes.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_server_url, path)
    }

    /// `GET /drinks` (public) and `POST /drinks`.
    pub fn drinks_url(&self) -> String {
        self.api_url("drinks")
    }

    /// `GET /drinks-detail`.
    pub fn drinks_detail_url(&self) -> String {
        self.api_url("drinks-detail")
    }

    /// `PATCH` / `DELETE /drinks/<id>`.
    pub fn drink_url(&self, id: u64) -> String {
        self.api_url(&format!("drinks/{}", id))
    }
}

// =============================================================================
// Identity provider
// =============================================================================

impl AuthConfig {
    /// Tenant host, e.g. `dev-pca1g5k8.us.auth0.com`.
    pub fn auth_domain(&self) -> String {
        format!("{}.{}", self.domain_prefix, AUTH_DOMAIN_SUFFIX)
    }

    /// Implicit-flow login link; the provider redirects to `callbackUrl`
    /// joined with `callback_path` and puts the token in the fragment.
    pub fn login_url(&self, callback_path: &str) -> ConfigResult<String> {
        let mut url = self.tenant_url("authorize")?;
        url.query_pairs_mut()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &join_url(&self.callback_url, callback_path));
        Ok(url.into())
    }

    /// Logout link returning the user to `callbackUrl`.
    pub fn logout_url(&self) -> ConfigResult<String> {
        let mut url = self.tenant_url("v2/logout")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("returnTo", &self.callback_url);
        Ok(url.into())
    }

    fn tenant_url(&self, path: &str) -> ConfigResult<Url> {
        if !is_valid_domain_prefix(&self.domain_prefix) {
            return Err(ConfigError::InvalidAuthDomain(self.domain_prefix.clone()));
        }
        Ok(Url::parse(&format!("https://{}/{}", self.auth_domain(), path))?)
    }
}

/// Join a path onto a base URL with exactly one slash between them.
/// An empty path leaves the base untouched.
fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_routes() {
        let env = EnvironmentConfig::development();
        assert_eq!(env.drinks_url(), "http://127.0.0.1:5000/drinks");
        assert_eq!(env.drinks_detail_url(), "http://127.0.0.1:5000/drinks-detail");
        assert_eq!(env.drink_url(7), "http://127.0.0.1:5000/drinks/7");
    }

    #[test]
    fn test_api_url_slashes() {
        let mut env = EnvironmentConfig::development();
        env.api_server_url = "https://api.coffee.example/v1/".into();
        assert_eq!(env.api_url("/drinks"), "https://api.coffee.example/v1/drinks");
    }

    #[test]
    fn test_login_url() {
        let auth = EnvironmentConfig::development().auth;
        let link = auth.login_url("/tabs/user-page").unwrap();

        assert!(link.starts_with("https://dev-pca1g5k8.us.auth0.com/authorize?"));
        assert!(link.contains("audience=Coffee"));
        assert!(link.contains("response_type=token"));
        assert!(link.contains("client_id=i8VbRaUPcXH21r7T0GAPUyWBVZzjqZ2T"));
        assert!(link.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8100%2Ftabs%2Fuser-page"));
    }

    #[test]
    fn test_logout_url() {
        let auth = EnvironmentConfig::development().auth;
        let link = auth.logout_url().unwrap();
        assert_eq!(
            link,
            "https://dev-pca1g5k8.us.auth0.com/v2/logout?client_id=i8VbRaUPcXH21r7T0GAPUyWBVZzjqZ2T&returnTo=http%3A%2F%2Flocalhost%3A8100"
        );
    }

    #[test]
    fn test_login_url_trailing_slash_callback() {
        let mut auth = EnvironmentConfig::development().auth;
        auth.callback_url = "http://localhost:8100/".into();

        let link = auth.login_url("/tabs/user-page").unwrap();
        assert!(link.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8100%2Ftabs%2Fuser-page"));

        let bare = auth.login_url("").unwrap();
        assert!(bare.ends_with("redirect_uri=http%3A%2F%2Flocalhost%3A8100%2F"));
    }

    #[test]
    fn test_tenant_url_rejects_bad_prefix() {
        let mut auth = EnvironmentConfig::development().auth;
        for prefix in ["evil.com/x?", "Dev-Tenant"] {
            auth.domain_prefix = prefix.into();
            let err = auth.login_url("").unwrap_err();
            assert!(matches!(err, ConfigError::InvalidAuthDomain(ref p) if p == prefix));
            assert!(auth.logout_url().is_err());
        }
    }

    #[test]
    fn test_permissions() {
        assert_eq!(Permission::PatchDrinks.to_string(), "patch:drinks");
        assert_eq!("delete:drinks".parse::<Permission>(), Ok(Permission::DeleteDrinks));
        assert!("brew:coffee".parse::<Permission>().is_err());

        let json = serde_json::to_string(&Permission::GetDrinksDetail).unwrap();
        assert_eq!(json, "\"get:drinks-detail\"");
    }
}
