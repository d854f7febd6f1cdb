use std::net::SocketAddr;
use std::path::PathBuf;

use log::debug;
use url::Url;

use crate::clients::errors::{Error, Result};

const AUTH_ENDPOINT_VAR: &str = "INSIGHTS_AUTH_ENDPOINT";
const API_ENDPOINT_VAR: &str = "INSIGHTS_API_ENDPOINT";
const AUTHORIZATION_VAR: &str = "INSIGHTS_AUTHORIZATION";
const STORAGE_PATH_VAR: &str = "INSIGHTS_STORAGE_PATH";
const BIND_VAR: &str = "INSIGHTS_BIND";

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// How the stored token is presented in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: <token>`, for proxies that expect the bare token.
    Raw,
}

impl AuthorizationScheme {
    /// `Authorization` header value for `token`.
    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthorizationScheme::Raw => token.to_string(),
            AuthorizationScheme::Bearer if token.starts_with("Bearer ") => token.to_string(),
            AuthorizationScheme::Bearer => format!("Bearer {token}"),
        }
    }
}

impl std::str::FromStr for AuthorizationScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthorizationScheme::Bearer),
            "raw" => Ok(AuthorizationScheme::Raw),
            other => Err(Error::ConfigurationError(format!(
                "{AUTHORIZATION_VAR} must be `bearer` or `raw`, got `{other}`"
            ))),
        }
    }
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Answers with the provider's authorization URL
    pub auth_endpoint: Url,
    /// Base of the proxy API
    pub api_endpoint: Url,
    /// Header format for the token
    pub authorization: AuthorizationScheme,
    /// `DuckDB` file holding the token
    pub storage_path: PathBuf,
    /// Where the HTTP server listens
    pub bind_address: SocketAddr,
}

impl Config {
    /// `<api endpoint>/top-tracks`
    pub fn top_tracks_url(&self) -> String {
        format!("{}/top-tracks", self.api_endpoint.as_str().trim_end_matches('/'))
    }
}

/// Builds a [`Config`]; unset fields come from the environment.
#[derive(Default)]
pub struct ConfigBuilder {
    auth_endpoint: Option<String>,
    api_endpoint: Option<String>,
    authorization: Option<AuthorizationScheme>,
    storage_path: Option<PathBuf>,
    bind_address: Option<SocketAddr>,
}

impl ConfigBuilder {
    /// Builder with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the authorization endpoint.
    #[must_use]
    pub fn auth_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the proxy base.
    #[must_use]
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the header format.
    #[must_use]
    pub fn authorization(mut self, scheme: AuthorizationScheme) -> Self {
        self.authorization = Some(scheme);
        self
    }

    /// Overrides the storage file.
    #[must_use]
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Overrides the listen address.
    #[must_use]
    pub fn bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = Some(address);
        self
    }

    /// Fills every unset field from the environment, falling back to values
    /// baked in at build time for the two endpoints.
    pub fn build(self) -> Result<Config> {
        let auth_endpoint = match self.auth_endpoint {
            Some(e) => e,
            None => endpoint_from_env(AUTH_ENDPOINT_VAR, option_env!("INSIGHTS_AUTH_ENDPOINT"))?,
        };
        let api_endpoint = match self.api_endpoint {
            Some(e) => e,
            None => endpoint_from_env(API_ENDPOINT_VAR, option_env!("INSIGHTS_API_ENDPOINT"))?,
        };
        let authorization = match self.authorization {
            Some(a) => a,
            None => match std::env::var(AUTHORIZATION_VAR) {
                Ok(value) => value.parse()?,
                Err(_) => AuthorizationScheme::default(),
            },
        };
        let storage_path = match self.storage_path {
            Some(p) => p,
            None => std::env::var(STORAGE_PATH_VAR).map_or_else(
                |_| {
                    dirs::cache_dir()
                        .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
                        .join(".spotify_insights.duckdb")
                },
                PathBuf::from,
            ),
        };
        let bind_address = match self.bind_address {
            Some(a) => a,
            None => std::env::var(BIND_VAR)
                .unwrap_or_else(|_| DEFAULT_BIND.to_string())
                .parse()
                .map_err(|e| Error::ConfigurationError(format!("{BIND_VAR}: {e}")))?,
        };

        let config = Config {
            auth_endpoint: Url::parse(&auth_endpoint)?,
            api_endpoint: Url::parse(&api_endpoint)?,
            authorization,
            storage_path,
            bind_address,
        };
        debug!("Resolved configuration: {config:?}");
        Ok(config)
    }
}

fn endpoint_from_env(var: &str, built_in: Option<&str>) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => built_in.map(str::to_string).ok_or_else(|| {
            Error::ConfigurationError(format!(
                "Missing {var}. Set it in the environment or in a .env file."
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explicit() -> ConfigBuilder {
        ConfigBuilder::new()
            .auth_endpoint("http://localhost:5000/api/auth/login")
            .api_endpoint("http://localhost:5000/api/user/")
            .authorization(AuthorizationScheme::Bearer)
            .storage_path("/tmp/insights-test.duckdb")
            .bind_address("127.0.0.1:3100".parse().unwrap())
    }

    #[test]
    fn explicit_values_win() {
        let config = explicit().build().unwrap();
        assert_eq!(config.auth_endpoint.as_str(), "http://localhost:5000/api/auth/login");
        assert_eq!(config.bind_address.port(), 3100);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/insights-test.duckdb"));
    }

    #[test]
    fn top_tracks_url_has_single_separator() {
        let config = explicit().build().unwrap();
        assert_eq!(config.top_tracks_url(), "http://localhost:5000/api/user/top-tracks");

        let config = explicit().api_endpoint("http://localhost:5000/api/user").build().unwrap();
        assert_eq!(config.top_tracks_url(), "http://localhost:5000/api/user/top-tracks");
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = explicit().auth_endpoint("not a url").build().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn authorization_header_values() {
        assert_eq!(AuthorizationScheme::Bearer.header_value("ABC"), "Bearer ABC");
        assert_eq!(AuthorizationScheme::Bearer.header_value("Bearer ABC"), "Bearer ABC");
        assert_eq!(AuthorizationScheme::Raw.header_value("ABC"), "ABC");
    }

    #[test]
    fn parses_authorization_scheme() {
        assert_eq!("RAW".parse::<AuthorizationScheme>().unwrap(), AuthorizationScheme::Raw);
        assert_eq!(" bearer ".parse::<AuthorizationScheme>().unwrap(), AuthorizationScheme::Bearer);
        assert!("basic".parse::<AuthorizationScheme>().is_err());
    }
}
