//! Resolver settings.
//!
//! Settings live in a small TOML file with a single `[github]` table. Every
//! key is optional and unknown keys are rejected so typos surface early:
//!
//! ```toml
//! [github]
//! api_url = "https://api.github.com"
//! token = "ghp_…"
//! user_agent = "artifact-install"
//! timeout_secs = 30
//! ```
//!
//! When no token is configured, [`ResolverSettings::with_env_token`] falls
//! back to the host's `COMPOSER_AUTH` document and then to `GITHUB_TOKEN`.

use std::fmt;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Environment variable holding the host's inline auth document.
pub const COMPOSER_AUTH_ENV: &str = "COMPOSER_AUTH";

/// Environment variable holding a plain GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors arising while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}")]
    Read {
        /// Path of the settings file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unknown keys.
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// `COMPOSER_AUTH` is set but is not valid JSON.
    #[error("invalid COMPOSER_AUTH: {0}")]
    ComposerAuth(#[source] serde_json::Error),
}

/// Top-level resolver settings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSettings {
    /// GitHub API access used by release asset lookups.
    pub github: GithubSettings,
}

/// GitHub API access settings.
#[derive(Clone, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GithubSettings {
    /// Base URL of the REST API. GitHub Enterprise uses `https://host/api/v3`.
    pub api_url: String,
    /// Token sent as a bearer credential.
    pub token: Option<String>,
    /// `User-Agent` header value; GitHub rejects requests without one.
    pub user_agent: String,
    /// Global timeout for the listing request, in seconds.
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSettings")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GithubSettings {
    /// API base URL without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// The request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host name used as the key in `github-oauth` auth documents.
    ///
    /// The `api.` prefix of the public API host is dropped, so
    /// `https://api.github.com` maps to `github.com`.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::settings::GithubSettings;
    ///
    /// assert_eq!(GithubSettings::default().oauth_host(), "github.com");
    /// ```
    #[must_use]
    pub fn oauth_host(&self) -> &str {
        let without_scheme = self
            .api_url
            .split_once("://")
            .map_or(self.api_url.as_str(), |(_, rest)| rest);
        let host = without_scheme.split('/').next().unwrap_or_default();
        host.strip_prefix("api.").unwrap_or(host)
    }
}

impl ResolverSettings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML or unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::settings::ResolverSettings;
    ///
    /// let settings = ResolverSettings::from_toml_str("[github]\ntimeout_secs = 5\n")
    ///     .expect("valid settings");
    /// assert_eq!(settings.github.timeout_secs, 5);
    /// assert_eq!(settings.github.api_url(), "https://api.github.com");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read and
    /// [`SettingsError::Parse`] when its content is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Fill a missing token from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ComposerAuth`] when `COMPOSER_AUTH` is set
    /// but malformed.
    pub fn with_env_token(self) -> Result<Self, SettingsError> {
        self.with_token_from(|name| std::env::var(name).ok())
    }

    /// Fill a missing token using `lookup` to read environment variables.
    ///
    /// A token already present in the settings wins. Otherwise the
    /// `github-oauth` entry of `COMPOSER_AUTH` for [`GithubSettings::oauth_host`]
    /// is used, then `GITHUB_TOKEN`. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ComposerAuth`] when `COMPOSER_AUTH` is set
    /// but malformed.
    pub fn with_token_from<F>(mut self, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if non_blank(self.github.token.as_deref()).is_some() {
            return Ok(self);
        }
        let from_auth = match lookup(COMPOSER_AUTH_ENV) {
            Some(document) => composer_auth_token(&document, self.github.oauth_host())?,
            None => None,
        };
        self.github.token = from_auth.or_else(|| {
            lookup(GITHUB_TOKEN_ENV)
                .and_then(|token| non_blank(Some(token.as_str())).map(str::to_owned))
        });
        Ok(self)
    }
}

fn composer_auth_token(document: &str, host: &str) -> Result<Option<String>, SettingsError> {
    let auth: Value = serde_json::from_str(document).map_err(SettingsError::ComposerAuth)?;
    Ok(auth
        .get("github-oauth")
        .and_then(|hosts| hosts.get(host))
        .and_then(Value::as_str)
        .and_then(|token| non_blank(Some(token)))
        .map(str::to_owned))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
