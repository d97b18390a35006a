//! Release listing client.
//!
//! [`ReleaseClient`] is the seam the resolver depends on, so tests can stand
//! in for the network. [`HttpReleaseClient`] is the production
//! implementation over a blocking `ureq` agent.

use std::fmt;

use log::debug;

use super::release::Release;
use super::{API_VERSION, RELEASE_LISTING_ACCEPT, release_url};
use crate::settings::GithubSettings;

/// Fetches a release listing by repository and tag.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseClient {
    /// Fetch the release tagged `tag` in `repo` (`owner/name`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the release does not exist, or
    /// the body is not a release listing.
    fn fetch_release(&self, repo: &str, tag: &str) -> Result<Release, ReleaseLookupError>;
}

impl<C: ReleaseClient + ?Sized> ReleaseClient for &C {
    fn fetch_release(&self, repo: &str, tag: &str) -> Result<Release, ReleaseLookupError> {
        (**self).fetch_release(repo, tag)
    }
}

/// Errors arising from the release listing request.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseLookupError {
    /// HTTP request failed.
    #[error("release lookup failed for {url}: {source}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// The transport or status error.
        #[source]
        source: ureq::Error,
    },

    /// The release does not exist (HTTP 404).
    #[error("release not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The body was not a release listing.
    #[error("release listing from {url} could not be decoded: {source}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// The JSON error.
        source: serde_json::Error,
    },
}

/// Release client backed by `ureq`.
#[derive(Clone)]
pub struct HttpReleaseClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
    user_agent: String,
}

impl HttpReleaseClient {
    /// Build a client from GitHub settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::github::HttpReleaseClient;
    /// use artifact_install::settings::GithubSettings;
    ///
    /// let client = HttpReleaseClient::new(&GithubSettings::default());
    /// assert_eq!(client.api_url(), "https://api.github.com");
    /// ```
    #[must_use]
    pub fn new(settings: &GithubSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout()))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            api_url: settings.api_url().to_owned(),
            token: settings.token.clone(),
            user_agent: settings.user_agent.clone(),
        }
    }

    /// Base URL of the REST API.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl fmt::Debug for HttpReleaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpReleaseClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ReleaseClient for HttpReleaseClient {
    fn fetch_release(&self, repo: &str, tag: &str) -> Result<Release, ReleaseLookupError> {
        let url = release_url(&self.api_url, repo, tag);
        debug!("fetching release listing {url}");

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", RELEASE_LISTING_ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", self.user_agent.as_str());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let body = request
            .call()
            .map_err(|e| map_ureq_error(&url, e))?
            .into_body()
            .read_to_string()
            .map_err(|source| ReleaseLookupError::Http {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|source| ReleaseLookupError::Decode { url, source })
    }
}

/// Map a ureq error to a [`ReleaseLookupError`].
fn map_ureq_error(url: &str, err: ureq::Error) -> ReleaseLookupError {
    match err {
        ureq::Error::StatusCode(404) => ReleaseLookupError::NotFound {
            url: url.to_owned(),
        },
        source => ReleaseLookupError::Http {
            url: url.to_owned(),
            source,
        },
    }
}
