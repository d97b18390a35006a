//! GitHub release lookup.
//!
//! # Sub-modules
//!
//! - [`release`] — Release listing payload types and asset matching.
//! - [`client`] — The [`ReleaseClient`] seam and its `ureq` implementation.
//!
//! Only the first page of assets returned by the releases API is seen; the
//! lookup never follows pagination links.

pub mod client;
pub mod release;

pub use client::{HttpReleaseClient, ReleaseClient, ReleaseLookupError};
pub use release::{Release, ReleaseAsset};

/// `Accept` header for the release listing request.
pub const RELEASE_LISTING_ACCEPT: &str = "application/vnd.github+json";

/// `Accept` header the host must send when downloading an asset through its
/// API URL; without it GitHub answers with the asset's JSON metadata.
pub const ASSET_DOWNLOAD_ACCEPT: &str = "application/octet-stream";

/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";

/// Build the release-by-tag endpoint for `repo` under `api_url`.
///
/// # Examples
///
/// ```
/// use artifact_install::github::release_url;
///
/// assert_eq!(
///     release_url("https://api.github.com", "o/r", "v1"),
///     "https://api.github.com/repos/o/r/releases/tags/v1"
/// );
/// ```
#[must_use]
pub fn release_url(api_url: &str, repo: &str, tag: &str) -> String {
    format!(
        "{}/repos/{repo}/releases/tags/{tag}",
        api_url.trim_end_matches('/')
    )
}
