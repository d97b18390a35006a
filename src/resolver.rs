//! Artefact URL resolution.
//!
//! [`ArtefactResolver`] turns a package and its `extra.artifacts` block into
//! a concrete download URL and archive type. Direct URL templates resolve
//! locally; GitHub release assets cost exactly one listing request through
//! the injected [`ReleaseClient`]. A missing asset is an error, never a
//! fallback to another strategy.

use std::fmt;

use log::debug;

use crate::config::{ArtefactConfig, ArtefactStrategy, ReleaseAssetRef};
use crate::error::{ResolveError, Result};
use crate::github::{ASSET_DOWNLOAD_ACCEPT, ReleaseClient};
use crate::package::PackageDescriptor;
use crate::tokens::TokenSet;

/// A header the host must send when downloading the resolved artefact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HttpHeader {
    /// Create a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for HttpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtefact {
    /// Final download URL.
    pub url: String,
    /// Dist archive type (for example `zip` or `tar`).
    pub archive_type: String,
    /// Headers required by the artefact download itself.
    pub transport_headers: Vec<HttpHeader>,
}

impl ResolvedArtefact {
    /// Create a resolution with no extra transport headers.
    #[must_use]
    pub fn new(url: impl Into<String>, archive_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            archive_type: archive_type.into(),
            transport_headers: Vec::new(),
        }
    }
}

/// Resolves a package's artefact configuration to a download location.
pub trait Resolver {
    /// Resolve `config` for `package`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the configuration is invalid, the
    /// source is unsupported, the release asset is missing, or the release
    /// lookup fails.
    fn resolve(&self, package: &PackageDescriptor, config: &ArtefactConfig)
    -> Result<ResolvedArtefact>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(
        &self,
        package: &PackageDescriptor,
        config: &ArtefactConfig,
    ) -> Result<ResolvedArtefact> {
        (**self).resolve(package, config)
    }
}

/// Resolver supporting direct URL templates and GitHub release assets.
///
/// # Examples
///
/// ```
/// use artifact_install::config::ArtefactConfig;
/// use artifact_install::github::HttpReleaseClient;
/// use artifact_install::package::PackageDescriptor;
/// use artifact_install::resolver::{ArtefactResolver, Resolver};
/// use artifact_install::settings::GithubSettings;
///
/// let resolver = ArtefactResolver::new(HttpReleaseClient::new(&GithubSettings::default()));
/// let package = PackageDescriptor::new("acme/widget").with_version("1.2.0");
/// let config = ArtefactConfig::with_url("https://x/{name}-{version}.zip");
///
/// let resolved = resolver.resolve(&package, &config).expect("direct URL resolves offline");
/// assert_eq!(resolved.url, "https://x/acme/widget-1.2.0.zip");
/// assert_eq!(resolved.archive_type, "zip");
/// ```
#[derive(Debug, Clone)]
pub struct ArtefactResolver<C> {
    client: C,
}

impl<C: ReleaseClient> ArtefactResolver<C> {
    /// Create a resolver that looks releases up through `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// The release client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    fn locate_asset(&self, asset: &ReleaseAssetRef) -> Result<String> {
        let release = self.client.fetch_release(&asset.repo, &asset.tag)?;
        let Some(found) = release.find_asset(&asset.file) else {
            return Err(ResolveError::AssetNotFound {
                repo: asset.repo.clone(),
                tag: asset.tag.clone(),
                file: asset.file.clone(),
            });
        };
        debug!(
            "matched asset {} in {}@{}: {}",
            asset.file, asset.repo, asset.tag, found.url
        );
        Ok(found.url.clone())
    }
}

impl<C: ReleaseClient> Resolver for ArtefactResolver<C> {
    fn resolve(
        &self,
        package: &PackageDescriptor,
        config: &ArtefactConfig,
    ) -> Result<ResolvedArtefact> {
        let tokens = TokenSet::from_package(package)?;
        let expanded = config.expand(&tokens);
        let archive_type = expanded.archive_type_or_default().to_owned();

        match expanded.strategy()? {
            ArtefactStrategy::DirectUrl { url } => Ok(ResolvedArtefact::new(url, archive_type)),
            ArtefactStrategy::GithubReleaseAsset(asset) => Ok(ResolvedArtefact {
                url: self.locate_asset(&asset)?,
                archive_type,
                transport_headers: vec![HttpHeader::new("Accept", ASSET_DOWNLOAD_ACCEPT)],
            }),
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
