//! Pre-download hook.
//!
//! The host fires a [`PreFileDownloadEvent`] before each file download.
//! [`ArtefactPlugin::on_pre_download`] redirects the download when the
//! package declares an `extra.artifacts` block and leaves the event alone
//! otherwise. Resolution finishes before anything is written back, so a
//! failed resolution never leaves the event half-updated.

use log::debug;

use crate::config::ArtefactConfig;
use crate::error::Result;
use crate::package::PackageDescriptor;
use crate::resolver::{HttpHeader, ResolvedArtefact, Resolver};

/// Transport options the host applies to a package's dist download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Extra HTTP headers.
    pub http_headers: Vec<HttpHeader>,
}

/// A package whose dist archive is about to be downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPackage {
    descriptor: PackageDescriptor,
    dist_type: Option<String>,
    transport_options: TransportOptions,
}

impl DownloadPackage {
    /// Wrap a descriptor with its current dist type.
    #[must_use]
    pub fn new(descriptor: PackageDescriptor, dist_type: Option<String>) -> Self {
        Self {
            descriptor,
            dist_type,
            transport_options: TransportOptions::default(),
        }
    }

    /// Read-only package metadata.
    #[must_use]
    pub const fn descriptor(&self) -> &PackageDescriptor {
        &self.descriptor
    }

    /// Declared dist archive type.
    #[must_use]
    pub fn dist_type(&self) -> Option<&str> {
        self.dist_type.as_deref()
    }

    /// Transport options for the dist download.
    #[must_use]
    pub const fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

/// What a download event is about.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadContext {
    /// A package dist archive.
    Package(DownloadPackage),
    /// Anything else the host downloads (metadata, plugins, …).
    Other,
}

/// Host event fired before a file download.
#[derive(Debug, Clone, PartialEq)]
pub struct PreFileDownloadEvent {
    processed_url: String,
    context: DownloadContext,
}

impl PreFileDownloadEvent {
    /// Create an event for `url` in `context`.
    #[must_use]
    pub fn new(url: impl Into<String>, context: DownloadContext) -> Self {
        Self {
            processed_url: url.into(),
            context,
        }
    }

    /// URL the host will download from.
    #[must_use]
    pub fn processed_url(&self) -> &str {
        &self.processed_url
    }

    /// Replace the URL the host will download from.
    pub fn set_processed_url(&mut self, url: impl Into<String>) {
        self.processed_url = url.into();
    }

    /// The event context.
    #[must_use]
    pub const fn context(&self) -> &DownloadContext {
        &self.context
    }

    /// The package being downloaded, if any.
    #[must_use]
    pub const fn package(&self) -> Option<&DownloadPackage> {
        match &self.context {
            DownloadContext::Package(package) => Some(package),
            DownloadContext::Other => None,
        }
    }

    /// Consume the event and return its context.
    #[must_use]
    pub fn into_context(self) -> DownloadContext {
        self.context
    }
}

/// What [`ArtefactPlugin::on_pre_download`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreDownloadOutcome {
    /// The event was not about a package.
    NotAPackage,
    /// The package has no `extra.artifacts` block.
    Untouched,
    /// The download now points at the resolved artefact.
    Redirected(ResolvedArtefact),
}

/// Pre-download hook redirecting packages with an artefact configuration.
///
/// # Examples
///
/// ```
/// use artifact_install::package::PackageDescriptor;
/// use artifact_install::plugin::{
///     ArtefactPlugin, DownloadContext, DownloadPackage, PreDownloadOutcome, PreFileDownloadEvent,
/// };
/// use artifact_install::github::HttpReleaseClient;
/// use artifact_install::resolver::ArtefactResolver;
/// use artifact_install::settings::GithubSettings;
///
/// let plugin = ArtefactPlugin::new(ArtefactResolver::new(HttpReleaseClient::new(
///     &GithubSettings::default(),
/// )));
/// let package = DownloadPackage::new(PackageDescriptor::new("acme/widget"), Some("zip".into()));
/// let mut event = PreFileDownloadEvent::new(
///     "https://registry.example.test/widget.zip",
///     DownloadContext::Package(package),
/// );
///
/// let outcome = plugin.on_pre_download(&mut event).expect("no artefacts block");
/// assert_eq!(outcome, PreDownloadOutcome::Untouched);
/// assert_eq!(event.processed_url(), "https://registry.example.test/widget.zip");
/// ```
#[derive(Debug, Clone)]
pub struct ArtefactPlugin<R> {
    resolver: R,
}

impl<R: Resolver> ArtefactPlugin<R> {
    /// Create the hook around `resolver`.
    #[must_use]
    pub const fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The resolver in use.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Inspect a pending download and redirect it when configured.
    ///
    /// On success the event's processed URL, the package dist type and,
    /// when the resolution requires headers, the package transport options
    /// are replaced.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`](crate::error::ResolveError) that aborted
    /// resolution; the event is left unchanged.
    pub fn on_pre_download(&self, event: &mut PreFileDownloadEvent) -> Result<PreDownloadOutcome> {
        let DownloadContext::Package(package) = &mut event.context else {
            return Ok(PreDownloadOutcome::NotAPackage);
        };
        let pretty_name = package.descriptor.pretty_name();
        let Some(block) = package.descriptor.artifacts() else {
            debug!("missing extra.artifacts in {pretty_name}, skip");
            return Ok(PreDownloadOutcome::Untouched);
        };
        debug!("processing {pretty_name}");

        let config = ArtefactConfig::from_value(block)?;
        let resolved = self.resolver.resolve(&package.descriptor, &config)?;

        package.dist_type = Some(resolved.archive_type.clone());
        if !resolved.transport_headers.is_empty() {
            package.transport_options = TransportOptions {
                http_headers: resolved.transport_headers.clone(),
            };
        }
        event.processed_url.clone_from(&resolved.url);
        Ok(PreDownloadOutcome::Redirected(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ResolveError};
    use crate::package::ARTIFACTS_KEY;
    use rstest::rstest;
    use serde_json::{Map, Value, json};
    use std::cell::Cell;

    const REGISTRY_URL: &str = "https://registry.example.test/dist.zip";

    /// Resolver returning a fixed result and counting calls.
    struct FixedResolver {
        result: fn() -> Result<ResolvedArtefact>,
        calls: Cell<usize>,
    }

    impl FixedResolver {
        fn new(result: fn() -> Result<ResolvedArtefact>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl Resolver for FixedResolver {
        fn resolve(
            &self,
            _package: &PackageDescriptor,
            _config: &ArtefactConfig,
        ) -> Result<ResolvedArtefact> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    fn octet_stream() -> Result<ResolvedArtefact> {
        Ok(ResolvedArtefact {
            url: "https://api.example.test/assets/1".to_owned(),
            archive_type: "tar".to_owned(),
            transport_headers: vec![HttpHeader::new("Accept", "application/octet-stream")],
        })
    }

    fn asset_missing() -> Result<ResolvedArtefact> {
        Err(ResolveError::AssetNotFound {
            repo: "o/r".to_owned(),
            tag: "v1".to_owned(),
            file: "pkg.tgz".to_owned(),
        })
    }

    fn package_event(artifacts: Option<Value>) -> PreFileDownloadEvent {
        let mut extra = Map::new();
        if let Some(block) = artifacts {
            extra.insert(ARTIFACTS_KEY.to_owned(), block);
        }
        let descriptor = PackageDescriptor::new("acme/widget").with_extra(extra);
        PreFileDownloadEvent::new(
            REGISTRY_URL,
            DownloadContext::Package(DownloadPackage::new(descriptor, Some("zip".to_owned()))),
        )
    }

    #[rstest]
    fn non_package_downloads_are_ignored() {
        let plugin = ArtefactPlugin::new(FixedResolver::new(octet_stream));
        let mut event = PreFileDownloadEvent::new(REGISTRY_URL, DownloadContext::Other);
        let before = event.clone();

        let outcome = plugin.on_pre_download(&mut event).expect("no-op");

        assert_eq!(outcome, PreDownloadOutcome::NotAPackage);
        assert_eq!(event, before);
        assert_eq!(event.context(), &DownloadContext::Other);
        assert_eq!(plugin.resolver().calls.get(), 0);
    }

    #[rstest]
    fn packages_without_artifacts_pass_through() {
        let plugin = ArtefactPlugin::new(FixedResolver::new(octet_stream));
        let mut event = package_event(None);
        let before = event.clone();

        let outcome = plugin.on_pre_download(&mut event).expect("no-op");

        assert_eq!(outcome, PreDownloadOutcome::Untouched);
        assert_eq!(event, before);
        assert_eq!(plugin.resolver().calls.get(), 0);
    }

    #[rstest]
    fn configured_packages_are_redirected() {
        let plugin = ArtefactPlugin::new(FixedResolver::new(octet_stream));
        let mut event = package_event(Some(json!({"url": "ignored by the fixed resolver"})));

        let outcome = plugin.on_pre_download(&mut event).expect("redirected");

        assert!(matches!(outcome, PreDownloadOutcome::Redirected(_)));
        assert_eq!(event.processed_url(), "https://api.example.test/assets/1");
        let package = event.package().expect("package context");
        assert_eq!(package.dist_type(), Some("tar"));
        assert_eq!(
            package.transport_options().http_headers,
            vec![HttpHeader::new("Accept", "application/octet-stream")]
        );
    }

    #[rstest]
    fn direct_urls_keep_existing_transport_options() {
        fn direct() -> Result<ResolvedArtefact> {
            Ok(ResolvedArtefact::new("https://x/a.zip", "zip"))
        }
        let plugin = ArtefactPlugin::new(FixedResolver::new(direct));
        let mut event = package_event(Some(json!({"url": "https://x/a.zip"})));

        plugin.on_pre_download(&mut event).expect("redirected");

        let package = event.package().expect("package context");
        assert_eq!(package.transport_options(), &TransportOptions::default());
    }

    #[rstest]
    fn failures_leave_the_event_unchanged() {
        let plugin = ArtefactPlugin::new(FixedResolver::new(asset_missing));
        let mut event = package_event(Some(json!({"source": "github-release-asset"})));
        let before = event.clone();

        let err = plugin.on_pre_download(&mut event).expect_err("asset missing");

        assert!(matches!(err, ResolveError::AssetNotFound { .. }));
        assert_eq!(event, before);
    }

    #[rstest]
    fn malformed_blocks_fail_before_resolution() {
        let plugin = ArtefactPlugin::new(FixedResolver::new(octet_stream));
        let mut event = package_event(Some(json!("https://x/a.zip")));

        let err = plugin.on_pre_download(&mut event).expect_err("malformed");

        assert!(matches!(
            err,
            ResolveError::Config(ConfigError::MalformedBlock { .. })
        ));
        assert_eq!(plugin.resolver().calls.get(), 0);
    }
}
