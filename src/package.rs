//! Read-only package metadata supplied by the host.
//!
//! The resolver never mutates a [`PackageDescriptor`]; the pre-download hook
//! keeps the mutable parts of a pending download (dist type and transport
//! options) beside it in [`crate::plugin::DownloadPackage`].

use serde_json::{Map, Value};

/// Key in the package `extra` map holding the artefact configuration block.
pub const ARTIFACTS_KEY: &str = "artifacts";

/// Identity and version metadata for a single package.
///
/// Only `name` is required. Optional fields that are absent expand to an
/// empty string when used as template tokens.
///
/// # Examples
///
/// ```
/// use artifact_install::package::PackageDescriptor;
///
/// let package = PackageDescriptor::new("acme/widget")
///     .with_pretty_name("Acme/Widget")
///     .with_version("1.2.0.0");
/// assert_eq!(package.pretty_name(), "Acme/Widget");
/// assert_eq!(package.version(), Some("1.2.0.0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageDescriptor {
    name: String,
    pretty_name: Option<String>,
    version: Option<String>,
    pretty_version: Option<String>,
    stability: Option<String>,
    package_type: Option<String>,
    dist_checksum: Option<String>,
    extra: Map<String, Value>,
}

impl PackageDescriptor {
    /// Create a descriptor with the given canonical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the display name (`vendor/project` as the author wrote it).
    #[must_use]
    pub fn with_pretty_name(mut self, pretty_name: impl Into<String>) -> Self {
        self.pretty_name = Some(pretty_name.into());
        self
    }

    /// Set the normalised version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the version as the author wrote it.
    #[must_use]
    pub fn with_pretty_version(mut self, pretty_version: impl Into<String>) -> Self {
        self.pretty_version = Some(pretty_version.into());
        self
    }

    /// Set the stability flag (`stable`, `RC`, `beta`, `alpha`, `dev`).
    #[must_use]
    pub fn with_stability(mut self, stability: impl Into<String>) -> Self {
        self.stability = Some(stability.into());
        self
    }

    /// Set the package type (for example `library`).
    #[must_use]
    pub fn with_package_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = Some(package_type.into());
        self
    }

    /// Set the checksum declared for the registry dist archive.
    #[must_use]
    pub fn with_dist_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.dist_checksum = Some(checksum.into());
        self
    }

    /// Replace the author `extra` metadata.
    #[must_use]
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Canonical package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, falling back to the canonical name when unset.
    #[must_use]
    pub fn pretty_name(&self) -> &str {
        self.pretty_name.as_deref().unwrap_or(&self.name)
    }

    /// Normalised version, if known.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Author-written version, if known.
    #[must_use]
    pub fn pretty_version(&self) -> Option<&str> {
        self.pretty_version.as_deref()
    }

    /// Stability flag, if known.
    #[must_use]
    pub fn stability(&self) -> Option<&str> {
        self.stability.as_deref()
    }

    /// Package type, if known.
    #[must_use]
    pub fn package_type(&self) -> Option<&str> {
        self.package_type.as_deref()
    }

    /// Registry dist checksum, if known.
    #[must_use]
    pub fn dist_checksum(&self) -> Option<&str> {
        self.dist_checksum.as_deref()
    }

    /// Author `extra` metadata.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Return the raw `extra.artifacts` value when the package declares one.
    #[must_use]
    pub fn artifacts(&self) -> Option<&Value> {
        self.extra.get(ARTIFACTS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn pretty_name_falls_back_to_name() {
        let package = PackageDescriptor::new("acme/widget");
        assert_eq!(package.pretty_name(), "acme/widget");
    }

    #[rstest]
    fn optional_fields_default_to_none() {
        let package = PackageDescriptor::new("acme/widget");
        assert!(package.version().is_none());
        assert!(package.pretty_version().is_none());
        assert!(package.stability().is_none());
        assert!(package.package_type().is_none());
        assert!(package.dist_checksum().is_none());
        assert!(package.artifacts().is_none());
    }

    #[rstest]
    fn artifacts_reads_extra_block() {
        let mut extra = Map::new();
        extra.insert(ARTIFACTS_KEY.to_owned(), json!({"url": "https://x/a.zip"}));
        let package = PackageDescriptor::new("acme/widget").with_extra(extra);
        assert_eq!(
            package.artifacts(),
            Some(&json!({"url": "https://x/a.zip"}))
        );
    }
}
