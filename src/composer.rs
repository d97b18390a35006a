//! Composer package metadata adapters.
//!
//! Reads package objects as they appear in `composer.json` repositories and
//! `composer.lock` files, and converts them into [`PackageDescriptor`]s the
//! way Composer itself derives names, versions and stability.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::package::PackageDescriptor;
use crate::plugin::{DownloadContext, DownloadPackage, PreFileDownloadEvent};

const DEFAULT_PACKAGE_TYPE: &str = "library";

/// Errors arising while reading Composer documents.
#[derive(Debug, Error)]
pub enum ComposerError {
    /// The document is neither a package object nor a lock file.
    #[error("invalid composer document: {0}")]
    Json(#[from] serde_json::Error),

    /// No package with the requested name exists in the document.
    #[error("package {name} not found")]
    PackageNotFound {
        /// The requested name.
        name: String,
    },
}

/// Package stability derived from a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    /// A tagged release.
    Stable,
    /// A release candidate.
    ReleaseCandidate,
    /// A beta release.
    Beta,
    /// An alpha release.
    Alpha,
    /// A development branch.
    Dev,
}

impl Stability {
    /// Derive the stability of `version`.
    ///
    /// Branch versions (`dev-main`, `1.x-dev`) are `dev`. Otherwise the
    /// trailing modifier decides: `alpha`/`a`, `beta`/`b` and `rc` map to
    /// their stabilities and anything else is stable. A `#reference`
    /// suffix is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::composer::Stability;
    ///
    /// assert_eq!(Stability::parse("1.2.0"), Stability::Stable);
    /// assert_eq!(Stability::parse("2.0.0-RC1"), Stability::ReleaseCandidate);
    /// assert_eq!(Stability::parse("dev-main"), Stability::Dev);
    /// ```
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let without_ref = version.split('#').next().unwrap_or_default();
        let lowered = without_ref.trim().to_ascii_lowercase();
        if lowered.starts_with("dev-") || lowered.ends_with("-dev") {
            return Self::Dev;
        }

        let modifier_end =
            lowered.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-');
        let modifier_start = modifier_end.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let modifier = modifier_end
            .get(modifier_start.len()..)
            .unwrap_or_default();
        match modifier {
            "alpha" | "a" => Self::Alpha,
            "beta" | "b" => Self::Beta,
            "rc" => Self::ReleaseCandidate,
            _ => Self::Stable,
        }
    }

    /// The flag as Composer spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::ReleaseCandidate => "RC",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dist block of a Composer package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComposerDist {
    /// Archive type.
    #[serde(rename = "type")]
    pub dist_type: Option<String>,
    /// Registry download URL.
    pub url: Option<String>,
    /// Declared SHA-1 checksum.
    pub shasum: Option<String>,
}

/// A package object as Composer serialises it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComposerPackage {
    /// Package name as written (`Vendor/Project`).
    pub name: String,
    /// Version as written.
    #[serde(default)]
    pub version: Option<String>,
    /// Normalised version.
    #[serde(default)]
    pub version_normalized: Option<String>,
    /// Package type; Composer assumes `library` when absent.
    #[serde(default, rename = "type")]
    pub package_type: Option<String>,
    /// Registry dist archive.
    #[serde(default)]
    pub dist: Option<ComposerDist>,
    /// Author metadata.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl ComposerPackage {
    /// Convert into the resolver's read-only descriptor.
    #[must_use]
    pub fn descriptor(&self) -> PackageDescriptor {
        let mut descriptor = PackageDescriptor::new(self.name.to_lowercase())
            .with_pretty_name(self.name.clone())
            .with_package_type(
                self.package_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PACKAGE_TYPE.to_owned()),
            )
            .with_extra(self.extra.clone());
        if let Some(pretty_version) = &self.version {
            descriptor = descriptor
                .with_pretty_version(pretty_version.clone())
                .with_stability(Stability::parse(pretty_version).as_str());
        }
        if let Some(version) = self.version_normalized.as_ref().or(self.version.as_ref()) {
            descriptor = descriptor.with_version(version.clone());
        }
        if let Some(checksum) = self.dist.as_ref().and_then(|dist| dist.shasum.clone()) {
            descriptor = descriptor.with_dist_checksum(checksum);
        }
        descriptor
    }

    /// Registry dist URL, if any.
    #[must_use]
    pub fn dist_url(&self) -> Option<&str> {
        self.dist.as_ref().and_then(|dist| dist.url.as_deref())
    }

    /// Registry dist type, if any.
    #[must_use]
    pub fn dist_type(&self) -> Option<&str> {
        self.dist.as_ref().and_then(|dist| dist.dist_type.as_deref())
    }

    /// The pre-download event the host would fire for this package's dist.
    ///
    /// Packages without a dist URL start from an empty URL.
    #[must_use]
    pub fn download_event(&self) -> PreFileDownloadEvent {
        let package = DownloadPackage::new(self.descriptor(), self.dist_type().map(str::to_owned));
        PreFileDownloadEvent::new(
            self.dist_url().unwrap_or_default(),
            DownloadContext::Package(package),
        )
    }
}

#[derive(Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Vec<ComposerPackage>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Vec<ComposerPackage>,
}

/// A single package object or every package of a `composer.lock`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerDocument {
    packages: Vec<ComposerPackage>,
}

impl ComposerDocument {
    /// Parse JSON text holding a package object or a lock file.
    ///
    /// Objects with a `packages` or `packages-dev` array are read as lock
    /// files; anything else must be a package object.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Json`] when the text matches neither shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifact_install::composer::ComposerDocument;
    ///
    /// let lock = r#"{"packages":[{"name":"Acme/Widget","version":"1.0.0"}]}"#;
    /// let document = ComposerDocument::from_json(lock).expect("valid lock file");
    /// assert!(document.find("acme/widget").is_ok());
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ComposerError> {
        let value: Value = serde_json::from_str(text)?;
        let is_lock = value.as_object().is_some_and(|object| {
            object.contains_key("packages") || object.contains_key("packages-dev")
        });
        let packages = if is_lock {
            let lock = LockFile::deserialize(&value)?;
            lock.packages.into_iter().chain(lock.packages_dev).collect()
        } else {
            vec![ComposerPackage::deserialize(&value)?]
        };
        Ok(Self { packages })
    }

    /// All packages, production packages first.
    #[must_use]
    pub fn packages(&self) -> &[ComposerPackage] {
        &self.packages
    }

    /// Look a package up by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::PackageNotFound`] when no package matches.
    pub fn find(&self, name: &str) -> Result<&ComposerPackage, ComposerError> {
        self.packages
            .iter()
            .find(|package| package.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ComposerError::PackageNotFound {
                name: name.to_owned(),
            })
    }
}
