//! Error types for artefact resolution.
//!
//! Every variant is fatal to the download of the package being resolved.
//! Nothing here is recovered locally; the host decides whether a failure
//! aborts the whole install or only the one package.

use thiserror::Error;

use crate::github::ReleaseLookupError;

/// The artefact configuration or package metadata is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The pretty name has no `/` separating vendor and project.
    #[error("package name {pretty_name} is not in vendor/project form")]
    MalformedPrettyName {
        /// The offending pretty name.
        pretty_name: String,
    },

    /// A field required by the selected strategy is absent.
    #[error("extra.artifacts.{field} is required {context}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
        /// Short description of why the field is required.
        context: &'static str,
    },

    /// The `extra.artifacts` block could not be decoded.
    #[error("extra.artifacts is malformed: {reason}")]
    MalformedBlock {
        /// Description of the decoding failure.
        reason: String,
    },
}

/// Errors that abort resolution of a single package.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The configuration or package metadata is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `extra.artifacts.source` names a strategy this crate does not know.
    #[error("unsupported artefact source {value}")]
    UnsupportedSource {
        /// The expanded `source` value.
        value: String,
    },

    /// The release exists but has no asset with the requested file name.
    #[error("release {tag} of {repo} has no asset named {file}")]
    AssetNotFound {
        /// Repository in `owner/name` form.
        repo: String,
        /// Release tag.
        tag: String,
        /// Asset file name that was searched for.
        file: String,
    },

    /// The release lookup failed in transport or decoding.
    #[error(transparent)]
    Lookup(#[from] ReleaseLookupError),
}

/// Convenience alias for resolution results.
pub type Result<T> = std::result::Result<T, ResolveError>;
