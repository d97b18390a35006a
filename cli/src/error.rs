//! Error types for the command-line front end.

use artifact_install::composer::ComposerError;
use artifact_install::error::{ConfigError, ResolveError};
use artifact_install::settings::SettingsError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the input document.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input document is not Composer metadata.
    #[error(transparent)]
    Composer(#[from] ComposerError),

    /// The settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A package's metadata cannot be turned into tokens.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Resolution failed for a package.
    #[error("failed to resolve {package}: {source}")]
    Resolve {
        /// Pretty name of the package.
        package: String,
        /// The resolution error.
        source: ResolveError,
    },

    /// `--package` was omitted for a document holding several packages.
    #[error("{file} holds {count} packages; select one with --package")]
    PackageRequired {
        /// Path of the input document.
        file: Utf8PathBuf,
        /// Number of packages in the document.
        count: usize,
    },

    /// Results could not be written.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

/// A specialised `Result` type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
