//! Redirects package dist downloads to artefacts declared by the package.
//!
//! A package opts in with an `extra.artifacts` block naming either a direct
//! URL template or a GitHub release asset. Before the host downloads the
//! package's dist archive, [`plugin::ArtefactPlugin`] expands the block's
//! templates against the package metadata, resolves the final location and
//! rewrites the download.
//!
//! ```json
//! {
//!     "extra": {
//!         "artifacts": {
//!             "source": "github-release-asset",
//!             "repo": "{name}",
//!             "tag": "{pretty-version}",
//!             "file": "{project-name}-{version}.tar.gz",
//!             "type": "tar"
//!         }
//!     }
//! }
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod github;
pub mod package;
pub mod plugin;
pub mod resolver;
pub mod settings;
pub mod tokens;

pub use config::{ArtefactConfig, ArtefactStrategy};
pub use error::{ConfigError, ResolveError};
pub use package::PackageDescriptor;
pub use plugin::{ArtefactPlugin, PreDownloadOutcome, PreFileDownloadEvent};
pub use resolver::{ArtefactResolver, ResolvedArtefact, Resolver};
