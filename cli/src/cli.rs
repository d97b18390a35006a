//! CLI argument definitions.
//!
//! Kept apart from the entrypoint so parsing can be tested without running
//! any command.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Resolve package dist downloads to their declared artefacts.
#[derive(Parser, Debug)]
#[command(name = "artifact-install")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Resolve every configured package in a lock file:\n",
    "    $ artifact-install resolve composer.lock\n\n",
    "  Resolve one package with a GitHub Enterprise settings file:\n",
    "    $ artifact-install resolve composer.lock -p acme/widget --settings ghe.toml\n\n",
    "  Show the template tokens for a package:\n",
    "    $ artifact-install tokens composer.lock -p acme/widget\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved download for packages declaring `extra.artifacts`.
    Resolve(ResolveArgs),

    /// Print the template tokens derived from a package.
    Tokens(TokensArgs),
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Package JSON or `composer.lock` file.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Resolve only this package (case-insensitive).
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,

    /// TOML settings file for GitHub API access.
    #[arg(short, long, value_name = "PATH")]
    pub settings: Option<Utf8PathBuf>,

    /// Do not report packages that were left untouched.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the tokens command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TokensArgs {
    /// Package JSON or `composer.lock` file.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Package to describe; required when the file holds several.
    #[arg(short, long, value_name = "NAME")]
    pub package: Option<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
