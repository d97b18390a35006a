//! Command execution.
//!
//! Commands write results to `stdout` and progress to `stderr`, both passed
//! in so tests can capture them.

use std::io::Write;

use artifact_install::composer::{ComposerDocument, ComposerPackage};
use artifact_install::github::{HttpReleaseClient, ReleaseClient};
use artifact_install::plugin::{ArtefactPlugin, PreDownloadOutcome};
use artifact_install::resolver::ArtefactResolver;
use artifact_install::settings::ResolverSettings;
use artifact_install::tokens::TokenSet;
use camino::Utf8Path;

use crate::cli::{Cli, Command, ResolveArgs, TokensArgs};
use crate::error::{CliError, Result};

/// Run the parsed command line.
///
/// # Errors
///
/// Returns the first [`CliError`] met; nothing after it is attempted.
pub fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Resolve(args) => {
            let settings = load_settings(args.settings.as_deref())?;
            let client = HttpReleaseClient::new(&settings.github);
            resolve(args, &client, stdout, stderr)
        }
        Command::Tokens(args) => tokens(args, stdout),
    }
}

/// Resolve the selected packages through `client`.
///
/// Each redirected package prints `<pretty_name> <url> <type>` on
/// `stdout`; packages without an artefact block are reported on `stderr`
/// unless quiet.
///
/// # Errors
///
/// Returns an error when the document cannot be read or a package fails
/// to resolve.
pub fn resolve<C: ReleaseClient>(
    args: &ResolveArgs,
    client: &C,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let document = read_document(&args.file)?;
    let packages = match &args.package {
        Some(name) => vec![document.find(name)?],
        None => document.packages().iter().collect(),
    };

    let plugin = ArtefactPlugin::new(ArtefactResolver::new(client));
    for package in packages {
        let mut event = package.download_event();
        let outcome = plugin
            .on_pre_download(&mut event)
            .map_err(|source| CliError::Resolve {
                package: package.name.clone(),
                source,
            })?;
        match outcome {
            PreDownloadOutcome::Redirected(resolved) => {
                writeln!(
                    stdout,
                    "{} {} {}",
                    package.name,
                    event.processed_url(),
                    resolved.archive_type
                )
                .map_err(CliError::Output)?;
            }
            PreDownloadOutcome::Untouched | PreDownloadOutcome::NotAPackage => {
                if !args.quiet {
                    write_stderr_line(
                        stderr,
                        format!("{}: no extra.artifacts, left untouched", package.name),
                    );
                }
            }
        }
    }
    Ok(())
}

/// Print the token table for one package.
///
/// # Errors
///
/// Returns an error when the document cannot be read, the package cannot
/// be selected, or its pretty name has no vendor separator.
pub fn tokens(args: &TokensArgs, stdout: &mut dyn Write) -> Result<()> {
    let document = read_document(&args.file)?;
    let package = select_one(&document, args)?;
    let tokens = TokenSet::from_package(&package.descriptor())?;
    for (token, value) in tokens.iter() {
        writeln!(stdout, "{:<16} {value}", token.placeholder()).map_err(CliError::Output)?;
    }
    Ok(())
}

fn select_one<'a>(
    document: &'a ComposerDocument,
    args: &TokensArgs,
) -> Result<&'a ComposerPackage> {
    if let Some(name) = &args.package {
        return Ok(document.find(name)?);
    }
    match document.packages() {
        [only] => Ok(only),
        many => Err(CliError::PackageRequired {
            file: args.file.clone(),
            count: many.len(),
        }),
    }
}

fn load_settings(path: Option<&Utf8Path>) -> Result<ResolverSettings> {
    let settings = match path {
        Some(path) => ResolverSettings::load(path)?,
        None => ResolverSettings::default(),
    };
    Ok(settings.with_env_token()?)
}

fn read_document(path: &Utf8Path) -> Result<ComposerDocument> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(ComposerDocument::from_json(&text)?)
}

/// Write a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
