//! Command-line front end for `artifact-install`.
//!
//! Reads a Composer package or lock file, runs the pre-download hook for
//! each package and reports where its dist download would be redirected.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Errors that end a run
//! - [`run`] - Command execution

pub mod cli;
pub mod error;
pub mod run;
