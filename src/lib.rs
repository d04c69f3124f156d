//! Core library for the `mailtask` CLI: file email messages as Notion tasks.
//!
//! The task core (`chunk`, `cache`, `catalog`, `record`, `settings`,
//! `workflow`) reaches the outside world only through the traits in
//! [`ports`]; [`context::ServiceContext`] wires them to adapters.

pub mod adapters;
pub mod cache;
pub mod catalog;
pub mod chunk;
pub mod cli;
pub mod commands;
pub mod context;
pub mod email;
pub mod error;
pub mod logging;
pub mod ports;
pub mod record;
pub mod settings;
pub mod workflow;

use clap::Parser;

pub use error::{Error, Result};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["mailtask", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_subcommand() {
        let result = run(["mailtask"]);
        assert!(result.is_err());
    }
}
