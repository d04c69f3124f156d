//! Command dispatch and handlers.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod create;
pub mod projects;

use std::env;
use std::path::PathBuf;

use crate::adapters::live::ConsoleMailbox;
use crate::cli::{Command, ConfigCommand};
use crate::context::ServiceContext;

/// Environment variable naming the state directory.
pub const HOME_ENV: &str = "MAILTASK_HOME";
/// State directory used when [`HOME_ENV`] is unset.
pub const DEFAULT_HOME: &str = ".mailtask";

/// Dispatch a parsed command to its handler against live adapters.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let mut ctx = ServiceContext::live(&home_dir());
    if let Command::Create(args) = command {
        ctx.mailbox = Box::new(ConsoleMailbox::with_message(args.message(ctx.clock.now())));
    }
    dispatch_with_context(command, &ctx)
}

/// Dispatch a command with the given service context.
///
/// Async handlers run on a current-thread runtime built per call.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    match command {
        Command::Config(ConfigCommand::Set(args)) => config::set(ctx, args),
        Command::Config(ConfigCommand::Show) => config::show(ctx),
        Command::Config(ConfigCommand::Clear) => config::clear(ctx),
        Command::Config(ConfigCommand::Check) => runtime.block_on(config::check(ctx)),
        Command::Catalog { refresh } => runtime.block_on(catalog::run(ctx, *refresh)),
        Command::Projects { system } => runtime.block_on(projects::run(ctx, system)),
        Command::Create(args) => runtime.block_on(create::run(ctx, args)),
        Command::Cache(_) => cache::clear(ctx),
    }
}

fn home_dir() -> PathBuf {
    env::var_os(HOME_ENV).map_or_else(|| PathBuf::from(DEFAULT_HOME), PathBuf::from)
}

/// Fails with a hint when the stored settings lack what remote calls need.
fn ensure_configured(ctx: &ServiceContext) -> Result<(), String> {
    if ctx.settings.is_complete() {
        Ok(())
    } else {
        Err("Notion is not configured. Run `mailtask config set` with a token and the planning, \
             tasks and systems database ids."
            .to_string())
    }
}

/// Prints `rows` as left-aligned columns under `headers`.
fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(headers));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in rows {
        println!("{}", render(&row.iter().map(String::as_str).collect::<Vec<_>>()));
    }
}
