//! CLI argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::ports::MessageContext;

/// Top-level CLI parser for `mailtask`.
#[derive(Debug, Parser)]
#[command(name = "mailtask", version, about = "Turn email messages into Notion tasks")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the stored Notion settings.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// List systems, task types and themes.
    Catalog {
        /// Ignore the local cache and reload from Notion.
        #[arg(long)]
        refresh: bool,
    },
    /// List the projects of a system.
    Projects {
        /// System page id.
        system: String,
    },
    /// Create a task from an email message.
    Create(Box<CreateArgs>),
    /// Manage the local catalog cache.
    #[command(subcommand)]
    Cache(CacheCommand),
}

/// `config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Store settings; omitted flags keep their current value.
    Set(ConfigSetArgs),
    /// Print the stored settings with secrets masked.
    Show,
    /// Delete the stored settings.
    Clear,
    /// Check that the configured databases are reachable.
    Check,
}

/// Flags for `config set`.
#[derive(Debug, Default, Args)]
pub struct ConfigSetArgs {
    /// Notion integration token.
    #[arg(long)]
    pub notion_token: Option<String>,
    /// Planning database id.
    #[arg(long)]
    pub planning_db: Option<String>,
    /// Tasks database id.
    #[arg(long)]
    pub tasks_db: Option<String>,
    /// Systems database id.
    #[arg(long)]
    pub systems_db: Option<String>,
    /// Projects database id.
    #[arg(long)]
    pub projects_db: Option<String>,
    /// Todoist API token.
    #[arg(long)]
    pub todoist_token: Option<String>,
    /// Default Todoist project.
    #[arg(long)]
    pub todoist_project: Option<String>,
}

/// `cache` subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Delete the cached catalog and project lists.
    Clear,
}

/// Flags for `create`: the message being filed and the task fields.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Message subject.
    #[arg(long)]
    pub subject: String,
    /// Sender address.
    #[arg(long)]
    pub sender: String,
    /// Mail item id, used for the deep link.
    #[arg(long)]
    pub item_id: String,
    /// When the message was received (RFC 3339); defaults to now.
    #[arg(long)]
    pub received: Option<DateTime<Utc>>,
    /// Recipient, repeatable.
    #[arg(long = "to")]
    pub recipients: Vec<String>,
    /// File holding the message body; `-` reads stdin.
    #[arg(long)]
    pub body: Option<PathBuf>,
    /// File holding an HTML message body, converted to markdown; `-` reads stdin.
    #[arg(long, conflicts_with = "body")]
    pub body_html: Option<PathBuf>,
    /// Task title; defaults to `SENDER - subject`.
    #[arg(long)]
    pub title: Option<String>,
    /// System page id.
    #[arg(long)]
    pub system: String,
    /// Task type.
    #[arg(long = "type")]
    pub task_type: String,
    /// Task theme.
    #[arg(long)]
    pub theme: String,
    /// Project page id.
    #[arg(long)]
    pub project: Option<String>,
    /// Next steps.
    #[arg(long)]
    pub next_steps: Option<String>,
    /// Expected result.
    #[arg(long)]
    pub expected_result: Option<String>,
    /// Also create a record in the tasks database.
    #[arg(long)]
    pub project_task: bool,
    /// Also add the task to the Todoist list.
    #[arg(long)]
    pub todoist: bool,
}

impl CreateArgs {
    /// The message described by the flags; `now` stands in for a missing `--received`.
    #[must_use]
    pub fn message(&self, now: DateTime<Utc>) -> MessageContext {
        MessageContext {
            subject: self.subject.clone(),
            sender: self.sender.clone(),
            item_id: self.item_id.clone(),
            created_at: self.received.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_refresh() {
        let cli = Cli::parse_from(["mailtask", "catalog", "--refresh"]);
        assert!(matches!(cli.command, Command::Catalog { refresh: true }));
    }

    #[test]
    fn parses_config_set_flags() {
        let cli = Cli::parse_from(["mailtask", "config", "set", "--planning-db", "abc"]);
        let Command::Config(ConfigCommand::Set(args)) = cli.command else {
            panic!("expected config set");
        };
        assert_eq!(args.planning_db.as_deref(), Some("abc"));
        assert!(args.notion_token.is_none());
    }

    #[test]
    fn parses_create_with_repeated_recipients() {
        let cli = Cli::parse_from([
            "mailtask", "create", "--subject", "Hi", "--sender", "a@b.c", "--item-id", "X",
            "--system", "s1", "--type", "Soporte", "--theme", "General", "--to", "x@y.z",
            "--to", "w@y.z", "--received", "2024-03-05T09:30:00Z", "--project-task",
        ]);
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.recipients, vec!["x@y.z", "w@y.z"]);
        assert_eq!(args.task_type, "Soporte");
        assert!(args.project_task);
        assert_eq!(args.message(Utc::now()).created_at.to_rfc3339(), "2024-03-05T09:30:00+00:00");
    }

    #[test]
    fn html_and_text_bodies_are_exclusive() {
        let result = Cli::try_parse_from([
            "mailtask", "create", "--subject", "Hi", "--sender", "a@b.c", "--item-id", "X",
            "--system", "s1", "--type", "Soporte", "--theme", "General", "--body", "a.txt",
            "--body-html", "a.html",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn create_requires_selections() {
        let result = Cli::try_parse_from(["mailtask", "create", "--subject", "Hi"]);
        assert!(result.is_err());
    }
}
