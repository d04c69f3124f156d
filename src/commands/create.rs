//! `mailtask create` command.

use std::io::Read;
use std::path::Path;

use super::ensure_configured;
use crate::cli::CreateArgs;
use crate::context::ServiceContext;
use crate::email;
use crate::workflow::{TaskDraft, TaskWorkflow};

/// Files the open message as a task.
///
/// # Errors
///
/// Returns an error string if settings are incomplete, no message is open,
/// the body cannot be read, or the submission fails.
pub async fn run(ctx: &ServiceContext, args: &CreateArgs) -> Result<(), String> {
    ensure_configured(ctx)?;
    let message = ctx.mailbox.current_message()?;
    let content = match (&args.body, &args.body_html) {
        (Some(path), _) => read_body(path)?,
        (None, Some(path)) => email::html_to_markdown(&read_body(path)?),
        (None, None) => String::new(),
    };
    let body = email::format_details(&message, &args.recipients, &content);
    let draft = draft(args, &message);

    let outcome = TaskWorkflow::new(ctx).submit(&draft, &body).await.map_err(|e| e.to_string())?;

    println!("Planning record: {}", outcome.primary);
    if let Some(task) = &outcome.dependent {
        println!("Task record:     {task}");
    }
    Ok(())
}

fn draft(args: &CreateArgs, message: &crate::ports::MessageContext) -> TaskDraft {
    TaskDraft {
        title: args.title.clone().unwrap_or_else(|| email::default_title(message)),
        system_key: args.system.clone(),
        project_key: args.project.clone(),
        type_key: args.task_type.clone(),
        theme_key: args.theme.clone(),
        next_steps: args.next_steps.clone(),
        expected_result: args.expected_result.clone(),
        message_url: Some(email::message_url(&message.item_id)),
        is_project_task: args.project_task,
        add_to_external_list: args.todoist,
    }
}

fn read_body(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .map_err(|e| format!("Failed to read message body from stdin: {e}"))?;
        return Ok(body);
    }
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read message body {}: {e}", path.display()))
}
