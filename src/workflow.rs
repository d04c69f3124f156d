//! Task creation workflow: validate, create the planning record, optionally
//! create the linked task record, then notify the host.
//!
//! Each submission is independent and nothing is retried. A failure after
//! the planning record exists is reported as [`Error::PartialCompletion`]
//! carrying that record's id; no compensating delete is attempted.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::catalog::CatalogClient;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::record::RecordId;

/// Message posted to the host once the records exist.
pub const SUCCESS_NOTICE: &str = "Task created successfully";

/// A task as filled in by the user, consumed by one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Selected system (page id).
    pub system_key: String,
    /// Selected project (page id), if any.
    pub project_key: Option<String>,
    /// Selected task type.
    pub type_key: String,
    /// Selected theme.
    pub theme_key: String,
    /// Free-text next steps.
    pub next_steps: Option<String>,
    /// Free-text expected result.
    pub expected_result: Option<String>,
    /// Deep link back to the source message.
    pub message_url: Option<String>,
    /// Also create a record in the tasks database.
    pub is_project_task: bool,
    /// Also add the task to the external to-do list.
    pub add_to_external_list: bool,
}

impl TaskDraft {
    /// Checks that the system, type and theme selections are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first empty selection.
    pub fn validate(&self) -> Result<()> {
        for (value, field) in
            [(&self.system_key, "system"), (&self.type_key, "type"), (&self.theme_key, "theme")]
        {
            if value.trim().is_empty() {
                return Err(Error::Validation { field });
            }
        }
        Ok(())
    }
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Identifier of this submission, as logged.
    pub submission_id: String,
    /// The planning record.
    pub primary: RecordId,
    /// The task record, when the draft was a project task.
    pub dependent: Option<RecordId>,
}

/// Runs task submissions against the context's ports.
pub struct TaskWorkflow<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TaskWorkflow<'a> {
    /// Creates a workflow over `ctx`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submits `draft`, attaching `body` to the planning record.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] before any remote call when a selection is empty.
    /// - The configuration or remote error of the planning create.
    /// - [`Error::PartialCompletion`] when the task create fails after the
    ///   planning record was created.
    pub async fn submit(&self, draft: &TaskDraft, body: &str) -> Result<TaskOutcome> {
        let submission_id = self.ctx.id_gen.generate_id();
        self.run(submission_id, draft, body).await
    }

    #[instrument(name = "submit_task", skip_all, fields(submission = %submission_id))]
    async fn run(&self, submission_id: String, draft: &TaskDraft, body: &str) -> Result<TaskOutcome> {
        draft.validate()?;

        let client = CatalogClient::new(self.ctx);
        let primary = client.create_primary_record(draft, body).await?;

        let dependent = if draft.is_project_task {
            match client.create_dependent_record(&primary, draft).await {
                Ok(id) => Some(id),
                Err(source) => {
                    warn!(planning = %primary, error = %source, "Task record failed after planning record");
                    return Err(Error::PartialCompletion { primary_id: primary, source: Box::new(source) });
                }
            }
        } else {
            None
        };

        // The external list link is recorded only; no list client exists.
        if draft.add_to_external_list {
            info!(
                configured = self.ctx.settings.todoist_token.is_some(),
                "External to-do list link requested; no list client is configured"
            );
        }

        if let Err(e) = self.ctx.mailbox.notify(SUCCESS_NOTICE) {
            warn!(error = %e, "Failed to post success notification");
        }

        info!(planning = %primary, task = ?dependent.as_ref().map(RecordId::as_str), "Task submitted");
        Ok(TaskOutcome { submission_id, primary, dependent })
    }
}
