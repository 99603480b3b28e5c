use serde::{Deserialize, Serialize};

use crate::context::WorkflowContext;
use crate::error::ActionError;
use crate::field::FieldDefinition;

/// Title, group and description shown in the workflow editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDetails {
    pub title: String,
    pub group: String,
    pub description: String,
}

/// Result of running an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied { summary: String },
    /// The workflow data did not allow the action to do anything.
    NotApplicable { reason: String },
}

/// An action the automation engine can run as a workflow step.
///
/// Actions are fire-and-forget: a workflow whose data does not fit the action
/// gets `Ok(ActionOutcome::NotApplicable)`, not an error. Retrying is the
/// engine's business.
pub trait Action: Send + Sync {
    fn details(&self) -> ActionDetails;

    fn fields(&self) -> Vec<FieldDefinition>;

    /// Data items the trigger must supply (e.g. `"subscription"`).
    fn required_data_items(&self) -> &'static [&'static str];

    fn run(&self, context: &WorkflowContext) -> Result<ActionOutcome, ActionError>;
}
