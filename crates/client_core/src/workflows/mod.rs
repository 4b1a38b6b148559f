//! The four modal dialogs: register, look up, update and delete a customer.
//!
//! Each workflow owns a [`StepController`] and a [`DraftStore`] and talks to
//! the remote store through a shared [`CustomerService`]. Instances are built
//! when a dialog opens and dropped when it closes.

mod create;
mod delete;
mod lookup;
mod update;

pub use create::{CreateStep, CreateWorkflow};
pub use delete::{DeleteStep, DeleteWorkflow};
pub use lookup::{LookupStep, LookupWorkflow};
pub use update::{UpdateStep, UpdateWorkflow};

use shared::domain::CustomerId;

use crate::{
    draft::{DraftStore, LoadOutcome},
    error::WorkflowError,
    field_path::{FieldPath, Section},
    service::CustomerService,
    steps::{Step, StepController, StepTransition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Create,
    Lookup,
    Update,
    Delete,
}

impl WorkflowKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Create => "Register customer",
            Self::Lookup => "Find customer",
            Self::Update => "Update customer",
            Self::Delete => "Delete customer",
        }
    }
}

/// Operations every dialog offers regardless of its kind.
pub trait Workflow {
    fn kind(&self) -> WorkflowKind;
    fn current_step(&self) -> Step;
    fn back(&mut self) -> StepTransition;
    /// Returns to step 1 and forgets the draft and any typed-in id.
    fn close(&mut self);
}

/// Validates raw id input: a positive integer, surrounding blanks ignored.
pub fn parse_customer_id(input: &str) -> Result<CustomerId, WorkflowError> {
    match input.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(CustomerId(value)),
        _ => Err(WorkflowError::InvalidId {
            input: input.to_string(),
        }),
    }
}

fn ensure_section(
    path: FieldPath,
    section: Option<Section>,
    step: Step,
) -> Result<(), WorkflowError> {
    if section == Some(path.section()) {
        Ok(())
    } else {
        Err(WorkflowError::step_unavailable(format!("editing {path}"), step))
    }
}

/// Lookup step shared by the read and update dialogs: validate the id, load
/// the record, move on to the first display/edit step. Any failure lands the
/// dialog back on its lookup step with an empty draft.
async fn search_by_id(
    service: &dyn CustomerService,
    steps: &mut StepController,
    draft: &mut DraftStore,
    id_input: &str,
) -> Result<(), WorkflowError> {
    if !steps.is_lookup() {
        return Err(WorkflowError::step_unavailable("search", steps.current()));
    }
    let id = parse_customer_id(id_input)?;
    match draft.load(service, id).await {
        Ok(LoadOutcome::Applied) => {
            steps.advance();
            Ok(())
        }
        Ok(LoadOutcome::Discarded) => Ok(()),
        Err(err) => {
            steps.reset();
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "../tests/workflows_tests.rs"]
mod tests;
