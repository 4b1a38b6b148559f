use std::sync::Arc;

use shared::domain::CustomerId;
use tracing::info;

use super::{parse_customer_id, Workflow, WorkflowKind};
use crate::{
    draft::{Commit, DraftStore},
    error::WorkflowError,
    service::CustomerService,
    steps::{Step, StepBounds, StepController, StepTransition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    EnterId,
    Confirm,
}

/// Two-phase delete: the id step only arms the dialog, nothing is sent until
/// [`DeleteWorkflow::confirm`] is called on the confirmation step.
pub struct DeleteWorkflow {
    service: Arc<dyn CustomerService>,
    steps: StepController,
    draft: DraftStore,
    id_input: String,
    pending: Option<CustomerId>,
}

impl DeleteWorkflow {
    pub const STEPS: StepBounds = StepBounds::with_lookup(2);

    pub fn new(service: Arc<dyn CustomerService>) -> Self {
        Self {
            service,
            steps: StepController::new(Self::STEPS),
            draft: DraftStore::new(),
            id_input: String::new(),
            pending: None,
        }
    }

    pub fn step(&self) -> DeleteStep {
        if self.steps.is_lookup() {
            DeleteStep::EnterId
        } else {
            DeleteStep::Confirm
        }
    }

    pub fn set_id_input(&mut self, input: impl Into<String>) {
        self.id_input = input.into();
    }

    pub fn id_input(&self) -> &str {
        &self.id_input
    }

    /// Id awaiting confirmation, set once the id step has been accepted.
    pub fn pending_id(&self) -> Option<CustomerId> {
        self.pending
    }

    pub fn next(&mut self) -> Result<StepTransition, WorkflowError> {
        if !self.steps.is_lookup() {
            return Ok(StepTransition::Unchanged);
        }
        let id = parse_customer_id(&self.id_input)?;
        self.pending = Some(id);
        Ok(self.steps.advance())
    }

    pub async fn confirm(&mut self) -> Result<CustomerId, WorkflowError> {
        let step = self.steps.current();
        let (DeleteStep::Confirm, Some(id)) = (self.step(), self.pending) else {
            return Err(WorkflowError::step_unavailable("confirm", step));
        };
        self.draft
            .commit(self.service.as_ref(), Commit::Delete(id))
            .await?;
        info!(customer_id = id.0, "delete: customer removed");
        self.close();
        Ok(id)
    }
}

impl Workflow for DeleteWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::Delete
    }

    fn current_step(&self) -> Step {
        self.steps.current()
    }

    fn back(&mut self) -> StepTransition {
        let transition = self.steps.retreat();
        if let StepTransition::ReturnedToLookup { .. } = transition {
            self.pending = None;
            self.draft.clear();
        }
        transition
    }

    fn close(&mut self) {
        self.steps.reset();
        self.draft.clear();
        self.id_input.clear();
        self.pending = None;
    }
}
