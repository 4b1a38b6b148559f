use std::sync::Arc;

use shared::domain::Customer;

use super::{search_by_id, Workflow, WorkflowKind};
use crate::{
    draft::DraftStore,
    error::WorkflowError,
    service::CustomerService,
    steps::{Step, StepBounds, StepController, StepTransition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStep {
    EnterId,
    Display,
}

/// Read-only dialog: type an id, see the customer.
pub struct LookupWorkflow {
    service: Arc<dyn CustomerService>,
    steps: StepController,
    draft: DraftStore,
    id_input: String,
}

impl LookupWorkflow {
    pub const STEPS: StepBounds = StepBounds::with_lookup(2);

    pub fn new(service: Arc<dyn CustomerService>) -> Self {
        Self {
            service,
            steps: StepController::new(Self::STEPS),
            draft: DraftStore::new(),
            id_input: String::new(),
        }
    }

    pub fn step(&self) -> LookupStep {
        if self.steps.is_lookup() {
            LookupStep::EnterId
        } else {
            LookupStep::Display
        }
    }

    pub fn set_id_input(&mut self, input: impl Into<String>) {
        self.id_input = input.into();
    }

    pub fn id_input(&self) -> &str {
        &self.id_input
    }

    pub async fn search(&mut self) -> Result<(), WorkflowError> {
        search_by_id(
            self.service.as_ref(),
            &mut self.steps,
            &mut self.draft,
            &self.id_input,
        )
        .await
    }

    /// The customer on display; `None` while still on the id step.
    pub fn customer(&self) -> Option<&Customer> {
        match self.step() {
            LookupStep::Display => self.draft.record(),
            LookupStep::EnterId => None,
        }
    }

    pub fn next(&mut self) -> Result<StepTransition, WorkflowError> {
        if self.steps.is_lookup() {
            return Err(WorkflowError::step_unavailable("next", self.steps.current()));
        }
        Ok(self.steps.advance())
    }
}

impl Workflow for LookupWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::Lookup
    }

    fn current_step(&self) -> Step {
        self.steps.current()
    }

    fn back(&mut self) -> StepTransition {
        let transition = self.steps.retreat();
        if let StepTransition::ReturnedToLookup { .. } = transition {
            self.draft.clear();
            self.id_input.clear();
        }
        transition
    }

    fn close(&mut self) {
        self.steps.reset();
        self.draft.clear();
        self.id_input.clear();
    }
}
