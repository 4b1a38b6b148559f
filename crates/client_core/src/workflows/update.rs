use std::sync::Arc;

use shared::domain::Customer;
use tracing::info;

use super::{ensure_section, search_by_id, Workflow, WorkflowKind};
use crate::{
    draft::{Commit, DraftStore},
    error::WorkflowError,
    field_path::{FieldPath, Section},
    service::CustomerService,
    steps::{Step, StepBounds, StepController, StepTransition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    EnterId,
    PersonalInfo,
    Phone,
    Address,
}

impl UpdateStep {
    fn from_step(step: Step) -> Self {
        match step {
            1 => Self::EnterId,
            2 => Self::PersonalInfo,
            3 => Self::Phone,
            _ => Self::Address,
        }
    }

    fn section(self) -> Option<Section> {
        match self {
            Self::EnterId => None,
            Self::PersonalInfo => Some(Section::Personal),
            Self::Phone => Some(Section::Phone),
            Self::Address => Some(Section::Address),
        }
    }
}

pub struct UpdateWorkflow {
    service: Arc<dyn CustomerService>,
    steps: StepController,
    draft: DraftStore,
    id_input: String,
}

impl UpdateWorkflow {
    pub const STEPS: StepBounds = StepBounds::with_lookup(4);

    pub fn new(service: Arc<dyn CustomerService>) -> Self {
        Self {
            service,
            steps: StepController::new(Self::STEPS),
            draft: DraftStore::new(),
            id_input: String::new(),
        }
    }

    pub fn step(&self) -> UpdateStep {
        UpdateStep::from_step(self.steps.current())
    }

    pub fn draft(&self) -> Option<&Customer> {
        self.draft.record()
    }

    pub fn draft_store(&self) -> &DraftStore {
        &self.draft
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

    pub fn change(&mut self, path: FieldPath, value: &str) -> Result<bool, WorkflowError> {
        ensure_section(path, self.step().section(), self.steps.current())?;
        Ok(self.draft.apply_change(path, value))
    }

    pub fn change_named(&mut self, name: &str, value: &str) -> Result<bool, WorkflowError> {
        let path: FieldPath = name.parse()?;
        self.change(path, value)
    }

    pub fn next(&mut self) -> Result<StepTransition, WorkflowError> {
        if self.steps.is_lookup() {
            return Err(WorkflowError::step_unavailable("next", self.steps.current()));
        }
        Ok(self.steps.advance())
    }

    /// Sends the edited customer. A failure keeps draft and step so the user
    /// can retry without retyping anything.
    pub async fn submit(&mut self) -> Result<(), WorkflowError> {
        if !self.steps.is_last() {
            return Err(WorkflowError::step_unavailable("submit", self.steps.current()));
        }
        let customer_id = self.draft.record().and_then(|c| c.id).map(|id| id.0);
        self.draft
            .commit(self.service.as_ref(), Commit::Update)
            .await?;
        info!(customer_id, "update: customer saved");
        self.close();
        Ok(())
    }
}

impl Workflow for UpdateWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::Update
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
