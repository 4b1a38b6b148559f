use std::sync::Arc;

use shared::domain::Customer;
use tracing::info;

use super::{ensure_section, Workflow, WorkflowKind};
use crate::{
    draft::{Commit, CommitOutcome, DraftStore},
    error::WorkflowError,
    field_path::{FieldPath, Section},
    service::CustomerService,
    steps::{Step, StepBounds, StepController, StepTransition},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStep {
    PersonalInfo,
    Phone,
    Address,
}

impl CreateStep {
    fn from_step(step: Step) -> Self {
        match step {
            1 => Self::PersonalInfo,
            2 => Self::Phone,
            _ => Self::Address,
        }
    }

    fn section(self) -> Section {
        match self {
            Self::PersonalInfo => Section::Personal,
            Self::Phone => Section::Phone,
            Self::Address => Section::Address,
        }
    }
}

pub struct CreateWorkflow {
    service: Arc<dyn CustomerService>,
    steps: StepController,
    draft: DraftStore,
}

impl CreateWorkflow {
    pub const STEPS: StepBounds = StepBounds::sequential(3);

    pub fn new(service: Arc<dyn CustomerService>) -> Self {
        let mut draft = DraftStore::new();
        draft.seed(Customer::blank());
        Self {
            service,
            steps: StepController::new(Self::STEPS),
            draft,
        }
    }

    pub fn step(&self) -> CreateStep {
        CreateStep::from_step(self.steps.current())
    }

    pub fn draft(&self) -> Option<&Customer> {
        self.draft.record()
    }

    pub fn change(&mut self, path: FieldPath, value: &str) -> Result<bool, WorkflowError> {
        ensure_section(path, Some(self.step().section()), self.steps.current())?;
        Ok(self.draft.apply_change(path, value))
    }

    pub fn change_named(&mut self, name: &str, value: &str) -> Result<bool, WorkflowError> {
        let path: FieldPath = name.parse()?;
        self.change(path, value)
    }

    pub fn next(&mut self) -> Result<StepTransition, WorkflowError> {
        Ok(self.steps.advance())
    }

    /// Registers the drafted customer. Only offered on the address step.
    pub async fn submit(&mut self) -> Result<Option<Customer>, WorkflowError> {
        if !self.steps.is_last() {
            return Err(WorkflowError::step_unavailable("submit", self.steps.current()));
        }
        let outcome = self
            .draft
            .commit(self.service.as_ref(), Commit::Create)
            .await?;
        let created = match outcome {
            CommitOutcome::Created(created) => created,
            CommitOutcome::Updated | CommitOutcome::Deleted(_) => None,
        };
        info!(
            customer_id = created.as_ref().and_then(|c| c.id).map(|id| id.0),
            "create: customer registered"
        );
        self.close();
        Ok(created)
    }
}

impl Workflow for CreateWorkflow {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::Create
    }

    fn current_step(&self) -> Step {
        self.steps.current()
    }

    fn back(&mut self) -> StepTransition {
        self.steps.retreat()
    }

    fn close(&mut self) {
        self.steps.reset();
        self.draft.seed(Customer::blank());
    }
}
