//! In-memory draft of the customer being created or edited.

use shared::domain::{Customer, CustomerId};
use tracing::{debug, info, warn};

use crate::{
    error::{ServiceError, WorkflowError},
    field_path::{self, FieldPath},
    service::{CustomerService, Operation},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftStatus {
    #[default]
    Empty,
    Loading,
    Loaded,
    Dirty,
}

/// Handed out by [`DraftStore::begin_load`]. A ticket issued before the last
/// `clear()` no longer matches the store and its result is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    id: CustomerId,
}

impl LoadTicket {
    pub fn id(&self) -> CustomerId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Create,
    Update,
    Delete(CustomerId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Created(Option<Customer>),
    Updated,
    Deleted(CustomerId),
}

#[derive(Debug, Default)]
pub struct DraftStore {
    record: Option<Customer>,
    status: DraftStatus,
    generation: u64,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn record(&self) -> Option<&Customer> {
        self.record.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    /// Installs a locally built draft, e.g. the blank registration form.
    pub fn seed(&mut self, record: Customer) {
        self.generation += 1;
        self.record = Some(record);
        self.status = DraftStatus::Loaded;
    }

    pub fn begin_load(&mut self, id: CustomerId) -> LoadTicket {
        self.generation += 1;
        self.record = None;
        self.status = DraftStatus::Loading;
        LoadTicket {
            generation: self.generation,
            id,
        }
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<Customer>, ServiceError>,
    ) -> Result<LoadOutcome, WorkflowError> {
        if ticket.generation != self.generation || self.status != DraftStatus::Loading {
            debug!(customer_id = ticket.id.0, "draft: discarding stale load result");
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(Some(customer)) => {
                info!(customer_id = ticket.id.0, "draft: customer loaded");
                self.record = Some(customer);
                self.status = DraftStatus::Loaded;
                Ok(LoadOutcome::Applied)
            }
            Ok(None) => {
                info!(customer_id = ticket.id.0, "draft: customer not found");
                self.status = DraftStatus::Empty;
                Err(WorkflowError::NotFound { id: ticket.id })
            }
            Err(source) => {
                warn!(customer_id = ticket.id.0, error = %source, "draft: fetch failed");
                self.status = DraftStatus::Empty;
                Err(WorkflowError::Remote {
                    operation: Operation::FetchCustomer,
                    source,
                })
            }
        }
    }

    pub async fn load(
        &mut self,
        service: &dyn CustomerService,
        id: CustomerId,
    ) -> Result<LoadOutcome, WorkflowError> {
        let ticket = self.begin_load(id);
        let result = service.fetch_customer(id).await;
        self.finish_load(ticket, result)
    }

    /// Routes one field change into the draft. Returns whether anything was
    /// written; an empty store or a missing phone slot ignores the change.
    pub fn apply_change(&mut self, path: FieldPath, value: &str) -> bool {
        let Some(record) = self.record.as_mut() else {
            return false;
        };
        if !field_path::apply(record, path, value) {
            debug!(%path, "draft: change ignored, slot does not exist");
            return false;
        }
        self.status = DraftStatus::Dirty;
        true
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.record = None;
        self.status = DraftStatus::Empty;
    }

    /// Sends the draft to the remote store. Failures keep the draft so the
    /// same commit can be retried.
    pub async fn commit(
        &mut self,
        service: &dyn CustomerService,
        commit: Commit,
    ) -> Result<CommitOutcome, WorkflowError> {
        let outcome = match commit {
            Commit::Create => {
                let record = self.record.as_ref().ok_or(WorkflowError::NoDraft)?;
                service
                    .create_customer(record)
                    .await
                    .map(CommitOutcome::Created)
                    .map_err(|source| (Operation::CreateCustomer, source))
            }
            Commit::Update => {
                let record = self.record.as_ref().ok_or(WorkflowError::NoDraft)?;
                if !record.is_persisted() {
                    return Err(WorkflowError::Unsaved);
                }
                service
                    .update_customer(record)
                    .await
                    .map(|()| CommitOutcome::Updated)
                    .map_err(|source| (Operation::UpdateCustomer, source))
            }
            Commit::Delete(id) => service
                .delete_customer(id)
                .await
                .map(|()| CommitOutcome::Deleted(id))
                .map_err(|source| (Operation::DeleteCustomer, source)),
        };

        match outcome {
            Ok(outcome) => {
                info!(?commit, "draft: commit accepted");
                self.clear();
                Ok(outcome)
            }
            Err((operation, source)) => {
                warn!(%operation, error = %source, "draft: commit failed, keeping draft");
                Err(WorkflowError::Remote { operation, source })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
