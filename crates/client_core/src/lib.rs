//! Client-side core of the customer records app: stepped dialogs that draft,
//! load and submit customers against a remote store.

pub mod draft;
pub mod error;
pub mod field_path;
pub mod host;
pub mod listing;
pub mod service;
pub mod steps;
pub mod workflows;

pub use draft::{Commit, CommitOutcome, DraftStatus, DraftStore, LoadOutcome, LoadTicket};
pub use error::{ErrorCategory, ServiceError, WorkflowError};
pub use field_path::{AddressField, CustomerField, FieldPath, FieldPathError, PhoneField, Section};
pub use host::{Dialog, DialogHost};
pub use listing::{CustomerList, DEFAULT_PAGE_SIZE};
pub use service::{CustomerService, HttpCustomerService, Operation};
pub use steps::{Step, StepBounds, StepController, StepTransition};
pub use workflows::{
    parse_customer_id, CreateStep, CreateWorkflow, DeleteStep, DeleteWorkflow, LookupStep,
    LookupWorkflow, UpdateStep, UpdateWorkflow, Workflow, WorkflowKind,
};

#[cfg(test)]
#[path = "tests/fake_service.rs"]
pub(crate) mod fake_service;
