use shared::domain::CustomerId;
use thiserror::Error;

use crate::field_path::FieldPathError;
use crate::service::Operation;

/// Failure reported by a [`crate::CustomerService`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to {route} failed: {reason}")]
    Transport { route: String, reason: String },
    #[error("remote store answered {status} for {route}: {reason}")]
    Status {
        route: String,
        status: u16,
        reason: String,
    },
    #[error("unexpected response body from {route}: {reason}")]
    Decode { route: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("'{input}' is not a valid customer id")]
    InvalidId { input: String },
    #[error(transparent)]
    FieldPath(#[from] FieldPathError),
    #[error("{action} is not available at step {step}")]
    StepUnavailable { action: String, step: u8 },
    #[error("no customer draft is held")]
    NoDraft,
    #[error("draft has no customer id; only persisted customers can be updated")]
    Unsaved,
    #[error("customer {id} not found")]
    NotFound { id: CustomerId },
    #[error("{operation} failed: {source}")]
    Remote {
        operation: Operation,
        #[source]
        source: ServiceError,
    },
}

impl WorkflowError {
    pub fn step_unavailable(action: impl Into<String>, step: u8) -> Self {
        Self::StepUnavailable {
            action: action.into(),
            step,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidId { .. }
            | Self::FieldPath(_)
            | Self::StepUnavailable { .. }
            | Self::NoDraft
            | Self::Unsaved => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Remote { .. } => ErrorCategory::Remote,
        }
    }

    /// Short user-facing text for the notice shown by the host.
    pub fn notice(&self) -> String {
        match self {
            Self::InvalidId { .. } => "Please enter a valid customer id.".to_string(),
            Self::NotFound { .. } => "No customer found with this id.".to_string(),
            Self::Remote { operation, .. } => format!("Could not {}. Please try again.", operation.verb()),
            other => other.to_string(),
        }
    }
}
