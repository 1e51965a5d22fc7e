//! Error types for the editor services

use gantry_workflow_contracts::ServiceFailure;
use step_engine::WorkflowState;
use thiserror::Error;

/// Result type alias using ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors from editor application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend rejected the operation
    #[error("Service rejected the request: {}", .details.as_deref().unwrap_or("no detail supplied"))]
    Rejected { details: Option<String> },

    /// The backend could not be reached
    #[error("Service call failed: {0}")]
    Transport(String),

    /// A graph operation was invalid
    #[error(transparent)]
    Graph(#[from] step_engine::GraphError),

    /// A lifecycle operation was started from the wrong state
    #[error("Operation not allowed while workflow is {0:?}")]
    WrongState(WorkflowState),
}

impl ServiceError {
    /// Wrap a failure body from the backend
    pub fn rejected(failure: ServiceFailure) -> Self {
        Self::Rejected {
            details: failure.details,
        }
    }

    /// Create a transport error with a message
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Detail text suitable for a user-facing alert
    pub fn alert_detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { details } => details.as_deref(),
            _ => None,
        }
    }
}
