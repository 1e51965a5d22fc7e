//! Error types for the step engine

use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while editing a step graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// A step id was not found in the graph
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// A step with this id already exists
    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    /// Attempted to connect a step to itself
    #[error("Step '{0}' cannot connect to itself")]
    SelfEdge(String),

    /// Attempted to create or remove a boundary step
    #[error("Boundary step '{0}' cannot be created or removed")]
    BoundaryStep(String),

    /// The Start step only has a pass branch
    #[error("The Start step has no fail branch")]
    StartFailEdge,

    /// The Start step accepts no inbound edges
    #[error("The Start step cannot be a connection target")]
    StartTarget,

    /// The End step has no outward branches
    #[error("The End step cannot be a connection source")]
    EndSource,

    /// A loaded document is missing a boundary step
    #[error("Document is missing required step '{0}'")]
    MissingBoundary(&'static str),

    /// An input parameter was not found on a step
    #[error("Step '{step}' has no input '{input}'")]
    UnknownInput { step: String, input: String },
}

impl GraphError {
    /// Create an unknown-step error
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownStep(id.into())
    }
}
