//! Wire contracts for the Gantry workflow editor
//!
//! Request and response shapes exchanged with the backend: document
//! save/validate/publish/unpublish, library tree management, and the
//! workflow package interchange metadata. Transport is out of scope;
//! hosts pair these shapes with whatever client stack they run.

pub mod library;
pub mod package;
pub mod workflow;

// Re-export key types
pub use library::{
    CreateEntryRequest, CreatedEntry, DeleteEntryRequest, EntryKind, RenameEntryRequest,
};
pub use package::{PackageMetadata, PACKAGE_VERSION, SUPPORTED_VERSIONS};
pub use workflow::{
    GroupFindings, InputFindings, PublishRequest, PublishResponse, SaveRequest, SaveResponse,
    ServiceFailure, StepFindings, UnpublishRequest, UnpublishResponse, ValidateRequest,
    ValidationReport, ValidationResponse,
};
