//! Gantry editor service - session, diagram and service plumbing
//!
//! Everything the interactive workflow builder needs around the
//! `step_engine` model: the per-workflow `EditorSession` lifecycle, the
//! diagram projection kept in step with the graph, alerts and
//! validation overlays, library tree reconciliation, and the package
//! import/export format. Transport stays behind the
//! `WorkflowServiceClient` and `LibraryServiceClient` traits so hosts
//! plug in their own stack; the queued clients serve tests.
//!
//! # Example
//!
//! ```
//! use gantry_editor_service::EditorSession;
//! use gantry_workflow_contracts::SaveResponse;
//! use step_engine::{DocumentBody, StepGraph, WorkflowDocument, WorkflowState};
//!
//! let document = WorkflowDocument {
//!     id: "wf-1".to_string(),
//!     state: WorkflowState::Draft,
//!     document: DocumentBody {
//!         name: "Provision Host".to_string(),
//!         description: None,
//!         steps: StepGraph::new().to_steps(),
//!     },
//! };
//! let mut session = EditorSession::open(document)?;
//! let request = session.begin_save();
//! assert_eq!(request.workflow_id, "wf-1");
//! session.complete_save(Ok(SaveResponse { state: WorkflowState::Draft }));
//! assert_eq!(session.state(), WorkflowState::Draft);
//! # Ok::<(), gantry_editor_service::ServiceError>(())
//! ```

pub mod alerts;
pub mod client;
pub mod diagram;
pub mod error;
pub mod library;
pub mod package;
pub mod session;

// Re-export key types
pub use alerts::{Alert, AlertSeverity, StepAnnotations, ValidationOverlay};
pub use client::{
    LibraryServiceClient, QueuedLibraryClient, QueuedWorkflowClient, RecordedRequest,
    WorkflowServiceClient,
};
pub use diagram::{
    CanvasTransform, Diagram, DiagramEdge, DiagramNode, DiagramSync, IdentityTransform, NodeShape,
    PannedZoomTransform, StepIcon,
};
pub use error::{Result, ServiceError};
pub use library::{
    create_entry, delete_entry, rename_entry, CreateOutcome, DeleteOutcome, RenameOutcome,
};
pub use package::{
    export_package, import_package, Package, PackageError, PACKAGE_METADATA_FILE, WORKFLOWS_DIR,
};
pub use session::{EditorSession, Handoff};
