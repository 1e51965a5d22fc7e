//! Step Engine - workflow step graphs for Gantry
//!
//! This crate models an automation workflow as a directed graph of
//! steps with pass/fail branching and provides the editing operations
//! an interactive builder needs:
//!
//! - `StepGraph`: insertion-ordered store of steps, the single source
//!   of truth for graph content
//! - `WorkflowEditor`: the command gateway every editing gesture
//!   funnels through
//! - `ParameterFlowIndex`: derived index of upstream parameters a
//!   downstream step may bind its inputs to
//! - structural validation and the persisted document types
//!
//! Rendering and transport live elsewhere; this crate holds only the
//! model and its invariants.
//!
//! # Example
//!
//! ```
//! use step_engine::{EdgeKind, Position, StepTemplate, StepType, WorkflowEditor};
//!
//! let mut editor = WorkflowEditor::new();
//! let template = StepTemplate {
//!     operation: "ops/copy-files".to_string(),
//!     step_type: StepType::Script,
//!     friendly_name: "Copy Files".to_string(),
//!     input_groups: Vec::new(),
//!     output: Vec::new(),
//! };
//! let step = editor.create_step(&template, Position::new(200.0, 150.0))?;
//! editor.connect("Start", &step.id, EdgeKind::Pass)?;
//! editor.connect(&step.id, "End", EdgeKind::Pass)?;
//! # Ok::<(), step_engine::GraphError>(())
//! ```

pub mod editor;
pub mod error;
pub mod graph;
pub mod params;
pub mod types;
pub mod validation;

// Re-export key types
pub use editor::WorkflowEditor;
pub use error::{GraphError, Result};
pub use graph::StepGraph;
pub use params::{ParamOption, ParameterFlowIndex};
pub use types::{
    DocumentBody, EdgeKind, FieldKind, InputField, InputGroup, InputSource, NextSteps,
    OutputField, Position, Step, StepId, StepTemplate, StepType, WorkflowDocument, WorkflowState,
    END_STEP, IMPLICIT_OUTPUTS, START_STEP,
};
pub use validation::{validate_graph, ValidationError};
