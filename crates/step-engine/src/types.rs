//! Core types for workflow step graphs
//!
//! These types define the persisted structure of a workflow: the steps,
//! their input/output parameters, and the pass/fail wiring between them.
//! Field names follow the document format the workflow service consumes.

use serde::{Deserialize, Serialize};

/// Unique identifier for a step
pub type StepId = String;

/// Reserved id of the synthetic entry step
pub const START_STEP: &str = "Start";

/// Reserved id of the synthetic exit step
pub const END_STEP: &str = "End";

/// Outputs every executable step exposes even when its primitive declares none
pub const IMPLICIT_OUTPUTS: [&str; 3] =
    ["operation_output", "operation_error", "operation_returncode"];

/// The kind of primitive a step executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    /// Synthetic entry boundary
    Start,
    /// Synthetic exit boundary
    End,
    /// Shell script primitive
    Script,
    /// Ansible playbook run on the controller host
    LocalAnsible,
    /// Ansible playbook run on a remote host
    RemoteAnsible,
    /// Plain REST call
    Rest,
    /// REST call against the appliance API
    ViprRest,
    /// Reference to another published workflow
    WorkflowReference,
}

impl StepType {
    /// Whether this is one of the synthetic Start/End kinds
    pub fn is_boundary(&self) -> bool {
        matches!(self, StepType::Start | StepType::End)
    }
}

/// The two outward transition slots of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Taken when the step succeeds
    Pass,
    /// Taken when the step fails
    Fail,
}

/// A point on the editor canvas, in pixels at 1.0 zoom
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How an input parameter receives its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// Single value typed by the user at launch
    InputFromUser,
    /// Multiple values typed by the user at launch
    InputFromUserMulti,
    /// Single choice from an asset catalog
    AssetOptionSingle,
    /// Multiple choices from an asset catalog
    AssetOptionMulti,
    /// Bound to an upstream step's output parameter
    FromOtherStepOutput,
    /// Bound to an upstream step's input parameter
    FromOtherStepInput,
    /// Not collected
    Disabled,
}

impl InputSource {
    /// Whether this source binds to another step's parameter
    pub fn is_step_binding(&self) -> bool {
        matches!(
            self,
            InputSource::FromOtherStepOutput | InputSource::FromOtherStepInput
        )
    }
}

/// Widget/value type for user-supplied inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Password,
}

/// One configurable input parameter of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// Parameter name, unique within the step
    pub name: String,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// How the value is sourced at launch
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputSource>,
    /// Widget/value type for user-entered values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldKind>,
    /// Whether a value must be supplied
    #[serde(default = "default_required")]
    pub required: bool,
    /// Configured value; for step bindings this is "stepId.paramName"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Fallback value when none is supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Asset type backing the AssetOption sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_value: Option<String>,
}

fn default_required() -> bool {
    true
}

impl InputField {
    /// Create an input with just a name; everything else defaults
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            input_type: None,
            field_type: None,
            required: true,
            value: None,
            default_value: None,
            asset_value: None,
        }
    }

    /// Set the value source
    pub fn with_source(mut self, source: InputSource) -> Self {
        self.input_type = Some(source);
        self
    }

    /// Set the configured value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the display label
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }
}

/// One declared output parameter of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    /// Parameter name, unique within the step
    pub name: String,
    /// Declared value type, if the primitive specifies one
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
}

impl OutputField {
    /// Create an output with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output_type: None,
        }
    }
}

/// A named, ordered group of input parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputGroup {
    /// Group name, e.g. "input_params"
    pub name: String,
    /// Inputs in display order
    #[serde(rename = "inputGroup")]
    pub inputs: Vec<InputField>,
}

/// Outward wiring of a step: at most one pass and one fail target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSteps {
    /// Target taken on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_step: Option<StepId>,
    /// Target taken on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<StepId>,
}

impl NextSteps {
    /// Get the target for an edge kind
    pub fn target(&self, kind: EdgeKind) -> Option<&StepId> {
        match kind {
            EdgeKind::Pass => self.default_step.as_ref(),
            EdgeKind::Fail => self.failed_step.as_ref(),
        }
    }

    /// Set or clear the target for an edge kind
    pub fn set_target(&mut self, kind: EdgeKind, target: Option<StepId>) {
        match kind {
            EdgeKind::Pass => self.default_step = target,
            EdgeKind::Fail => self.failed_step = target,
        }
    }

    /// Whether neither slot is wired
    pub fn is_empty(&self) -> bool {
        self.default_step.is_none() && self.failed_step.is_none()
    }
}

/// A node in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier within the graph
    pub id: StepId,
    /// Primitive kind
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Reference to the underlying primitive or workflow definition
    pub operation: String,
    /// Display label
    pub friendly_name: String,
    /// Canvas x coordinate, pixels at 1.0 zoom
    pub position_x: i64,
    /// Canvas y coordinate, pixels at 1.0 zoom
    pub position_y: i64,
    /// Configurable input parameters, grouped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_groups: Vec<InputGroup>,
    /// Declared output parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<OutputField>,
    /// Outward pass/fail wiring
    #[serde(default, skip_serializing_if = "NextSteps::is_empty")]
    pub next: NextSteps,
}

impl Step {
    /// Whether this is one of the synthetic Start/End steps
    pub fn is_boundary(&self) -> bool {
        self.step_type.is_boundary()
    }

    /// Canvas position as a point
    pub fn position(&self) -> Position {
        Position::new(self.position_x as f64, self.position_y as f64)
    }

    /// Set the canvas position, rounding to whole pixels
    pub fn set_position(&mut self, position: Position) {
        self.position_x = position.x.round() as i64;
        self.position_y = position.y.round() as i64;
    }

    /// Iterate input parameter names across all groups, in order
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.input_groups
            .iter()
            .flat_map(|g| g.inputs.iter().map(|i| i.name.as_str()))
    }

    /// Iterate declared output parameter names, in order
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.output.iter().map(|o| o.name.as_str())
    }
}

/// A library entry a step is instantiated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTemplate {
    /// Reference id of the primitive or workflow this template wraps
    pub operation: String,
    /// Step kind instances will carry
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Display label copied to new instances
    pub friendly_name: String,
    /// Input groups copied to new instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_groups: Vec<InputGroup>,
    /// Outputs copied to new instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<OutputField>,
}

/// Document-level lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Draft,
    Saving,
    Valid,
    Invalid,
    Validating,
    Publishing,
    Unpublishing,
    Testing,
}

/// Inner document payload: workflow content without lifecycle status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    /// Workflow display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Steps in insertion order
    pub steps: Vec<Step>,
}

/// The persisted form of a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    /// Persisted workflow id
    pub id: String,
    /// Lifecycle status reported by the service
    pub state: WorkflowState,
    /// Workflow content
    pub document: DocumentBody,
}
