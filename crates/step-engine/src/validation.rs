//! Structural validation for step graphs
//!
//! Checks a graph before it is handed to the save/validate services:
//! boundary presence, wiring coverage, and step-binding references.
//! Returns every problem found rather than stopping at the first.

use crate::graph::StepGraph;
use crate::types::{
    InputField, InputSource, Step, StepType, END_STEP, IMPLICIT_OUTPUTS, START_STEP,
};

/// Validation problem with location context
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Graph has no Start step
    MissingStart,
    /// Graph has no End step
    MissingEnd,
    /// More than one boundary step of the same kind
    DuplicateBoundary { id: String },
    /// An edge targets a step that does not exist
    DanglingEdge { step_id: String, target: String },
    /// An edge targets the Start step
    StartTargeted { step_id: String },
    /// The End step has an outgoing edge
    EndWired,
    /// A non-End step has neither a pass nor a fail edge
    UnwiredStep { step_id: String },
    /// A step-binding value is not of the form "stepId.param"
    MalformedBinding {
        step_id: String,
        input: String,
        value: String,
    },
    /// A step-binding references a step that does not exist
    UnknownBindingStep {
        step_id: String,
        input: String,
        target: String,
    },
    /// A step-binding references a parameter its source does not expose
    UnknownBindingParam {
        step_id: String,
        input: String,
        reference: String,
    },
    /// A required step-binding has no value selected
    MissingRequiredValue {
        step_id: String,
        group: String,
        input: String,
    },
    /// A user-supplied input has no display label for the launch form
    MissingFriendlyName { step_id: String, input: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStart => write!(f, "Workflow has no Start step"),
            Self::MissingEnd => write!(f, "Workflow has no End step"),
            Self::DuplicateBoundary { id } => {
                write!(f, "Workflow has more than one '{}' step", id)
            }
            Self::DanglingEdge { step_id, target } => {
                write!(f, "Step '{}' links to unknown step '{}'", step_id, target)
            }
            Self::StartTargeted { step_id } => {
                write!(f, "Step '{}' links back into Start", step_id)
            }
            Self::EndWired => write!(f, "The End step cannot link onward"),
            Self::UnwiredStep { step_id } => {
                write!(f, "Step '{}' has no next step", step_id)
            }
            Self::MalformedBinding {
                step_id,
                input,
                value,
            } => {
                write!(
                    f,
                    "Input '{}' on step '{}' has malformed reference '{}'",
                    input, step_id, value
                )
            }
            Self::UnknownBindingStep {
                step_id,
                input,
                target,
            } => {
                write!(
                    f,
                    "Input '{}' on step '{}' references unknown step '{}'",
                    input, step_id, target
                )
            }
            Self::UnknownBindingParam {
                step_id,
                input,
                reference,
            } => {
                write!(
                    f,
                    "Input '{}' on step '{}' references missing parameter '{}'",
                    input, step_id, reference
                )
            }
            Self::MissingRequiredValue {
                step_id,
                group,
                input,
            } => {
                write!(
                    f,
                    "Required input '{}' in group '{}' on step '{}' has no value",
                    input, group, step_id
                )
            }
            Self::MissingFriendlyName { step_id, input } => {
                write!(
                    f,
                    "Input '{}' on step '{}' needs a display label",
                    input, step_id
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a graph's structure
///
/// Returns all problems found (not just the first).
pub fn validate_graph(graph: &StepGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_boundaries(graph, &mut errors);
    validate_wiring(graph, &mut errors);
    validate_bindings(graph, &mut errors);
    errors
}

/// Check that exactly one Start and one End exist, by step type
fn validate_boundaries(graph: &StepGraph, errors: &mut Vec<ValidationError>) {
    let starts = graph
        .steps()
        .filter(|s| s.step_type == StepType::Start)
        .count();
    let ends = graph
        .steps()
        .filter(|s| s.step_type == StepType::End)
        .count();

    if starts == 0 {
        errors.push(ValidationError::MissingStart);
    } else if starts > 1 {
        errors.push(ValidationError::DuplicateBoundary {
            id: START_STEP.to_string(),
        });
    }
    if ends == 0 {
        errors.push(ValidationError::MissingEnd);
    } else if ends > 1 {
        errors.push(ValidationError::DuplicateBoundary {
            id: END_STEP.to_string(),
        });
    }
}

/// Check edge targets resolve and every executable step leads somewhere
fn validate_wiring(graph: &StepGraph, errors: &mut Vec<ValidationError>) {
    for step in graph.steps() {
        for target in [&step.next.default_step, &step.next.failed_step]
            .into_iter()
            .flatten()
        {
            if !graph.contains(target) {
                errors.push(ValidationError::DanglingEdge {
                    step_id: step.id.clone(),
                    target: target.clone(),
                });
            } else if target == START_STEP {
                errors.push(ValidationError::StartTargeted {
                    step_id: step.id.clone(),
                });
            }
        }
        if step.step_type == StepType::End {
            if !step.next.is_empty() {
                errors.push(ValidationError::EndWired);
            }
        } else if step.next.is_empty() {
            errors.push(ValidationError::UnwiredStep {
                step_id: step.id.clone(),
            });
        }
    }
}

/// Check every configured input against its declared source
fn validate_bindings(graph: &StepGraph, errors: &mut Vec<ValidationError>) {
    for step in graph.steps() {
        for group in &step.input_groups {
            for input in &group.inputs {
                check_input(graph, step, &group.name, input, errors);
            }
        }
    }
}

fn check_input(
    graph: &StepGraph,
    step: &Step,
    group: &str,
    input: &InputField,
    errors: &mut Vec<ValidationError>,
) {
    let source = match input.input_type {
        Some(source) => source,
        None => return,
    };
    match source {
        InputSource::FromOtherStepInput | InputSource::FromOtherStepOutput => {
            let value = match input.value.as_deref() {
                Some(value) if !value.is_empty() => value,
                _ => {
                    if input.required {
                        errors.push(ValidationError::MissingRequiredValue {
                            step_id: step.id.clone(),
                            group: group.to_string(),
                            input: input.name.clone(),
                        });
                    }
                    return;
                }
            };
            check_binding(graph, step, input, source, value, errors);
        }
        InputSource::InputFromUser
        | InputSource::InputFromUserMulti
        | InputSource::AssetOptionSingle
        | InputSource::AssetOptionMulti => {
            let unlabeled = input
                .friendly_name
                .as_deref()
                .map_or(true, |name| name.is_empty());
            if unlabeled {
                errors.push(ValidationError::MissingFriendlyName {
                    step_id: step.id.clone(),
                    input: input.name.clone(),
                });
            }
        }
        InputSource::Disabled => {}
    }
}

/// Resolve a "stepId.param" reference against the graph
fn check_binding(
    graph: &StepGraph,
    step: &Step,
    input: &InputField,
    source: InputSource,
    value: &str,
    errors: &mut Vec<ValidationError>,
) {
    let (target_id, param) = match value.split_once('.') {
        Some(parts) => parts,
        None => {
            errors.push(ValidationError::MalformedBinding {
                step_id: step.id.clone(),
                input: input.name.clone(),
                value: value.to_string(),
            });
            return;
        }
    };
    let target = match graph.step(target_id) {
        Some(target) => target,
        None => {
            errors.push(ValidationError::UnknownBindingStep {
                step_id: step.id.clone(),
                input: input.name.clone(),
                target: target_id.to_string(),
            });
            return;
        }
    };
    let resolves = match source {
        InputSource::FromOtherStepInput => target.input_names().any(|n| n == param),
        _ => target.output_names().any(|n| n == param) || IMPLICIT_OUTPUTS.contains(&param),
    };
    if !resolves {
        errors.push(ValidationError::UnknownBindingParam {
            step_id: step.id.clone(),
            input: input.name.clone(),
            reference: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::WorkflowEditor;
    use crate::types::{
        EdgeKind, InputGroup, NextSteps, OutputField, Position, StepTemplate,
    };

    fn wired_editor() -> (WorkflowEditor, String) {
        let mut editor = WorkflowEditor::new();
        let template = StepTemplate {
            operation: "ops/copy".to_string(),
            step_type: StepType::Script,
            friendly_name: "Copy".to_string(),
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: vec![InputField::named("host")
                    .with_source(InputSource::InputFromUser)
                    .with_friendly_name("Host")],
            }],
            output: vec![OutputField::named("result")],
        };
        let a = editor
            .create_step(&template, Position::default())
            .unwrap()
            .id;
        editor.connect(START_STEP, &a, EdgeKind::Pass).unwrap();
        editor.connect(&a, END_STEP, EdgeKind::Pass).unwrap();
        (editor, a)
    }

    #[test]
    fn test_valid_graph() {
        let (editor, _) = wired_editor();
        let errors = validate_graph(editor.graph());
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn test_unwired_step_is_flagged() {
        let mut editor = WorkflowEditor::new();
        // A fresh graph has an unwired Start
        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnwiredStep { step_id } if step_id == START_STEP)));

        editor.connect(START_STEP, END_STEP, EdgeKind::Pass).unwrap();
        assert!(validate_graph(editor.graph()).is_empty());
    }

    #[test]
    fn test_missing_boundary_by_type() {
        // An id can claim to be Start while carrying another type
        let steps = vec![
            Step {
                id: START_STEP.to_string(),
                step_type: StepType::Script,
                operation: "ops/x".to_string(),
                friendly_name: "Not Really Start".to_string(),
                position_x: 0,
                position_y: 0,
                input_groups: Vec::new(),
                output: Vec::new(),
                next: NextSteps {
                    default_step: Some(END_STEP.to_string()),
                    failed_step: None,
                },
            },
            Step {
                id: END_STEP.to_string(),
                step_type: StepType::End,
                operation: String::new(),
                friendly_name: END_STEP.to_string(),
                position_x: 0,
                position_y: 0,
                input_groups: Vec::new(),
                output: Vec::new(),
                next: NextSteps::default(),
            },
        ];
        let graph = StepGraph::from_steps(steps).unwrap();
        let errors = validate_graph(&graph);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingStart)));
    }

    #[test]
    fn test_dangling_edge_is_flagged() {
        let (editor, a) = wired_editor();
        let mut steps = editor.graph().to_steps();
        for step in &mut steps {
            if step.id == a {
                step.next.default_step = Some("gone".to_string());
            }
        }
        let graph = StepGraph::from_steps(steps).unwrap();
        let errors = validate_graph(&graph);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DanglingEdge { target, .. } if target == "gone")));
    }

    #[test]
    fn test_binding_resolution() {
        let (mut editor, a) = wired_editor();
        let template = StepTemplate {
            operation: "ops/verify".to_string(),
            step_type: StepType::Script,
            friendly_name: "Verify".to_string(),
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: vec![InputField::named("path")],
            }],
            output: Vec::new(),
        };
        let b = editor
            .create_step(&template, Position::default())
            .unwrap()
            .id;
        editor.connect(&b, END_STEP, EdgeKind::Pass).unwrap();

        // A declared output resolves
        editor
            .bind_input(
                &b,
                "input_params",
                "path",
                Some(InputSource::FromOtherStepOutput),
                Some(format!("{}.result", a)),
            )
            .unwrap();
        assert!(validate_graph(editor.graph()).is_empty());

        // Implicit outputs resolve too
        editor
            .bind_input(
                &b,
                "input_params",
                "path",
                Some(InputSource::FromOtherStepOutput),
                Some(format!("{}.operation_output", a)),
            )
            .unwrap();
        assert!(validate_graph(editor.graph()).is_empty());

        // An undeclared parameter does not
        editor
            .bind_input(
                &b,
                "input_params",
                "path",
                Some(InputSource::FromOtherStepOutput),
                Some(format!("{}.nope", a)),
            )
            .unwrap();
        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownBindingParam { .. })));
    }

    #[test]
    fn test_binding_against_inputs() {
        let (mut editor, a) = wired_editor();
        let template = StepTemplate {
            operation: "ops/verify".to_string(),
            step_type: StepType::Script,
            friendly_name: "Verify".to_string(),
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: vec![InputField::named("path")],
            }],
            output: Vec::new(),
        };
        let b = editor
            .create_step(&template, Position::default())
            .unwrap()
            .id;
        editor.connect(&b, END_STEP, EdgeKind::Pass).unwrap();

        editor
            .bind_input(
                &b,
                "input_params",
                "path",
                Some(InputSource::FromOtherStepInput),
                Some(format!("{}.host", a)),
            )
            .unwrap();
        assert!(validate_graph(editor.graph()).is_empty());

        // Inputs do not resolve against implicit outputs
        editor
            .bind_input(
                &b,
                "input_params",
                "path",
                Some(InputSource::FromOtherStepInput),
                Some(format!("{}.operation_output", a)),
            )
            .unwrap();
        assert!(!validate_graph(editor.graph()).is_empty());
    }

    #[test]
    fn test_malformed_and_missing_bindings() {
        let (mut editor, a) = wired_editor();

        editor
            .bind_input(
                &a,
                "input_params",
                "host",
                Some(InputSource::FromOtherStepOutput),
                Some("no-separator".to_string()),
            )
            .unwrap();
        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MalformedBinding { .. })));

        editor
            .bind_input(
                &a,
                "input_params",
                "host",
                Some(InputSource::FromOtherStepOutput),
                Some("gone.result".to_string()),
            )
            .unwrap();
        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownBindingStep { .. })));

        editor
            .bind_input(
                &a,
                "input_params",
                "host",
                Some(InputSource::FromOtherStepOutput),
                None,
            )
            .unwrap();
        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingRequiredValue { .. })));
    }

    #[test]
    fn test_user_input_needs_label() {
        let (mut editor, a) = wired_editor();
        // wired_editor labels the host input, so this stays clean
        editor
            .bind_input(&a, "input_params", "host", Some(InputSource::InputFromUser), None)
            .unwrap();
        assert!(validate_graph(editor.graph()).is_empty());

        // An unlabeled user input on a fresh step is flagged
        let template = StepTemplate {
            operation: "ops/ask".to_string(),
            step_type: StepType::Script,
            friendly_name: "Ask".to_string(),
            input_groups: vec![InputGroup {
                name: "input_params".to_string(),
                inputs: vec![InputField::named("answer").with_source(InputSource::InputFromUser)],
            }],
            output: Vec::new(),
        };
        let b = editor
            .create_step(&template, Position::default())
            .unwrap()
            .id;
        editor.connect(&b, END_STEP, EdgeKind::Pass).unwrap();

        let errors = validate_graph(editor.graph());
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingFriendlyName { step_id, input }
                if *step_id == b && input == "answer")));
    }
}
