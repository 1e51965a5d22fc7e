//! Save, validate, publish and unpublish shapes
//!
//! These mirror the JSON the workflow service exchanges with the
//! editor. The nested validation report keys findings by step id, then
//! input group, then input, exactly as the service reports them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use step_engine::{WorkflowDocument, WorkflowState};

/// Request body for saving a workflow document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub workflow_id: String,
    /// The full document as the user built it
    pub workflow_doc: WorkflowDocument,
}

/// Success response from a save
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Lifecycle state the service assigned
    pub state: WorkflowState,
}

/// Failure body carried by rejected service calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFailure {
    /// Human-readable detail text, when the service supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServiceFailure {
    /// Failure with detail text
    pub fn with_details(details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
        }
    }
}

/// Request body for validating a persisted workflow
///
/// Validation runs against what the service has stored, not a live
/// snapshot; save first to validate recent edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub workflow_id: String,
}

/// Response from a validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Resulting lifecycle state, VALID or INVALID
    pub status: WorkflowState,
    /// Structured findings, present when the workflow is INVALID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationReport>,
}

/// Workflow-level validation findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Workflow-level message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Findings keyed by step id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub error_steps: HashMap<String, StepFindings>,
}

/// Findings for one step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFindings {
    /// Step-level messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_messages: Vec<String>,
    /// Findings keyed by input group name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub error_input_groups: HashMap<String, GroupFindings>,
}

/// Findings for one input group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFindings {
    /// Findings keyed by input name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub error_inputs: HashMap<String, InputFindings>,
}

/// Findings for one input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFindings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_messages: Vec<String>,
}

/// Request body for publishing a valid workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub workflow_id: String,
}

/// Success response from a publish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    /// Catalog reference the published workflow now lives under
    pub name: String,
}

/// Request body for withdrawing a published workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpublishRequest {
    pub workflow_id: String,
}

/// Success response from an unpublish
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpublishResponse {
    /// Lifecycle state the workflow returned to
    pub state: WorkflowState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_wire_keys() {
        let request = SaveRequest {
            workflow_id: "wf-1".to_string(),
            workflow_doc: WorkflowDocument {
                id: "wf-1".to_string(),
                state: WorkflowState::Saving,
                document: step_engine::DocumentBody {
                    name: "Provision".to_string(),
                    description: None,
                    steps: Vec::new(),
                },
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["workflowId"], "wf-1");
        assert_eq!(json["workflowDoc"]["state"], "SAVING");
    }

    #[test]
    fn test_validation_response_parses_nested_findings() {
        let raw = r#"{
            "status": "INVALID",
            "error": {
                "errorSteps": {
                    "step-1": {
                        "errorMessages": ["Step is not reachable"],
                        "errorInputGroups": {
                            "input_params": {
                                "errorInputs": {
                                    "host": { "errorMessages": ["Host is required"] }
                                }
                            }
                        }
                    }
                }
            }
        }"#;

        let response: ValidationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, WorkflowState::Invalid);

        let report = response.error.unwrap();
        assert!(report.error_message.is_none());
        let step = &report.error_steps["step-1"];
        assert_eq!(step.error_messages, vec!["Step is not reachable"]);
        let input = &step.error_input_groups["input_params"].error_inputs["host"];
        assert_eq!(input.error_messages, vec!["Host is required"]);
    }

    #[test]
    fn test_valid_response_has_no_report() {
        let raw = r#"{ "status": "VALID" }"#;
        let response: ValidationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, WorkflowState::Valid);
        assert!(response.error.is_none());
    }
}
