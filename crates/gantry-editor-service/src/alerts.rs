//! User-facing alerts and validation overlays
//!
//! Failures never vanish silently: session and library operations
//! produce an `Alert` the host can show and dismiss, and a validation
//! run that comes back INVALID additionally produces a
//! `ValidationOverlay` with per-step annotations for the canvas.

use std::collections::HashMap;

use gantry_workflow_contracts::ValidationReport;

/// How prominently an alert should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    /// Server-supplied detail text, when the failure carried one
    pub detail: Option<String>,
}

impl Alert {
    /// An informational alert
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Info,
            message: message.into(),
            detail: None,
        }
    }

    /// An error alert
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: AlertSeverity::Error,
            message: message.into(),
            detail: None,
        }
    }

    /// Alert for a save the service rejected
    pub fn save_failed(detail: Option<&str>) -> Self {
        Self::operation_failed("saving", detail)
    }

    /// Alert for a validation run that came back clean
    pub fn validation_passed() -> Self {
        Self::info("Workflow Validated Successfully.")
    }

    /// Alert for a lifecycle dispatch that failed outright
    ///
    /// `operation` is the gerund shown in the message, e.g. "saving".
    pub fn operation_failed(operation: &str, detail: Option<&str>) -> Self {
        Self {
            severity: AlertSeverity::Error,
            message: format!(
                "An unexpected error occurred while {} the workflow.",
                operation
            ),
            detail: detail.map(str::to_string),
        }
    }

    /// Alert for a library operation the service rejected
    ///
    /// The server detail is the whole message here; the tree shows it
    /// next to the reverted entry.
    pub fn library_failed(detail: Option<&str>) -> Self {
        Self::error(detail.unwrap_or("An unexpected error occurred."))
    }
}

/// Validation annotations for one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepAnnotations {
    /// Step-level messages shown on the node
    pub messages: Vec<String>,
    /// Input messages keyed by group name, then input name
    pub input_messages: HashMap<String, HashMap<String, Vec<String>>>,
}

/// Per-step validation findings projected for the canvas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOverlay {
    /// Workflow-level summary
    pub message: String,
    /// Annotations keyed by step id
    pub steps: HashMap<String, StepAnnotations>,
}

impl ValidationOverlay {
    /// Project a service report into canvas annotations
    ///
    /// A missing summary is backfilled from the step count, and each
    /// step with input findings gets a count message appended so a
    /// collapsed node still shows something actionable.
    pub fn from_report(report: ValidationReport) -> Self {
        let mut steps = HashMap::new();
        for (step_id, findings) in report.error_steps {
            let mut annotations = StepAnnotations {
                messages: findings.error_messages,
                ..Default::default()
            };
            let mut input_errors = 0usize;
            for (group, group_findings) in findings.error_input_groups {
                let inputs: HashMap<String, Vec<String>> = group_findings
                    .error_inputs
                    .into_iter()
                    .map(|(input, f)| (input, f.error_messages))
                    .collect();
                input_errors += inputs.len();
                annotations.input_messages.insert(group, inputs);
            }
            if input_errors > 0 {
                annotations
                    .messages
                    .push(format!("Step has {} input errors", input_errors));
            }
            steps.insert(step_id, annotations);
        }

        let message = report.error_message.unwrap_or_else(|| {
            format!(
                "Workflow validation failed. There are {} steps with errors.",
                steps.len()
            )
        });
        Self { message, steps }
    }

    /// The summary as a dismissible alert
    pub fn summary_alert(&self) -> Alert {
        Alert::error(self.message.clone())
    }

    /// Annotations for one step, if it has findings
    pub fn step(&self, step_id: &str) -> Option<&StepAnnotations> {
        self.steps.get(step_id)
    }
}
