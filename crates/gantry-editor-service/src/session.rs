//! One editor session's lifecycle
//!
//! `EditorSession` owns the model, its diagram projection, and the
//! workflow's lifecycle state for the time one workflow is open. Every
//! service round trip is split into a `begin_*` step that builds the
//! request and a `complete_*` step that applies the outcome, so hosts
//! drive the transport themselves; the async methods pair the two over
//! a `WorkflowServiceClient` for hosts that want that done for them.
//!
//! Editing stays live while a request is in flight. A response never
//! carries graph content back into the session: success adopts only
//! the reported lifecycle state, so a stale save response cannot
//! clobber edits made after the request left.

use gantry_workflow_contracts::{
    PublishRequest, PublishResponse, SaveRequest, SaveResponse, UnpublishRequest,
    UnpublishResponse, ValidateRequest, ValidationResponse,
};
use step_engine::{
    DocumentBody, EdgeKind, InputSource, Position, StepTemplate, WorkflowDocument,
    WorkflowEditor, WorkflowState,
};

use crate::alerts::{Alert, ValidationOverlay};
use crate::client::WorkflowServiceClient;
use crate::diagram::{CanvasTransform, Diagram, DiagramSync};
use crate::error::{Result, ServiceError};

/// Where the host should navigate after an editor-exiting dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// Publish succeeded; open the catalog service built from this base
    PublishedBase { name: String },
    /// Test run requested; open the order page for this service
    TestService { service_id: String },
}

/// One open workflow and everything the editor shell shows for it
#[derive(Debug, Clone)]
pub struct EditorSession {
    workflow_id: String,
    name: String,
    description: Option<String>,
    state: WorkflowState,
    /// State to restore when a publish or unpublish dispatch fails
    resume_state: WorkflowState,
    doc_modified: bool,
    editor: WorkflowEditor,
    sync: DiagramSync,
    alert: Option<Alert>,
    overlay: Option<ValidationOverlay>,
}

impl EditorSession {
    /// Open a session on a loaded document
    ///
    /// The initial lifecycle state is whatever the document reports.
    pub fn open(document: WorkflowDocument) -> Result<Self> {
        let WorkflowDocument {
            id,
            state,
            document: body,
        } = document;
        let editor = WorkflowEditor::from_steps(body.steps)?;
        let sync = DiagramSync::rebuilt(&editor);
        log::info!("opened workflow {} in state {:?}", id, state);
        Ok(Self {
            workflow_id: id,
            name: body.name,
            description: body.description,
            state,
            resume_state: state,
            doc_modified: false,
            editor,
            sync,
            alert: None,
            overlay: None,
        })
    }

    /// The persisted workflow id
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Display name from the document
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// The editing model
    pub fn editor(&self) -> &WorkflowEditor {
        &self.editor
    }

    /// The rendered projection
    pub fn diagram(&self) -> &Diagram {
        self.sync.diagram()
    }

    /// The transient alert, if one is up
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Validation annotations from the last INVALID run
    pub fn overlay(&self) -> Option<&ValidationOverlay> {
        self.overlay.as_ref()
    }

    /// Dismiss the transient alert
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Whether unsaved changes exist, in the graph or the document
    pub fn is_modified(&self) -> bool {
        self.doc_modified || self.editor.is_modified()
    }

    /// Update the display name ahead of the next save
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.doc_modified = true;
    }

    /// Update the description ahead of the next save
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.doc_modified = true;
    }

    /// Snapshot the live graph as a persistable document
    pub fn document(&self) -> WorkflowDocument {
        WorkflowDocument {
            id: self.workflow_id.clone(),
            state: self.state,
            document: DocumentBody {
                name: self.name.clone(),
                description: self.description.clone(),
                steps: self.editor.graph().to_steps(),
            },
        }
    }

    /// Drop a library template onto the canvas, returning the new id
    pub fn drop_template(
        &mut self,
        template: &StepTemplate,
        drop_point: Position,
        transform: &dyn CanvasTransform,
    ) -> Result<String> {
        Ok(self
            .sync
            .drop_template(&mut self.editor, template, drop_point, transform)?)
    }

    /// Drag a step to a new position
    pub fn step_moved(
        &mut self,
        id: &str,
        point: Position,
        transform: &dyn CanvasTransform,
    ) -> Result<()> {
        Ok(self.sync.step_moved(&mut self.editor, id, point, transform)?)
    }

    /// Draw a connector between two steps
    pub fn connector_drawn(&mut self, source: &str, target: &str, kind: EdgeKind) -> Result<()> {
        Ok(self.sync.connector_drawn(&mut self.editor, source, target, kind)?)
    }

    /// Remove a connector off a step
    pub fn connector_removed(&mut self, source: &str, kind: EdgeKind) -> Result<()> {
        Ok(self.sync.connector_removed(&mut self.editor, source, kind)?)
    }

    /// Delete a step and its connectors
    pub fn step_removed(&mut self, id: &str) -> Result<()> {
        Ok(self.sync.step_removed(&mut self.editor, id)?)
    }

    /// Rebind one input parameter of a step
    pub fn bind_input(
        &mut self,
        step_id: &str,
        group: &str,
        input: &str,
        source: Option<InputSource>,
        value: Option<String>,
    ) -> Result<()> {
        Ok(self.editor.bind_input(step_id, group, input, source, value)?)
    }

    /// Start a save round trip
    ///
    /// Serializes the live graph into the request document and moves to
    /// SAVING. The graph stays editable while the request is in flight.
    pub fn begin_save(&mut self) -> SaveRequest {
        self.state = WorkflowState::Saving;
        log::debug!("saving workflow {}", self.workflow_id);
        SaveRequest {
            workflow_id: self.workflow_id.clone(),
            workflow_doc: self.document(),
        }
    }

    /// Apply the outcome of a save round trip
    ///
    /// Success adopts the reported state and marks the session clean;
    /// the graph itself is never touched, so edits made while the
    /// request was in flight survive a stale response. Failure surfaces
    /// the service detail as an alert and moves to INVALID with the
    /// graph left exactly as the user built it.
    pub fn complete_save(&mut self, result: Result<SaveResponse>) {
        match result {
            Ok(response) => {
                self.state = response.state;
                self.doc_modified = false;
                self.editor.mark_saved();
            }
            Err(error) => {
                log::warn!("save of workflow {} failed: {}", self.workflow_id, error);
                self.alert = Some(Alert::save_failed(error.alert_detail()));
                self.state = WorkflowState::Invalid;
            }
        }
    }

    /// Start a validation round trip
    ///
    /// Validation runs server-side against the persisted document, so
    /// the request carries only the id; save first to validate recent
    /// edits. Clears any alert and overlay and moves to VALIDATING.
    pub fn begin_validate(&mut self) -> ValidateRequest {
        self.state = WorkflowState::Validating;
        self.alert = None;
        self.overlay = None;
        ValidateRequest {
            workflow_id: self.workflow_id.clone(),
        }
    }

    /// Apply the outcome of a validation round trip
    ///
    /// INVALID responses become a `ValidationOverlay` plus its summary
    /// alert; VALID responses surface a success alert. A failed
    /// dispatch falls back to a generic alert and INVALID.
    pub fn complete_validate(&mut self, result: Result<ValidationResponse>) {
        match result {
            Ok(response) => {
                self.state = response.status;
                if response.status == WorkflowState::Invalid {
                    let overlay =
                        ValidationOverlay::from_report(response.error.unwrap_or_default());
                    self.alert = Some(overlay.summary_alert());
                    self.overlay = Some(overlay);
                } else {
                    self.alert = Some(Alert::validation_passed());
                }
            }
            Err(error) => {
                log::warn!(
                    "validation of workflow {} failed: {}",
                    self.workflow_id,
                    error
                );
                self.alert = Some(Alert::operation_failed("validating", error.alert_detail()));
                self.state = WorkflowState::Invalid;
            }
        }
    }

    /// Start a publish round trip
    ///
    /// Only a VALID workflow may be published.
    pub fn begin_publish(&mut self) -> Result<PublishRequest> {
        if self.state != WorkflowState::Valid {
            return Err(ServiceError::WrongState(self.state));
        }
        self.resume_state = self.state;
        self.state = WorkflowState::Publishing;
        Ok(PublishRequest {
            workflow_id: self.workflow_id.clone(),
        })
    }

    /// Apply the outcome of a publish round trip
    ///
    /// Success hands navigation to the host and the session is over.
    /// Failure restores the state the publish started from.
    pub fn complete_publish(&mut self, result: Result<PublishResponse>) -> Option<Handoff> {
        match result {
            Ok(response) => Some(Handoff::PublishedBase {
                name: response.name,
            }),
            Err(error) => {
                log::warn!("publish of workflow {} failed: {}", self.workflow_id, error);
                self.alert = Some(Alert::operation_failed("publishing", error.alert_detail()));
                self.state = self.resume_state;
                None
            }
        }
    }

    /// Start an unpublish round trip
    pub fn begin_unpublish(&mut self) -> UnpublishRequest {
        self.resume_state = self.state;
        self.state = WorkflowState::Unpublishing;
        UnpublishRequest {
            workflow_id: self.workflow_id.clone(),
        }
    }

    /// Apply the outcome of an unpublish round trip
    ///
    /// Success adopts the reported state, DRAFT again. Failure restores
    /// the state the unpublish started from.
    pub fn complete_unpublish(&mut self, result: Result<UnpublishResponse>) {
        match result {
            Ok(response) => self.state = response.state,
            Err(error) => {
                log::warn!(
                    "unpublish of workflow {} failed: {}",
                    self.workflow_id,
                    error
                );
                self.alert = Some(Alert::operation_failed("unpublishing", error.alert_detail()));
                self.state = self.resume_state;
            }
        }
    }

    /// Leave the editor for a test run of this workflow
    ///
    /// There is no round trip and no terminal state here; the host
    /// navigates to the order page and the session ends.
    pub fn begin_test(&mut self) -> Handoff {
        self.state = WorkflowState::Testing;
        self.alert = None;
        self.overlay = None;
        Handoff::TestService {
            service_id: self.workflow_id.clone(),
        }
    }

    /// Run a full save round trip against a client
    pub async fn save(&mut self, client: &dyn WorkflowServiceClient) {
        let request = self.begin_save();
        let result = client.save(request).await;
        self.complete_save(result);
    }

    /// Run a full validation round trip against a client
    pub async fn validate(&mut self, client: &dyn WorkflowServiceClient) {
        let request = self.begin_validate();
        let result = client.validate(request).await;
        self.complete_validate(result);
    }

    /// Run a full publish round trip against a client
    pub async fn publish(&mut self, client: &dyn WorkflowServiceClient) -> Result<Option<Handoff>> {
        let request = self.begin_publish()?;
        let result = client.publish(request).await;
        Ok(self.complete_publish(result))
    }

    /// Run a full unpublish round trip against a client
    pub async fn unpublish(&mut self, client: &dyn WorkflowServiceClient) {
        let request = self.begin_unpublish();
        let result = client.unpublish(request).await;
        self.complete_unpublish(result);
    }
}
