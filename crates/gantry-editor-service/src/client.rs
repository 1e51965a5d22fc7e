//! Service client seams
//!
//! The editor never talks to a transport directly; hosts hand it an
//! implementation of these traits. The queued doubles at the bottom
//! replay canned responses and record requests, which is all session
//! and library tests need.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use gantry_workflow_contracts::{
    CreateEntryRequest, CreatedEntry, DeleteEntryRequest, PublishRequest, PublishResponse,
    RenameEntryRequest, SaveRequest, SaveResponse, UnpublishRequest, UnpublishResponse,
    ValidateRequest, ValidationResponse,
};

use crate::error::{Result, ServiceError};

/// Backend operations on workflow documents
#[async_trait]
pub trait WorkflowServiceClient: Send + Sync {
    /// Persist a document, returning the state the service assigned
    async fn save(&self, request: SaveRequest) -> Result<SaveResponse>;

    /// Run server-side validation against a persisted workflow
    async fn validate(&self, request: ValidateRequest) -> Result<ValidationResponse>;

    /// Publish a valid workflow into the service catalog
    async fn publish(&self, request: PublishRequest) -> Result<PublishResponse>;

    /// Withdraw a published workflow back to draft
    async fn unpublish(&self, request: UnpublishRequest) -> Result<UnpublishResponse>;
}

/// Backend operations on the library tree
#[async_trait]
pub trait LibraryServiceClient: Send + Sync {
    /// Create a folder or entry, returning its assigned id
    async fn create_entry(&self, request: CreateEntryRequest) -> Result<CreatedEntry>;

    /// Rename an entry
    async fn rename_entry(&self, request: RenameEntryRequest) -> Result<()>;

    /// Delete an entry
    async fn delete_entry(&self, request: DeleteEntryRequest) -> Result<()>;
}

/// A request observed by a queued client
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    Save(SaveRequest),
    Validate(ValidateRequest),
    Publish(PublishRequest),
    Unpublish(UnpublishRequest),
}

/// A workflow client that replays queued responses in order
///
/// Useful for testing session flows without a transport. Calls with no
/// queued response fail as a transport error.
#[derive(Default)]
pub struct QueuedWorkflowClient {
    save_responses: Mutex<VecDeque<Result<SaveResponse>>>,
    validate_responses: Mutex<VecDeque<Result<ValidationResponse>>>,
    publish_responses: Mutex<VecDeque<Result<PublishResponse>>>,
    unpublish_responses: Mutex<VecDeque<Result<UnpublishResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl QueuedWorkflowClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next save call
    pub fn push_save(&self, response: Result<SaveResponse>) {
        self.save_responses.lock().unwrap().push_back(response);
    }

    /// Queue the response for the next validate call
    pub fn push_validate(&self, response: Result<ValidationResponse>) {
        self.validate_responses.lock().unwrap().push_back(response);
    }

    /// Queue the response for the next publish call
    pub fn push_publish(&self, response: Result<PublishResponse>) {
        self.publish_responses.lock().unwrap().push_back(response);
    }

    /// Queue the response for the next unpublish call
    pub fn push_unpublish(&self, response: Result<UnpublishResponse>) {
        self.unpublish_responses.lock().unwrap().push_back(response);
    }

    /// Requests observed so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ServiceError::transport("no queued response")))
}

#[async_trait]
impl WorkflowServiceClient for QueuedWorkflowClient {
    async fn save(&self, request: SaveRequest) -> Result<SaveResponse> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::Save(request));
        pop(&self.save_responses)
    }

    async fn validate(&self, request: ValidateRequest) -> Result<ValidationResponse> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::Validate(request));
        pop(&self.validate_responses)
    }

    async fn publish(&self, request: PublishRequest) -> Result<PublishResponse> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::Publish(request));
        pop(&self.publish_responses)
    }

    async fn unpublish(&self, request: UnpublishRequest) -> Result<UnpublishResponse> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest::Unpublish(request));
        pop(&self.unpublish_responses)
    }
}

/// A library client that replays queued responses in order
#[derive(Default)]
pub struct QueuedLibraryClient {
    create_responses: Mutex<VecDeque<Result<CreatedEntry>>>,
    rename_responses: Mutex<VecDeque<Result<()>>>,
    delete_responses: Mutex<VecDeque<Result<()>>>,
}

impl QueuedLibraryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next create call
    pub fn push_create(&self, response: Result<CreatedEntry>) {
        self.create_responses.lock().unwrap().push_back(response);
    }

    /// Queue the response for the next rename call
    pub fn push_rename(&self, response: Result<()>) {
        self.rename_responses.lock().unwrap().push_back(response);
    }

    /// Queue the response for the next delete call
    pub fn push_delete(&self, response: Result<()>) {
        self.delete_responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl LibraryServiceClient for QueuedLibraryClient {
    async fn create_entry(&self, _request: CreateEntryRequest) -> Result<CreatedEntry> {
        pop(&self.create_responses)
    }

    async fn rename_entry(&self, _request: RenameEntryRequest) -> Result<()> {
        pop(&self.rename_responses)
    }

    async fn delete_entry(&self, _request: DeleteEntryRequest) -> Result<()> {
        pop(&self.delete_responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use step_engine::WorkflowState;

    #[tokio::test]
    async fn test_queued_client_replays_in_order() {
        let client = QueuedWorkflowClient::new();
        client.push_validate(Ok(ValidationResponse {
            status: WorkflowState::Valid,
            error: None,
        }));

        let response = client
            .validate(ValidateRequest {
                workflow_id: "wf-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.status, WorkflowState::Valid);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(&requests[0], RecordedRequest::Validate(r) if r.workflow_id == "wf-1"));
    }

    #[tokio::test]
    async fn test_exhausted_queue_is_a_transport_error() {
        let client = QueuedWorkflowClient::new();
        let err = client
            .save(SaveRequest {
                workflow_id: "wf-1".to_string(),
                workflow_doc: sample_doc(),
            })
            .await;
        assert!(matches!(err, Err(ServiceError::Transport(_))));
    }

    fn sample_doc() -> step_engine::WorkflowDocument {
        step_engine::WorkflowDocument {
            id: "wf-1".to_string(),
            state: WorkflowState::Draft,
            document: step_engine::DocumentBody {
                name: "Sample".to_string(),
                description: None,
                steps: step_engine::StepGraph::new().to_steps(),
            },
        }
    }
}
