//! Library tree reconciliation
//!
//! The directory tree is optimistic: the host creates, renames and
//! deletes entries visually first, then commits them here. Each helper
//! runs the round trip and says how to reconcile the tree when the
//! service disagrees: delete the speculative node, restore the old
//! label, or keep the entry, always with an alert carrying the server
//! detail.

use gantry_workflow_contracts::{
    CreateEntryRequest, DeleteEntryRequest, RenameEntryRequest,
};

use crate::alerts::Alert;
use crate::client::LibraryServiceClient;

/// Outcome of committing an optimistic create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The entry exists; adopt the assigned id
    Committed { id: String },
    /// The service refused; delete the speculative node
    Rolledback { alert: Alert },
}

/// Outcome of committing an optimistic rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Committed,
    /// The service refused; restore the previous label
    Reverted { previous_name: String, alert: Alert },
}

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Committed,
    /// The service refused; the entry stays
    Kept { alert: Alert },
}

/// Commit a speculative tree entry, returning its assigned id
pub async fn create_entry(
    client: &dyn LibraryServiceClient,
    request: CreateEntryRequest,
) -> CreateOutcome {
    let name = request.name.clone();
    match client.create_entry(request).await {
        Ok(created) => {
            log::debug!("created library entry '{}' as {}", name, created.id);
            CreateOutcome::Committed { id: created.id }
        }
        Err(error) => {
            log::warn!("create of library entry '{}' failed: {}", name, error);
            CreateOutcome::Rolledback {
                alert: Alert::library_failed(error.alert_detail()),
            }
        }
    }
}

/// Commit an optimistic rename
///
/// `previous_name` is what the label reverts to on refusal.
pub async fn rename_entry(
    client: &dyn LibraryServiceClient,
    request: RenameEntryRequest,
    previous_name: impl Into<String>,
) -> RenameOutcome {
    let new_name = request.new_name.clone();
    match client.rename_entry(request).await {
        Ok(()) => RenameOutcome::Committed,
        Err(error) => {
            log::warn!("rename to '{}' failed: {}", new_name, error);
            RenameOutcome::Reverted {
                previous_name: previous_name.into(),
                alert: Alert::library_failed(error.alert_detail()),
            }
        }
    }
}

/// Delete a tree entry
pub async fn delete_entry(
    client: &dyn LibraryServiceClient,
    request: DeleteEntryRequest,
) -> DeleteOutcome {
    let id = request.id.clone();
    match client.delete_entry(request).await {
        Ok(()) => DeleteOutcome::Committed,
        Err(error) => {
            log::warn!("delete of library entry {} failed: {}", id, error);
            DeleteOutcome::Kept {
                alert: Alert::library_failed(error.alert_detail()),
            }
        }
    }
}
