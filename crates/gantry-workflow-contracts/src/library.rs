//! Library tree management shapes
//!
//! The directory browser creates, renames and deletes folders and the
//! workflow/primitive entries inside them. Only the wire shapes live
//! here; the optimistic apply-then-reconcile flow is an editor service
//! concern.

use serde::{Deserialize, Serialize};

/// What a library entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Workflow,
    Primitive,
}

/// Request to create a library entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    /// Display name of the new entry
    pub name: String,
    /// Parent folder id, or none for the library root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub kind: EntryKind,
}

/// Success response carrying the assigned id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEntry {
    pub id: String,
}

/// Request to rename a library entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameEntryRequest {
    pub id: String,
    pub new_name: String,
    pub kind: EntryKind,
}

/// Request to delete a library entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryRequest {
    pub id: String,
    /// Containing folder id; folders themselves carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub kind: EntryKind,
}
