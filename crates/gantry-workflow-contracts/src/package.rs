//! Workflow package metadata
//!
//! Packages are the import/export interchange format: a gzip-compressed
//! tar holding this metadata record plus the exported documents. The
//! version gate keeps newer package layouts from being half-read by
//! older builds.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Package format version written by this build
pub const PACKAGE_VERSION: &str = "1";

/// Versions this build can import
pub const SUPPORTED_VERSIONS: [&str; 1] = ["1"];

/// Metadata record at the root of every package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Id of the workflow the package was exported from
    pub id: String,
    /// Package format version
    pub version: String,
    /// RFC 3339 export timestamp
    pub exported_at: String,
}

impl PackageMetadata {
    /// Stamp metadata for a fresh export
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            id: workflow_id.into(),
            version: PACKAGE_VERSION.to_string(),
            exported_at: Utc::now().to_rfc3339(),
        }
    }

    /// Whether this build can import the package's version
    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version.as_str())
    }
}
