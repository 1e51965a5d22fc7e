//! Workflow package export and import
//!
//! Packages move workflows between installations: a gzip-compressed
//! tar with a `workflow.md` metadata record at the root and one JSON
//! document per workflow under `workflows/`. Packages written by the
//! full platform also carry `operations/` and `resources/` folders for
//! bundled primitives; those entries are skipped on import here. Any
//! other folder makes the archive invalid, while loose files at the
//! root are ignored.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tar::{Archive, Builder, Header};
use thiserror::Error;

use gantry_workflow_contracts::PackageMetadata;
use step_engine::WorkflowDocument;

/// Metadata file at the archive root
pub const PACKAGE_METADATA_FILE: &str = "workflow.md";
/// Folder holding the exported workflow documents
pub const WORKFLOWS_DIR: &str = "workflows";
/// Platform folders tolerated but not imported
pub const FOREIGN_DIRS: [&str; 2] = ["operations", "resources"];

/// Package failure taxonomy
#[derive(Debug, Error)]
pub enum PackageError {
    /// The archive declares a version this build cannot read
    #[error("Package version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// No metadata record at the archive root
    #[error("Package has no '{}' metadata file", PACKAGE_METADATA_FILE)]
    MissingMetadata,
    /// A folder the package format does not define
    #[error("Package contains unexpected entry '{0}'")]
    UnexpectedEntry(String),
    /// Metadata without any workflow documents
    #[error("Package carries no workflow documents")]
    Empty,
    /// Archive could not be read or written
    #[error("Package I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// An entry held malformed JSON
    #[error("Package document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An unpacked workflow package
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub metadata: PackageMetadata,
    /// Exported documents; the first is the one the metadata names
    pub workflows: Vec<WorkflowDocument>,
}

impl Package {
    /// Package a workflow for export
    pub fn new(primary: WorkflowDocument) -> Self {
        Self {
            metadata: PackageMetadata::new(primary.id.clone()),
            workflows: vec![primary],
        }
    }

    /// Bundle a referenced workflow document into the package
    pub fn add_workflow(&mut self, document: WorkflowDocument) {
        self.workflows.push(document);
    }

    /// The document the package metadata names
    pub fn primary(&self) -> Option<&WorkflowDocument> {
        self.workflows.iter().find(|w| w.id == self.metadata.id)
    }
}

/// Write a package archive to `path`
pub fn export_package(path: &Path, package: &Package) -> Result<(), PackageError> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = Builder::new(encoder);

    append_json(&mut builder, PACKAGE_METADATA_FILE, &package.metadata)?;
    for workflow in &package.workflows {
        let name = format!("{}/{}", WORKFLOWS_DIR, workflow.id);
        append_json(&mut builder, &name, workflow)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;
    log::debug!(
        "exported package for workflow {} to {}",
        package.metadata.id,
        path.display()
    );
    Ok(())
}

/// Read a package archive from `path`
///
/// The metadata version is checked the moment the record is read, so
/// an unsupported package fails before any document is parsed.
pub fn import_package(path: &Path) -> Result<Package, PackageError> {
    let file = File::open(path)?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut metadata: Option<PackageMetadata> = None;
    let mut workflows: Vec<WorkflowDocument> = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type().is_dir() {
            continue;
        }
        let entry_path = entry.path()?.into_owned();
        let components: Vec<String> = entry_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        // Entries are routed by their immediate parent folder
        let (file_name, parent) = match components.as_slice() {
            [] => continue,
            [name] => (name.as_str(), None),
            [.., parent, name] => (name.as_str(), Some(parent.as_str())),
        };
        match parent {
            None => {
                if file_name == PACKAGE_METADATA_FILE {
                    let parsed: PackageMetadata = read_json(&mut entry)?;
                    if !parsed.is_supported() {
                        return Err(PackageError::UnsupportedVersion(parsed.version));
                    }
                    metadata = Some(parsed);
                }
            }
            Some(WORKFLOWS_DIR) => workflows.push(read_json(&mut entry)?),
            Some(dir) if FOREIGN_DIRS.contains(&dir) => {
                log::debug!("skipping foreign package entry {}", entry_path.display());
            }
            Some(dir) => return Err(PackageError::UnexpectedEntry(dir.to_string())),
        }
    }

    let metadata = metadata.ok_or(PackageError::MissingMetadata)?;
    if workflows.is_empty() {
        return Err(PackageError::Empty);
    }
    Ok(Package {
        metadata,
        workflows,
    })
}

fn append_json<W: Write, T: Serialize>(
    builder: &mut Builder<W>,
    name: &str,
    value: &T,
) -> Result<(), PackageError> {
    let bytes = serde_json::to_vec(value)?;
    append_bytes(builder, name, &bytes)
}

fn append_bytes<W: Write>(
    builder: &mut Builder<W>,
    name: &str,
    bytes: &[u8],
) -> Result<(), PackageError> {
    let mut header = Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(0o444);
    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    header.set_mtime(mtime);
    header.set_cksum();
    builder.append_data(&mut header, name, bytes)?;
    Ok(())
}

fn read_json<T: DeserializeOwned, R: Read>(entry: &mut R) -> Result<T, PackageError> {
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(serde_json::from_slice(&bytes)?)
}
