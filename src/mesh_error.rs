//! MeshError: Unified error type for gmsh-partition public APIs
//!
//! Every decode, partition and export entry point returns this error so that
//! callers can match on a single enum. All variants are fatal to the file or
//! document being processed; nothing is retried.

use thiserror::Error;

/// Unified error type for decoding and decomposition.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The input file is missing or unreadable, or an output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The `$MeshFormat` version is older than the minimum supported `2.2`.
    #[error("Gmsh version {0} is not supported (minimum 2.2)")]
    UnsupportedVersion(String),
    /// An element record names a type id outside the topology table.
    #[error("element type id {0} is not a known Gmsh element type")]
    UnknownElementType(i64),
    /// The token stream does not have the shape the current section expects.
    #[error("malformed {section} section: {detail}")]
    MalformedSection {
        section: &'static str,
        detail: String,
    },
    /// Partition ids start at 1.
    #[error("invalid partition id {0} (partition ids start at 1)")]
    InvalidPartition(u32),
    /// A connectivity entry refers to a node that was never declared.
    #[error("node {0} is referenced by an element but missing from $Nodes")]
    MissingNode(u64),
    /// Output document could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl MeshError {
    pub(crate) fn malformed(section: &'static str, detail: impl Into<String>) -> Self {
        MeshError::MalformedSection {
            section,
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(e: serde_json::Error) -> Self {
        MeshError::Serialize(e.to_string())
    }
}
