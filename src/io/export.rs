//! Per-partition output documents.
//!
//! Each partition is written as one JSON document holding its node block,
//! one block per `(physical group, element type)` and, for decomposed meshes,
//! the local-to-global map and the interface block consumed by FETI-style
//! assembly.

use crate::algs::distribute::LocalPartition;
use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Node coordinates, optionally with their exported ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeBlock {
    pub coordinates: Vec<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u64>>,
}

/// All elements of one `(physical group, element type)` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementBlock {
    pub name: String,
    /// Gmsh element type id.
    #[serde(rename = "Type")]
    pub element_type: i32,
    pub nodal_connectivity: Vec<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u64>>,
}

/// One interface touching the exported partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceBlock {
    pub master: u32,
    pub slave: u32,
    /// `+1` on the master side, `-1` on the slave side.
    pub value: i8,
    /// Interface nodes in the partition's connectivity numbering.
    pub nodal_connectivity: Vec<u64>,
    pub global_start_id: usize,
}

/// Serialized form of one partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshDocument {
    pub nodes: Vec<NodeBlock>,
    pub elements: Vec<ElementBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_to_global_map: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<Vec<InterfaceBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_interface_nodes: Option<usize>,
}

impl MeshDocument {
    /// Build the document for `partition`.
    ///
    /// `distributed` adds the local-to-global map and interface block;
    /// `total_interface_nodes` is the decomposition-wide interface count.
    pub fn from_partition(
        partition: &LocalPartition,
        print_indices: bool,
        distributed: bool,
        total_interface_nodes: usize,
    ) -> Self {
        let nodes = NodeBlock {
            coordinates: partition.nodes.iter().map(|n| n.coordinates).collect(),
            indices: print_indices.then(|| partition.nodes.iter().map(|n| n.id).collect()),
        };

        let elements = partition
            .mesh
            .blocks()
            .map(|((name, element_type), elements)| ElementBlock {
                name: name.clone(),
                element_type: element_type.id(),
                nodal_connectivity: elements.iter().map(|e| e.connectivity.clone()).collect(),
                indices: print_indices.then(|| elements.iter().map(|e| e.id).collect()),
            })
            .collect();

        let (local_to_global_map, interface, num_interface_nodes) = if distributed {
            let interface = partition
                .interfaces
                .iter()
                .map(|group| InterfaceBlock {
                    master: group.master,
                    slave: group.slave,
                    value: group.sign,
                    nodal_connectivity: group.nodes.clone(),
                    global_start_id: group.global_start,
                })
                .collect();
            (
                Some(partition.map.as_slice().to_vec()),
                Some(interface),
                Some(total_interface_nodes),
            )
        } else {
            (None, None, None)
        };

        MeshDocument {
            nodes: vec![nodes],
            elements,
            local_to_global_map,
            interface,
            num_interface_nodes,
        }
    }
}

/// Serialize `document` as pretty-printed JSON.
pub fn write_document<W: Write>(writer: W, document: &MeshDocument) -> Result<(), MeshError> {
    serde_json::to_writer_pretty(writer, document)?;
    Ok(())
}

/// Parse a document previously written by [`write_document`].
pub fn read_document(bytes: &[u8]) -> Result<MeshDocument, MeshError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Output path: `<prefix>.mesh` for a single partition, `<prefix>_<rank>.mesh`
/// otherwise, where `rank = partition - 1`.
pub fn document_path(dir: &Path, prefix: &str, partition: u32, distributed: bool) -> PathBuf {
    if distributed {
        dir.join(format!("{prefix}_{}.mesh", partition.saturating_sub(1)))
    } else {
        dir.join(format!("{prefix}.mesh"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_partition_paths_have_no_rank() {
        let dir = Path::new("out");
        assert_eq!(document_path(dir, "beam", 1, false), dir.join("beam.mesh"));
        assert_eq!(document_path(dir, "beam", 3, true), dir.join("beam_2.mesh"));
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let doc = MeshDocument {
            nodes: vec![NodeBlock {
                coordinates: vec![[0.0, 1.0, 2.0]],
                indices: None,
            }],
            elements: vec![ElementBlock {
                name: "Skin".into(),
                element_type: 2,
                nodal_connectivity: vec![vec![1, 2, 3]],
                indices: None,
            }],
            local_to_global_map: None,
            interface: None,
            num_interface_nodes: None,
        };
        let mut out = Vec::new();
        write_document(&mut out, &doc).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.contains("\"NodalConnectivity\""));
        assert!(text.contains("\"Type\": 2"));
        assert!(!text.contains("Indices"));
        assert!(!text.contains("LocalToGlobalMap"));
        assert_eq!(read_document(&out).unwrap(), doc);
    }
}
