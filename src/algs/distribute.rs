//! Split a decoded Gmsh mesh into per-partition documents.
//!
//! [`Decomposition::new`] resolves the interface table once; every call to
//! [`Decomposition::partition`] reads that shared table, so all partitions
//! agree on the global numbering of interface nodes. Partitions are
//! independent of each other and, with the `rayon` feature, are built in
//! parallel by [`Decomposition::documents`].

use crate::algs::interface::{InterfaceGroup, InterfaceTable};
use crate::algs::submesh::{self, LocalToGlobalMap, PartitionOptions};
use crate::data::mesh::{LocalMesh, Node};
use crate::io::export::{self, MeshDocument};
use crate::io::gmsh::GmshData;
use crate::mesh_error::MeshError;
use hashbrown::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Everything one partition needs for export.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalPartition {
    pub partition: u32,
    pub mesh: LocalMesh,
    pub map: LocalToGlobalMap,
    /// Local nodes in map order; `id` is the exported node id.
    pub nodes: Vec<Node>,
    /// Interfaces touching this partition, nodes in connectivity numbering.
    pub interfaces: Vec<InterfaceGroup>,
}

/// Read-only view over a decoded mesh ready to be split.
#[derive(Debug)]
pub struct Decomposition<'a> {
    data: &'a GmshData,
    options: PartitionOptions,
    interfaces: InterfaceTable,
    node_index: HashMap<u64, usize>,
}

impl<'a> Decomposition<'a> {
    pub fn new(data: &'a GmshData, options: PartitionOptions) -> Self {
        let node_index = data
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        Self {
            data,
            options,
            interfaces: data.interfaces.resolve(),
            node_index,
        }
    }

    pub fn options(&self) -> &PartitionOptions {
        &self.options
    }

    pub fn partition_count(&self) -> u32 {
        self.data.partition_count
    }

    /// Whether the mesh carries more than one partition.
    pub fn is_distributed(&self) -> bool {
        self.data.partition_count > 1
    }

    /// The decomposition-wide interface table.
    pub fn interfaces(&self) -> &InterfaceTable {
        &self.interfaces
    }

    /// Extract partition `partition` (1-based).
    pub fn partition(&self, partition: u32) -> Result<LocalPartition, MeshError> {
        let (mesh, map) = submesh::build(&self.data.mesh, partition, &self.options)?;
        if mesh.is_empty() {
            log::warn!("partition {partition} owns no elements");
        }

        let local_ids = self.options.local_numbering();
        let shift = self.options.base.shift();

        let nodes = map
            .file_ids()
            .enumerate()
            .map(|(pos, global)| -> Result<Node, MeshError> {
                let idx = *self
                    .node_index
                    .get(&global)
                    .ok_or(MeshError::MissingNode(global))?;
                let id = if local_ids {
                    pos as u64 + 1 - shift
                } else {
                    global - shift
                };
                Ok(Node {
                    id,
                    coordinates: self.data.nodes[idx].coordinates,
                })
            })
            .collect::<Result<Vec<_>, MeshError>>()?;

        let interfaces = self
            .interfaces
            .groups_for(partition)
            .into_iter()
            .map(|mut group| -> Result<InterfaceGroup, MeshError> {
                group.nodes = group
                    .nodes
                    .iter()
                    .map(|&global| {
                        if local_ids {
                            map.local_id(global).ok_or(MeshError::MissingNode(global))
                        } else {
                            Ok(global - shift)
                        }
                    })
                    .collect::<Result<Vec<_>, MeshError>>()?;
                Ok(group)
            })
            .collect::<Result<Vec<_>, MeshError>>()?;

        Ok(LocalPartition {
            partition,
            mesh,
            map,
            nodes,
            interfaces,
        })
    }

    /// Build the output document for one partition.
    pub fn document(&self, partition: u32) -> Result<MeshDocument, MeshError> {
        let local = self.partition(partition)?;
        Ok(MeshDocument::from_partition(
            &local,
            self.options.print_indices,
            self.is_distributed(),
            self.interfaces.total_nodes(),
        ))
    }

    /// Documents for partitions `1..=partition_count`, in partition order.
    pub fn documents(&self) -> Result<Vec<(u32, MeshDocument)>, MeshError> {
        let partitions: Vec<u32> = (1..=self.partition_count()).collect();

        #[cfg(feature = "rayon")]
        let iter = partitions.into_par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = partitions.into_iter();

        iter.map(|p| self.document(p).map(|doc| (p, doc))).collect()
    }

    /// Write every partition document into `dir`, returning the paths written.
    pub fn write_all(&self, dir: impl AsRef<Path>, prefix: &str) -> Result<Vec<PathBuf>, MeshError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (partition, document) in self.documents()? {
            let path = export::document_path(dir, prefix, partition, self.is_distributed());
            let file = BufWriter::new(File::create(&path)?);
            export::write_document(file, &document)?;
            log::info!("wrote partition {partition} to {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
