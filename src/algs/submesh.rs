//! Partition extraction and local renumbering.
//!
//! [`build`] restricts a decoded [`Mesh`] to the elements one partition owns,
//! computes the sorted local-to-global node map and optionally rewrites
//! connectivity into local ids. The global mesh is never mutated; the
//! returned [`LocalMesh`] holds rebased copies.

use crate::data::mesh::{LocalMesh, Mesh};
use crate::mesh_error::MeshError;
use itertools::Itertools;

/// Whether element connectivity refers to local or global node ids.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum NodalOrdering {
    /// Connectivity indexes the partition's own node list.
    #[default]
    Local,
    /// Connectivity keeps the mesh-wide node ids.
    Global,
}

/// First index used for exported node and element ids.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum IndexingBase {
    Zero,
    #[default]
    One,
}

impl IndexingBase {
    /// Amount subtracted from one-based ids.
    pub fn shift(self) -> u64 {
        match self {
            IndexingBase::Zero => 1,
            IndexingBase::One => 0,
        }
    }
}

/// Options controlling partition extraction and export.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PartitionOptions {
    pub ordering: NodalOrdering,
    pub base: IndexingBase,
    /// Emit node and element index arrays alongside coordinates/connectivity.
    pub print_indices: bool,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            ordering: NodalOrdering::Local,
            base: IndexingBase::One,
            print_indices: true,
        }
    }
}

impl PartitionOptions {
    pub fn local_numbering(&self) -> bool {
        self.ordering == NodalOrdering::Local
    }

    pub fn zero_based(&self) -> bool {
        self.base == IndexingBase::Zero
    }
}

/// Sorted, duplicate-free global node ids referenced by one partition.
///
/// Stored ids are already shifted to the configured [`IndexingBase`]; the
/// position of an id is its local node index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocalToGlobalMap {
    ids: Vec<u64>,
    base: IndexingBase,
}

impl LocalToGlobalMap {
    /// Global ids in local order, shifted to the configured base.
    pub fn as_slice(&self) -> &[u64] {
        &self.ids
    }

    /// Global ids in local order, as they appear in the source file.
    pub fn file_ids(&self) -> impl Iterator<Item = u64> + '_ {
        let shift = self.base.shift();
        self.ids.iter().map(move |&id| id + shift)
    }

    /// Local id of the node the source file calls `global`.
    pub fn local_id(&self, global: u64) -> Option<u64> {
        let shifted = global.checked_sub(self.base.shift())?;
        let pos = self.ids.binary_search(&shifted).ok()? as u64;
        Some(pos + 1 - self.base.shift())
    }

    pub fn base(&self) -> IndexingBase {
        self.base
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Extract the elements owned by `partition` and renumber them.
///
/// Untagged elements belong to partition 1. A partition owning nothing yields
/// an empty mesh and map.
pub fn build(
    mesh: &Mesh,
    partition: u32,
    options: &PartitionOptions,
) -> Result<(LocalMesh, LocalToGlobalMap), MeshError> {
    if partition == 0 {
        return Err(MeshError::InvalidPartition(partition));
    }

    let mut local = LocalMesh::new();
    for ((name, _), elements) in mesh.blocks() {
        for element in elements.iter().filter(|e| e.is_owned_by(partition)) {
            local.push(name.clone(), element.clone());
        }
    }

    let mut ids: Vec<u64> = local
        .elements()
        .flat_map(|e| e.connectivity.iter().copied())
        .sorted_unstable()
        .dedup()
        .collect();

    if options.local_numbering() {
        for block in local.blocks_mut() {
            for element in block.iter_mut() {
                for node in element.connectivity.iter_mut() {
                    let pos = ids
                        .binary_search(node)
                        .map_err(|_| MeshError::MissingNode(*node))?;
                    *node = pos as u64 + 1;
                }
            }
        }
    }

    if options.zero_based() {
        for id in ids.iter_mut() {
            *id -= 1;
        }
        for block in local.blocks_mut() {
            for element in block.iter_mut() {
                element.id -= 1;
                for node in element.connectivity.iter_mut() {
                    *node -= 1;
                }
            }
        }
    }

    log::debug!(
        "partition {partition}: {} elements, {} nodes",
        local.element_count(),
        ids.len()
    );
    Ok((
        local,
        LocalToGlobalMap {
            ids,
            base: options.base,
        },
    ))
}
