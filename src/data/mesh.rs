//! In-memory mesh produced by the Gmsh decoder.
//!
//! Elements are grouped by `(physical group name, element type)`. Ordering
//! across keys is the `BTreeMap` order; within a key elements keep file order
//! so exported documents are deterministic.

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A mesh node as declared in `$Nodes`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub id: u64,
    pub coordinates: [f64; 3],
}

/// Partition ownership decoded from an element's tag tail.
///
/// Gmsh 2.2 stores `[physical, elementary, n_partitions, owner, -ghost...]`;
/// this enum replaces the flat encoding once decoding is done.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Ownership {
    /// No partition tags at all.
    #[default]
    Unpartitioned,
    /// Owned by a single partition and not shared.
    Owned(u32),
    /// Owned by `owner` and duplicated as a ghost in every `sharers` partition.
    Shared { owner: u32, sharers: Vec<u32> },
}

/// Owner assumed for elements without partition tags.
pub const DEFAULT_PARTITION: u32 = 1;

impl Ownership {
    /// Decode the partition part of a Gmsh tag list.
    pub fn from_tags(tags: &[i64]) -> Result<Self, MeshError> {
        let count = match tags.get(2) {
            Some(&n) if n > 0 => n as usize,
            _ => return Ok(Ownership::Unpartitioned),
        };
        let Some(&owner) = tags.get(3) else {
            return Ok(Ownership::Unpartitioned);
        };
        let owner = partition_from_tag(owner)?;
        let end = tags.len().min(4 + count);
        let mut sharers: Vec<u32> = Vec::new();
        for &tag in tags.get(4..end).unwrap_or_default() {
            if tag >= 0 {
                continue;
            }
            let sharer = partition_from_tag(-tag)?;
            if sharer != owner && !sharers.contains(&sharer) {
                sharers.push(sharer);
            }
        }
        if sharers.is_empty() {
            Ok(Ownership::Owned(owner))
        } else {
            Ok(Ownership::Shared { owner, sharers })
        }
    }

    /// Owning partition, with untagged elements assigned to partition 1.
    pub fn owner(&self) -> u32 {
        match self {
            Ownership::Unpartitioned => DEFAULT_PARTITION,
            Ownership::Owned(p) => *p,
            Ownership::Shared { owner, .. } => *owner,
        }
    }

    /// Partitions holding a ghost copy of the element.
    pub fn sharers(&self) -> &[u32] {
        match self {
            Ownership::Shared { sharers, .. } => sharers,
            _ => &[],
        }
    }

    /// Largest partition id mentioned, if any partition tag was present.
    pub fn max_partition(&self) -> Option<u32> {
        match self {
            Ownership::Unpartitioned => None,
            Ownership::Owned(p) => Some(*p),
            Ownership::Shared { owner, sharers } => {
                sharers.iter().copied().chain(std::iter::once(*owner)).max()
            }
        }
    }
}

fn partition_from_tag(tag: i64) -> Result<u32, MeshError> {
    u32::try_from(tag)
        .ok()
        .filter(|&p| p > 0)
        .ok_or_else(|| MeshError::malformed("Elements", format!("invalid partition tag {tag}")))
}

/// One element record.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: u64,
    pub element_type: ElementType,
    /// Physical group id (`tags[0]`, 0 when the record carries no tags).
    pub physical: i64,
    /// Elementary geometric entity (`tags[1]`).
    pub entity: i64,
    pub ownership: Ownership,
    /// Node ids, `element_type.node_count()` entries.
    pub connectivity: Vec<u64>,
}

impl Element {
    /// Whether `partition` owns this element.
    pub fn is_owned_by(&self, partition: u32) -> bool {
        self.ownership.owner() == partition
    }
}

/// A named physical group from `$PhysicalNames`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhysicalGroup {
    pub dimension: i64,
    pub name: String,
}

/// Physical group id → name table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PhysicalGroups {
    groups: BTreeMap<i64, PhysicalGroup>,
}

impl PhysicalGroups {
    pub fn insert(&mut self, id: i64, dimension: i64, name: impl Into<String>) {
        self.groups.insert(
            id,
            PhysicalGroup {
                dimension,
                name: name.into(),
            },
        );
    }

    pub fn get(&self, id: i64) -> Option<&PhysicalGroup> {
        self.groups.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.groups.contains_key(&id)
    }

    /// Name of group `id`, or `physical_<id>` when the id was never declared.
    pub fn name(&self, id: i64) -> Cow<'_, str> {
        match self.groups.get(&id) {
            Some(group) => Cow::Borrowed(group.name.as_str()),
            None => Cow::Owned(format!("physical_{id}")),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &PhysicalGroup)> + '_ {
        self.groups.iter().map(|(&id, group)| (id, group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Key of an element block.
pub type BlockKey = (String, ElementType);

/// Elements grouped by `(physical name, element type)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    blocks: BTreeMap<BlockKey, Vec<Element>>,
}

/// A mesh restricted to the elements one partition owns.
pub type LocalMesh = Mesh;

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` to the block `(name, element.element_type)`.
    pub fn push(&mut self, name: impl Into<String>, element: Element) {
        self.blocks
            .entry((name.into(), element.element_type))
            .or_default()
            .push(element);
    }

    pub fn block(&self, name: &str, element_type: ElementType) -> Option<&[Element]> {
        self.blocks
            .get(&(name.to_string(), element_type))
            .map(Vec::as_slice)
    }

    /// Iterate over `(key, elements)` in key order.
    pub fn blocks(&self) -> impl Iterator<Item = (&BlockKey, &[Element])> + '_ {
        self.blocks.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub(crate) fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Vec<Element>> + '_ {
        self.blocks.values_mut()
    }

    /// Iterate over every element of every block.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.blocks.values().flatten()
    }

    /// Number of element blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of elements across all blocks.
    pub fn element_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_from_tags() {
        assert_eq!(Ownership::from_tags(&[1, 2]).unwrap(), Ownership::Unpartitioned);
        assert_eq!(Ownership::from_tags(&[1, 2, 0]).unwrap(), Ownership::Unpartitioned);
        assert_eq!(Ownership::from_tags(&[1, 2, 1, 3]).unwrap(), Ownership::Owned(3));
        assert_eq!(
            Ownership::from_tags(&[1, 0, 2, 1, -2]).unwrap(),
            Ownership::Shared {
                owner: 1,
                sharers: vec![2]
            }
        );
        // tail longer than the declared partition count is ignored
        assert_eq!(
            Ownership::from_tags(&[1, 0, 2, 1, -2, -3, -4, -5, -6]).unwrap(),
            Ownership::Shared {
                owner: 1,
                sharers: vec![2, 3]
            }
        );
    }

    #[test]
    fn ownership_rejects_non_positive_owner() {
        assert!(matches!(
            Ownership::from_tags(&[1, 0, 1, 0]),
            Err(MeshError::MalformedSection { .. })
        ));
    }

    #[test]
    fn untagged_elements_default_to_partition_one() {
        let own = Ownership::Unpartitioned;
        assert_eq!(own.owner(), DEFAULT_PARTITION);
        assert_eq!(own.max_partition(), None);
        let shared = Ownership::Shared {
            owner: 2,
            sharers: vec![5, 1],
        };
        assert_eq!(shared.max_partition(), Some(5));
        assert_eq!(shared.sharers(), &[5, 1]);
    }

    #[test]
    fn undeclared_physical_names_are_synthesized() {
        let mut groups = PhysicalGroups::default();
        groups.insert(3, 2, "Skin");
        assert_eq!(groups.name(3), "Skin");
        assert_eq!(groups.name(7), "physical_7");
        assert!(!groups.contains(7));
    }

    #[test]
    fn mesh_keeps_append_order_within_a_block() {
        let mut mesh = Mesh::new();
        for id in [3, 1, 2] {
            mesh.push(
                "Skin",
                Element {
                    id,
                    element_type: ElementType::Line2,
                    physical: 1,
                    entity: 1,
                    ownership: Ownership::Unpartitioned,
                    connectivity: vec![1, 2],
                },
            );
        }
        let ids: Vec<u64> = mesh
            .block("Skin", ElementType::Line2)
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.element_count(), 3);
    }
}
