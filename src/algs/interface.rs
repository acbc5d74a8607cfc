//! Interface node resolution between partitions.
//!
//! While decoding, every shared element contributes its nodes to the
//! partition pair `(owner, sharer)`. A pair of partitions is stored once as an
//! undirected edge holding both directed views, so the `(a, b)` / `(b, a)`
//! lookups used for the intersection can never drift apart.
//!
//! [`InterfaceAccumulator::resolve`] runs once for the whole decomposition and
//! assigns each interface a global start offset; every partition's export then
//! reads from the same [`InterfaceTable`].

use crate::data::mesh::Element;
use std::collections::{BTreeMap, BTreeSet};

/// Node sets observed for one unordered partition pair `(master, slave)`, `master < slave`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InterfaceEdge {
    /// Nodes of elements owned by `master` and shared with `slave`.
    pub master_view: BTreeSet<u64>,
    /// Nodes of elements owned by `slave` and shared with `master`.
    pub slave_view: BTreeSet<u64>,
}

impl InterfaceEdge {
    /// Nodes seen from both sides.
    pub fn intersection(&self) -> Vec<u64> {
        self.master_view
            .intersection(&self.slave_view)
            .copied()
            .collect()
    }
}

/// Accumulates shared boundary nodes per partition pair during decoding.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InterfaceAccumulator {
    edges: BTreeMap<(u32, u32), InterfaceEdge>,
}

impl InterfaceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `nodes` into the set observed for `(owner, sharer)`.
    pub fn record(&mut self, owner: u32, sharer: u32, nodes: &[u64]) {
        if owner == sharer {
            return;
        }
        let key = (owner.min(sharer), owner.max(sharer));
        let edge = self.edges.entry(key).or_default();
        let view = if owner < sharer {
            &mut edge.master_view
        } else {
            &mut edge.slave_view
        };
        view.extend(nodes.iter().copied());
    }

    /// Record a decoded element; unshared elements are ignored.
    pub fn record_element(&mut self, element: &Element) {
        let owner = element.ownership.owner();
        for &sharer in element.ownership.sharers() {
            self.record(owner, sharer, &element.connectivity);
        }
    }

    /// Directed view: nodes recorded with `owner` owning and `sharer` sharing.
    pub fn observed(&self, owner: u32, sharer: u32) -> Option<&BTreeSet<u64>> {
        let edge = self.edge(owner, sharer)?;
        Some(if owner < sharer {
            &edge.master_view
        } else {
            &edge.slave_view
        })
    }

    /// The undirected edge between two partitions, in either argument order.
    pub fn edge(&self, a: u32, b: u32) -> Option<&InterfaceEdge> {
        self.edges.get(&(a.min(b), a.max(b)))
    }

    /// Iterate over `((master, slave), edge)` in ascending pair order.
    pub fn edges(&self) -> impl Iterator<Item = ((u32, u32), &InterfaceEdge)> + '_ {
        self.edges.iter().map(|(&k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Intersect every edge and assign global start offsets in `(master, slave)` order.
    pub fn resolve(&self) -> InterfaceTable {
        let mut interfaces = Vec::with_capacity(self.edges.len());
        let mut running = 0usize;
        for (&(master, slave), edge) in &self.edges {
            let nodes = edge.intersection();
            let global_start = running;
            running += nodes.len();
            interfaces.push(Interface {
                master,
                slave,
                nodes,
                global_start,
            });
        }
        log::debug!(
            "resolved {} interfaces with {} interface nodes",
            interfaces.len(),
            running
        );
        InterfaceTable {
            interfaces,
            total_nodes: running,
        }
    }
}

/// One resolved interface between `master < slave`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interface {
    pub master: u32,
    pub slave: u32,
    /// Sorted global node ids seen by both partitions.
    pub nodes: Vec<u64>,
    /// Offset of this interface's first node in the decomposition-wide numbering.
    pub global_start: usize,
}

/// An interface as seen from one partition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterfaceGroup {
    pub master: u32,
    pub slave: u32,
    /// `+1` when the requesting partition is the master, `-1` when it is the slave.
    pub sign: i8,
    pub nodes: Vec<u64>,
    pub global_start: usize,
}

/// Globally resolved interfaces, shared read-only by every partition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InterfaceTable {
    interfaces: Vec<Interface>,
    total_nodes: usize,
}

impl InterfaceTable {
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// Sum of interface node counts over the whole decomposition.
    pub fn total_nodes(&self) -> usize {
        self.total_nodes
    }

    /// Interfaces touching `partition`, in ascending `(master, slave)` order.
    pub fn groups_for(&self, partition: u32) -> Vec<InterfaceGroup> {
        self.interfaces
            .iter()
            .filter(|i| i.master == partition || i.slave == partition)
            .map(|i| InterfaceGroup {
                master: i.master,
                slave: i.slave,
                sign: if i.master == partition { 1 } else { -1 },
                nodes: i.nodes.clone(),
                global_start: i.global_start,
            })
            .collect()
    }
}

/// Resolve `accumulator` and return the groups for one partition.
///
/// Offsets are still computed over the whole decomposition; when exporting
/// several partitions, resolve once and call [`InterfaceTable::groups_for`].
pub fn resolve(accumulator: &InterfaceAccumulator, partition: u32) -> Vec<InterfaceGroup> {
    accumulator.resolve().groups_for(partition)
}
