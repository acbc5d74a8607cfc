//! # gmsh-partition
//!
//! gmsh-partition decodes Gmsh ASCII meshes (format 2.2 and newer 2.x files)
//! and splits a partitioned mesh into independent, locally numbered sub-meshes
//! together with the inter-partition interface metadata needed by
//! domain-decomposition (FETI-style) solvers.
//!
//! ## Pipeline
//! 1. [`io::gmsh::GmshReader`] decodes nodes, physical names and elements,
//!    accumulating the nodes shared between every pair of partitions.
//! 2. [`algs::distribute::Decomposition`] resolves the interface table once
//!    for the whole mesh.
//! 3. Each partition is extracted by [`algs::submesh::build`], renumbered to
//!    local (optionally zero-based) ids and exported as an
//!    [`io::export::MeshDocument`].
//!
//! ## Features
//! - `rayon`: build partition documents in parallel.
//!
//! ## Usage
//! ```no_run
//! use gmsh_partition::prelude::*;
//!
//! # fn main() -> Result<(), MeshError> {
//! let data = GmshReader.read_path("beam.msh")?;
//! let decomposition = Decomposition::new(&data, PartitionOptions::default());
//! decomposition.write_all("out", "beam")?;
//! # Ok(())
//! # }
//! ```

pub mod algs;
pub mod data;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::distribute::{Decomposition, LocalPartition};
    pub use crate::algs::interface::{InterfaceAccumulator, InterfaceGroup, InterfaceTable};
    pub use crate::algs::submesh::{IndexingBase, LocalToGlobalMap, NodalOrdering, PartitionOptions};
    pub use crate::data::mesh::{Element, LocalMesh, Mesh, Node, Ownership, PhysicalGroups};
    pub use crate::io::MeshReader;
    pub use crate::io::export::MeshDocument;
    pub use crate::io::gmsh::{GmshData, GmshReader};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::element_type::ElementType;
}
