//! Mesh I/O: the Gmsh decoder and the per-partition document writers.

pub mod export;
pub mod gmsh;

use crate::mesh_error::MeshError;
use std::io::Read;

/// Trait for mesh readers that decode a byte stream.
pub trait MeshReader {
    /// Decoded representation returned by the reader.
    type Output;

    /// Parse mesh data from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Self::Output, MeshError>;
}
