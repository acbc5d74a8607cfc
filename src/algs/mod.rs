//! Partition extraction, interface resolution and the decomposition driver.

pub mod distribute;
pub mod interface;
pub mod submesh;

pub use distribute::Decomposition;
pub use submesh::build;
