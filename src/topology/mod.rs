//! Element topology: shape families and the Gmsh element type table.

pub mod cell_type;
pub mod element_type;

pub use cell_type::CellType;
pub use element_type::{node_count, ElementType};
