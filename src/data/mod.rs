//! Decoded mesh data: nodes, elements, physical groups.

pub mod mesh;
