//! Gmsh element type table.
//!
//! Gmsh identifies element topologies by a fixed integer id. The id → node
//! count pairs below are part of the file format and must not change; every
//! element record in `$Elements` is sized by looking its type up here.
//!
//! # Supported ids
//! 1–31 (linear, quadratic and higher-order lines, triangles, quads,
//! tetrahedra, hexahedra, prisms, pyramids and the 1-node point) plus the
//! 64- and 125-node hexahedra (92, 93).

use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use std::fmt;

/// Closed set of Gmsh element topologies, discriminants are the Gmsh ids.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum ElementType {
    // Linear
    Line2 = 1,
    Triangle3 = 2,
    Quadrilateral4 = 3,
    Tetrahedron4 = 4,
    Hexahedron8 = 5,
    Prism6 = 6,
    Pyramid5 = 7,
    // Quadratic
    Line3 = 8,
    Triangle6 = 9,
    /// 4 vertex, 4 edge and 1 face node.
    Quadrilateral9 = 10,
    Tetrahedron10 = 11,
    Hexahedron27 = 12,
    Prism18 = 13,
    Pyramid14 = 14,
    Point1 = 15,
    Quadrilateral8 = 16,
    Hexahedron20 = 17,
    Prism15 = 18,
    Pyramid13 = 19,
    // Higher order
    Triangle9 = 20,
    Triangle10 = 21,
    Triangle12 = 22,
    Triangle15 = 23,
    /// Incomplete 15-node (fifth order) triangle.
    Triangle15Incomplete = 24,
    Triangle21 = 25,
    Edge4 = 26,
    Edge5 = 27,
    Edge6 = 28,
    Tetrahedron20 = 29,
    Tetrahedron35 = 30,
    Tetrahedron56 = 31,
    Hexahedron64 = 92,
    Hexahedron125 = 93,
}

impl ElementType {
    /// Every supported type, in ascending id order.
    pub const ALL: [ElementType; 33] = [
        ElementType::Line2,
        ElementType::Triangle3,
        ElementType::Quadrilateral4,
        ElementType::Tetrahedron4,
        ElementType::Hexahedron8,
        ElementType::Prism6,
        ElementType::Pyramid5,
        ElementType::Line3,
        ElementType::Triangle6,
        ElementType::Quadrilateral9,
        ElementType::Tetrahedron10,
        ElementType::Hexahedron27,
        ElementType::Prism18,
        ElementType::Pyramid14,
        ElementType::Point1,
        ElementType::Quadrilateral8,
        ElementType::Hexahedron20,
        ElementType::Prism15,
        ElementType::Pyramid13,
        ElementType::Triangle9,
        ElementType::Triangle10,
        ElementType::Triangle12,
        ElementType::Triangle15,
        ElementType::Triangle15Incomplete,
        ElementType::Triangle21,
        ElementType::Edge4,
        ElementType::Edge5,
        ElementType::Edge6,
        ElementType::Tetrahedron20,
        ElementType::Tetrahedron35,
        ElementType::Tetrahedron56,
        ElementType::Hexahedron64,
        ElementType::Hexahedron125,
    ];

    /// Look up a Gmsh type id.
    pub fn from_id(id: i64) -> Result<Self, MeshError> {
        use ElementType::*;
        let ty = match id {
            1 => Line2,
            2 => Triangle3,
            3 => Quadrilateral4,
            4 => Tetrahedron4,
            5 => Hexahedron8,
            6 => Prism6,
            7 => Pyramid5,
            8 => Line3,
            9 => Triangle6,
            10 => Quadrilateral9,
            11 => Tetrahedron10,
            12 => Hexahedron27,
            13 => Prism18,
            14 => Pyramid14,
            15 => Point1,
            16 => Quadrilateral8,
            17 => Hexahedron20,
            18 => Prism15,
            19 => Pyramid13,
            20 => Triangle9,
            21 => Triangle10,
            22 => Triangle12,
            23 => Triangle15,
            24 => Triangle15Incomplete,
            25 => Triangle21,
            26 => Edge4,
            27 => Edge5,
            28 => Edge6,
            29 => Tetrahedron20,
            30 => Tetrahedron35,
            31 => Tetrahedron56,
            92 => Hexahedron64,
            93 => Hexahedron125,
            _ => return Err(MeshError::UnknownElementType(id)),
        };
        Ok(ty)
    }

    /// The Gmsh type id.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Number of nodes in one element record of this type.
    pub fn node_count(self) -> usize {
        use ElementType::*;
        match self {
            Point1 => 1,
            Line2 => 2,
            Triangle3 | Line3 => 3,
            Quadrilateral4 | Tetrahedron4 | Edge4 => 4,
            Pyramid5 | Edge5 => 5,
            Prism6 | Triangle6 | Edge6 => 6,
            Hexahedron8 | Quadrilateral8 => 8,
            Quadrilateral9 | Triangle9 => 9,
            Tetrahedron10 | Triangle10 => 10,
            Triangle12 => 12,
            Pyramid13 => 13,
            Pyramid14 => 14,
            Prism15 | Triangle15 | Triangle15Incomplete => 15,
            Prism18 => 18,
            Hexahedron20 | Tetrahedron20 => 20,
            Triangle21 => 21,
            Hexahedron27 => 27,
            Tetrahedron35 => 35,
            Tetrahedron56 => 56,
            Hexahedron64 => 64,
            Hexahedron125 => 125,
        }
    }

    /// Reference shape of this type.
    pub fn shape(self) -> CellType {
        use ElementType::*;
        match self {
            Point1 => CellType::Vertex,
            Line2 | Line3 | Edge4 | Edge5 | Edge6 => CellType::Segment,
            Triangle3 | Triangle6 | Triangle9 | Triangle10 | Triangle12 | Triangle15
            | Triangle15Incomplete | Triangle21 => CellType::Triangle,
            Quadrilateral4 | Quadrilateral8 | Quadrilateral9 => CellType::Quadrilateral,
            Tetrahedron4 | Tetrahedron10 | Tetrahedron20 | Tetrahedron35 | Tetrahedron56 => {
                CellType::Tetrahedron
            }
            Hexahedron8 | Hexahedron20 | Hexahedron27 | Hexahedron64 | Hexahedron125 => {
                CellType::Hexahedron
            }
            Prism6 | Prism15 | Prism18 => CellType::Prism,
            Pyramid5 | Pyramid13 | Pyramid14 => CellType::Pyramid,
        }
    }

    /// Topological dimension (0 for points, 3 for volumes).
    pub fn dimension(self) -> u8 {
        self.shape().dimension()
    }

    /// Polynomial order of the geometric interpolation.
    pub fn order(self) -> u8 {
        use ElementType::*;
        match self {
            Point1 => 0,
            Line2 | Triangle3 | Quadrilateral4 | Tetrahedron4 | Hexahedron8 | Prism6
            | Pyramid5 => 1,
            Line3 | Triangle6 | Quadrilateral9 | Tetrahedron10 | Hexahedron27 | Prism18
            | Pyramid14 | Quadrilateral8 | Hexahedron20 | Prism15 | Pyramid13 => 2,
            Triangle9 | Triangle10 | Edge4 | Tetrahedron20 | Hexahedron64 => 3,
            Triangle12 | Triangle15 | Edge5 | Tetrahedron35 | Hexahedron125 => 4,
            Triangle15Incomplete | Triangle21 | Edge6 | Tetrahedron56 => 5,
        }
    }

    /// Upper-case name as used by Gmsh documentation (`TRIANGLE3`, `HEXAHEDRON27`, ...).
    pub fn name(self) -> &'static str {
        use ElementType::*;
        match self {
            Line2 => "LINE2",
            Triangle3 => "TRIANGLE3",
            Quadrilateral4 => "QUADRILATERAL4",
            Tetrahedron4 => "TETRAHEDRON4",
            Hexahedron8 => "HEXAHEDRON8",
            Prism6 => "PRISM6",
            Pyramid5 => "PYRAMID5",
            Line3 => "LINE3",
            Triangle6 => "TRIANGLE6",
            Quadrilateral9 => "QUADRILATERAL9",
            Tetrahedron10 => "TETRAHEDRON10",
            Hexahedron27 => "HEXAHEDRON27",
            Prism18 => "PRISM18",
            Pyramid14 => "PYRAMID14",
            Point1 => "POINT",
            Quadrilateral8 => "QUADRILATERAL8",
            Hexahedron20 => "HEXAHEDRON20",
            Prism15 => "PRISM15",
            Pyramid13 => "PYRAMID13",
            Triangle9 => "TRIANGLE9",
            Triangle10 => "TRIANGLE10",
            Triangle12 => "TRIANGLE12",
            Triangle15 => "TRIANGLE15",
            Triangle15Incomplete => "TRIANGLE15_IC",
            Triangle21 => "TRIANGLE21",
            Edge4 => "EDGE4",
            Edge5 => "EDGE5",
            Edge6 => "EDGE6",
            Tetrahedron20 => "TETRAHEDRON20",
            Tetrahedron35 => "TETRAHEDRON35",
            Tetrahedron56 => "TETRAHEDRON56",
            Hexahedron64 => "HEXAHEDRON64",
            Hexahedron125 => "HEXAHEDRON125",
        }
    }
}

impl TryFrom<i64> for ElementType {
    type Error = MeshError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        ElementType::from_id(id)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node count of a raw Gmsh type id.
pub fn node_count(type_id: i64) -> Result<usize, MeshError> {
    ElementType::from_id(type_id).map(ElementType::node_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_gmsh_numbering() {
        let expected: [(i64, usize); 33] = [
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 4),
            (5, 8),
            (6, 6),
            (7, 5),
            (8, 3),
            (9, 6),
            (10, 9),
            (11, 10),
            (12, 27),
            (13, 18),
            (14, 14),
            (15, 1),
            (16, 8),
            (17, 20),
            (18, 15),
            (19, 13),
            (20, 9),
            (21, 10),
            (22, 12),
            (23, 15),
            (24, 15),
            (25, 21),
            (26, 4),
            (27, 5),
            (28, 6),
            (29, 20),
            (30, 35),
            (31, 56),
            (92, 64),
            (93, 125),
        ];
        for (id, count) in expected {
            assert_eq!(node_count(id).unwrap(), count, "type id {id}");
        }
    }

    #[test]
    fn ids_round_trip_through_the_enum() {
        for ty in ElementType::ALL {
            assert_eq!(ElementType::from_id(ty.id() as i64).unwrap(), ty);
        }
        assert!(ElementType::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        for id in [0, -1, 32, 91, 94, 999] {
            assert!(
                matches!(node_count(id), Err(MeshError::UnknownElementType(got)) if got == id),
                "id {id} should be unknown"
            );
        }
    }

    #[test]
    fn shape_and_order_are_consistent() {
        assert_eq!(ElementType::Hexahedron125.shape(), CellType::Hexahedron);
        assert_eq!(ElementType::Hexahedron125.order(), 4);
        assert_eq!(ElementType::Point1.dimension(), 0);
        assert_eq!(ElementType::Edge6.dimension(), 1);
        assert_eq!(ElementType::Triangle15Incomplete.to_string(), "TRIANGLE15_IC");
        for ty in ElementType::ALL {
            assert!(ty.node_count() >= ty.shape().vertex_count(), "{ty}");
        }
    }
}
