use gmsh_partition::io::MeshReader;
use gmsh_partition::io::gmsh::GmshReader;
use gmsh_partition::mesh_error::MeshError;
use gmsh_partition::data::mesh::Ownership;
use gmsh_partition::topology::element_type::ElementType;
use std::io::Cursor;

fn with_version(version: &str) -> String {
    format!(
        "$MeshFormat\n{version} 0 8\n$EndMeshFormat\n\
$Nodes\n2\n1 0 0 0\n2 1 0 0\n$EndNodes\n\
$Elements\n1\n1 1 2 1 1 1 2\n$EndElements\n"
    )
}

#[test]
fn version_boundary_is_inclusive() {
    let reader = GmshReader::default();
    let err = reader
        .read(Cursor::new(with_version("2.1")))
        .expect_err("2.1 must be rejected");
    assert!(
        matches!(err, MeshError::UnsupportedVersion(ref v) if v == "2.1"),
        "unexpected error: {err:?}"
    );

    let data = reader
        .read(Cursor::new(with_version("2.2")))
        .expect("2.2 is supported");
    assert_eq!(data.version.as_deref(), Some("2.2"));
    assert_eq!(data.mesh.element_count(), 1);
}

#[test]
fn unknown_element_type_fails_the_decode() {
    let src = "$Nodes\n1\n1 0 0 0\n$EndNodes\n$Elements\n1\n1 999 2 1 1 1\n$EndElements\n";
    let err = GmshReader.parse_str(src).expect_err("type 999 is unknown");
    assert!(matches!(err, MeshError::UnknownElementType(999)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GmshReader
        .read_path("/nonexistent/definitely/missing.msh")
        .expect_err("file does not exist");
    assert!(matches!(err, MeshError::Io(_)));
}

#[test]
fn higher_order_elements_consume_their_full_record() {
    // A 10-node tetrahedron followed by a point element: if the tet record
    // were mis-sized the point would not decode.
    let src = r#"$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
10
1 0 0 0
2 1 0 0
3 0 1 0
4 0 0 1
5 0.5 0 0
6 0.5 0.5 0
7 0 0.5 0
8 0 0 0.5
9 0 0.5 0.5
10 0.5 0 0.5
$EndNodes
$Elements
2
1 11 2 5 1 1 2 3 4 5 6 7 8 9 10
2 15 2 6 2 4
$EndElements
"#;
    let data = GmshReader.parse_str(src).unwrap();
    let tet = data.mesh.block("physical_5", ElementType::Tetrahedron10).unwrap();
    assert_eq!(tet[0].connectivity.len(), 10);
    let point = data.mesh.block("physical_6", ElementType::Point1).unwrap();
    assert_eq!(point[0].connectivity, vec![4]);
    assert_eq!(point[0].entity, 2);
}

#[test]
fn shared_elements_feed_the_interface_accumulator() {
    let src = r#"$MeshFormat
2.2 0 8
$EndMeshFormat
$PhysicalNames
1
1 1 "Edge"
$EndPhysicalNames
$Nodes
7
1 0 0 0
2 1 0 0
3 2 0 0
4 3 0 0
5 4 0 0
6 5 0 0
7 6 0 0
$EndNodes
$Elements
3
1 2 5 1 0 2 1 -2 4 5 6
2 2 5 1 0 2 2 -1 5 6 7
3 2 4 1 0 1 3 1 2 3
$EndElements
"#;
    let data = GmshReader.parse_str(src).unwrap();
    assert_eq!(data.partition_count, 3);

    let forward: Vec<u64> = data.interfaces.observed(1, 2).unwrap().iter().copied().collect();
    let backward: Vec<u64> = data.interfaces.observed(2, 1).unwrap().iter().copied().collect();
    assert_eq!(forward, vec![4, 5, 6]);
    assert_eq!(backward, vec![5, 6, 7]);

    let block = data.mesh.block("Edge", ElementType::Triangle3).unwrap();
    assert_eq!(block[2].ownership, Ownership::Owned(3));
    assert!(data.interfaces.edge(1, 3).is_none());

    let table = data.interfaces.resolve();
    let groups = table.groups_for(1);
    assert_eq!(groups.len(), 1);
    assert_eq!((groups[0].master, groups[0].slave, groups[0].sign), (1, 2, 1));
    assert_eq!(groups[0].nodes, vec![5, 6]);
    assert_eq!(groups[0].global_start, 0);
}

#[test]
fn unclosed_sections_end_at_end_of_stream() {
    let src = "$MeshFormat\n2.2 0 8\n$Nodes\n1\n1 0 0 0\n";
    let data = GmshReader.parse_str(src).unwrap();
    assert_eq!(data.nodes.len(), 1);
    assert!(data.mesh.is_empty());
}
