//! Parse → assemble properties over whole documents.

use std::collections::HashSet;

use scop::mesh::VertexKey;
use scop::objects::{Attribute, ObjError};
use scop::vulkan::{StagedGeometry, VertexLayout};
use scop::{AssembleOptions, AttributeSet, Document, ErrorPolicy};

const CUBE: &str = "\
# unit cube, quads
o cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
g bottom
f 1 4 3 2
g top
f 5 6 7 8
g sides
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

#[test]
fn quad_end_to_end() {
    let document = Document::parse_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
    let mesh = document.assemble(&AssembleOptions::default()).unwrap().mesh;

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
}

#[test]
fn vertex_count_matches_distinct_keys() {
    let document = Document::parse_str(CUBE).unwrap();
    let mesh = document.assemble(&AssembleOptions::default()).unwrap().mesh;

    let keys: HashSet<VertexKey> = document
        .objects
        .iter()
        .flat_map(|object| &object.groups)
        .flat_map(|group| &group.primitives)
        .flat_map(|primitive| primitive.corners().iter().copied().map(VertexKey::from))
        .collect();

    assert_eq!(keys.len(), 8);
    assert_eq!(mesh.vertex_count(), keys.len());
}

#[test]
fn every_polygon_contributes_n_minus_two_triangles() {
    let document = Document::parse_str(
        "v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 2 0\nv -1 1 0\n\
         f 1 2 3\nf 1 2 3 4\nf 1 2 3 4 5\nf 1 2 3 4 5 6\n",
    )
    .unwrap();
    let mesh = document.assemble(&AssembleOptions::default()).unwrap().mesh;

    assert_eq!(mesh.triangle_count(), 1 + 2 + 3 + 4);

    // The hexagon is the last primitive: its triangles all touch corner 0.
    let hexagon = &mesh.indices[mesh.indices.len() - 12..];
    for triangle in hexagon.chunks(3) {
        assert_eq!(triangle[0], 0);
    }
}

#[test]
fn relative_and_absolute_references_agree() {
    let absolute = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\n";
    let relative = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf -3/-1/-1 -2/-1/-1 -1/-1/-1\n";

    let absolute = Document::parse_str(absolute).unwrap();
    let relative = Document::parse_str(relative).unwrap();

    assert_eq!(absolute, relative);
    assert_eq!(
        absolute.assemble(&AssembleOptions::default()).unwrap().mesh,
        relative.assemble(&AssembleOptions::default()).unwrap().mesh
    );
}

#[test]
fn reparsing_is_identical() {
    assert_eq!(
        Document::parse_str(CUBE).unwrap(),
        Document::parse_str(CUBE).unwrap()
    );
}

#[test]
fn two_corner_face_never_parses() {
    let error = Document::parse_str("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
    assert!(matches!(error, ObjError::MalformedRecord { row: 3, .. }));
}

#[test]
fn dangling_reference_identifies_primitive() {
    let document =
        Document::parse_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 0 1\nf 1 2 99\n").unwrap();
    let error = document.assemble(&AssembleOptions::default()).unwrap_err();

    match error {
        ObjError::IndexOutOfRange {
            primitive,
            attribute,
            index,
            len,
        } => {
            assert_eq!(primitive.to_string(), "default/default#0");
            assert_eq!(attribute, Attribute::Position);
            assert_eq!(index, 99);
            assert_eq!(len, 5);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn skip_policy_reports_and_continues() {
    let document = Document::parse_str(&format!("{}g broken\nf 1 2 40\n", CUBE)).unwrap();
    let options = AssembleOptions {
        on_error: ErrorPolicy::Skip,
        ..AssembleOptions::default()
    };

    let assembly = document.assemble(&options).unwrap();
    assert_eq!(assembly.policy, ErrorPolicy::Skip);
    assert_eq!(assembly.skipped.len(), 1);
    assert_eq!(assembly.skipped[0].primitive().unwrap().group, "broken");
    assert_eq!(assembly.mesh.triangle_count(), 12);
}

#[test]
fn textured_mesh_stages_for_upload() {
    let document = Document::parse_str(
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nvn 0 0 1\n\
         f 1/1/1 2/2/1 3/3/1 4/4/1\n",
    )
    .unwrap();
    let mesh = document.assemble(&AssembleOptions::default()).unwrap().mesh;
    assert_eq!(mesh.attributes, AttributeSet::ALL);

    let mut staged = StagedGeometry::new();
    mesh.upload_to(&mut staged).unwrap();

    let layout = staged.layout.unwrap();
    assert_eq!(layout, VertexLayout::new(AttributeSet::ALL));
    assert_eq!(staged.vertices.len(), 4 * layout.floats_per_vertex());
    assert_eq!(staged.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(&staged.vertices[8..16], &[1., 0., 0., 0., 0., 1., 1., 0.]);
}
