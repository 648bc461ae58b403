use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use crate::mesh::buffers::{AttributeSet, MeshBuffers};
use crate::mesh::triangulate::fan;
use crate::objects::{
    Attribute, Document, FaceCorner, ObjError, Primitive, PrimitiveId, Result, Vec3f,
    MAX_FACE_POINTS,
};

/// Restricts assembly to matching objects and groups. `None` matches any name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub object: Option<String>,
    pub group: Option<String>,
}

impl Selection {
    pub fn all() -> Self {
        return Selection::default();
    }

    pub fn object(name: &str) -> Self {
        return Selection {
            object: Some(name.to_string()),
            group: None,
        };
    }

    pub fn group(object: Option<&str>, group: &str) -> Self {
        return Selection {
            object: object.map(str::to_string),
            group: Some(group.to_string()),
        };
    }

    fn matches(filter: &Option<String>, name: &str) -> bool {
        return filter.as_deref().map_or(true, |wanted| wanted == name);
    }
}

/// How far the vertex cache reaches before it is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupScope {
    /// One cache for the whole assembly call.
    #[default]
    Assembly,
    Object,
    Group,
}

/// What happens when a primitive fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the first failure; nothing is assembled.
    #[default]
    Abort,
    /// Drop the primitive, record the failure, keep going.
    Skip,
}

/// What to do when some corners carry no normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalPolicy {
    /// Leave normals out of the whole mesh.
    #[default]
    Omit,
    /// Give normal-less corners the normal of their own face.
    Flat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    pub selection: Selection,
    pub dedup: DedupScope,
    pub on_error: ErrorPolicy,
    pub normals: NormalPolicy,
}

/// The index triple that identifies one output vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub vertex: usize,
    pub texture_coordinate: Option<usize>,
    pub normal: Option<usize>,
}

impl From<FaceCorner> for VertexKey {
    fn from(corner: FaceCorner) -> Self {
        return VertexKey {
            vertex: corner.vertex,
            texture_coordinate: corner.texture_coordinate,
            normal: corner.normal,
        };
    }
}

#[derive(Debug)]
pub struct Assembly {
    pub mesh: MeshBuffers,
    /// The error policy this result was produced under.
    pub policy: ErrorPolicy,
    /// Failures of primitives dropped under [`ErrorPolicy::Skip`].
    pub skipped: Vec<ObjError>,
}

struct Accepted<'a> {
    object: usize,
    group: usize,
    primitive: &'a Primitive,
}

impl Document {
    pub fn assemble(&self, options: &AssembleOptions) -> Result<Assembly> {
        return assemble(self, options);
    }
}

/// Flattens the selected primitives of `document` into one deduplicated
/// vertex stream and a fan-triangulated index list.
pub fn assemble(document: &Document, options: &AssembleOptions) -> Result<Assembly> {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    for (object_index, object) in document.objects.iter().enumerate() {
        if !Selection::matches(&options.selection.object, &object.name) {
            continue;
        }

        for (group_index, group) in object.groups.iter().enumerate() {
            if !Selection::matches(&options.selection.group, &group.name) {
                continue;
            }

            for (ordinal, primitive) in group.primitives.iter().enumerate() {
                let id = || PrimitiveId {
                    object: object.name.clone(),
                    group: group.name.clone(),
                    ordinal,
                };

                match validate(document, primitive, id) {
                    Ok(()) => accepted.push(Accepted {
                        object: object_index,
                        group: group_index,
                        primitive,
                    }),

                    Err(error) => match options.on_error {
                        ErrorPolicy::Abort => {
                            return Err(error);
                        }

                        ErrorPolicy::Skip => {
                            warn!("skipping {}", error);
                            skipped.push(error);
                        }
                    },
                }
            }
        }
    }

    let every_corner = |has: fn(&FaceCorner) -> bool| {
        !accepted.is_empty()
            && accepted
                .iter()
                .all(|entry| entry.primitive.corners().iter().all(has))
    };
    let has_normals = every_corner(|corner| corner.normal.is_some());
    let has_texture_coordinates = every_corner(|corner| corner.texture_coordinate.is_some());
    let flat = options.normals == NormalPolicy::Flat && !has_normals && !accepted.is_empty();

    let mut mesh = MeshBuffers {
        attributes: AttributeSet {
            position: true,
            normal: has_normals || flat,
            texture_coordinate: has_texture_coordinates,
        },
        ..MeshBuffers::default()
    };

    // Corners given a synthesized normal are keyed by their primitive too.
    let mut cache: HashMap<(VertexKey, Option<usize>), u32> = HashMap::new();
    let mut scope = None;

    for (serial, entry) in accepted.iter().enumerate() {
        let entry_scope = match options.dedup {
            DedupScope::Assembly => (0, 0),
            DedupScope::Object => (entry.object, 0),
            DedupScope::Group => (entry.object, entry.group),
        };
        if scope != Some(entry_scope) {
            cache.clear();
            scope = Some(entry_scope);
        }

        let corners = entry.primitive.corners();
        let flat_normal = if flat && corners.iter().any(|corner| corner.normal.is_none()) {
            face_normal(document, entry.primitive)
        } else {
            Vec3f::ZERO
        };

        let mut local = [0u32; MAX_FACE_POINTS];
        for (i, corner) in corners.iter().enumerate() {
            let synthesized = match (flat, corner.normal) {
                (true, None) => Some(serial),
                _ => None,
            };

            local[i] = match cache.entry((VertexKey::from(*corner), synthesized)) {
                Entry::Occupied(slot) => *slot.get(),

                Entry::Vacant(slot) => {
                    let index = u32::try_from(mesh.positions.len()).map_err(|_| {
                        ObjError::malformed(0, "mesh has more vertices than u32 indices can address")
                    })?;
                    push_vertex(document, &mut mesh, corner, flat_normal);
                    *slot.insert(index)
                }
            };
        }

        for triangle in fan(corners.len()) {
            mesh.indices.extend(triangle.map(|corner| local[corner]));
        }
    }

    debug!(
        "assembled {} vertices, {} triangles ({}), skipped {} primitives",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.attributes,
        skipped.len()
    );

    return Ok(Assembly {
        mesh,
        policy: options.on_error,
        skipped,
    });
}

fn validate(
    document: &Document,
    primitive: &Primitive,
    id: impl Fn() -> PrimitiveId,
) -> Result<()> {
    if primitive.is_degenerate() {
        return Err(ObjError::DegeneratePrimitive {
            primitive: id(),
            count: primitive.len(),
        });
    }

    for corner in primitive.corners() {
        let references = [
            (Attribute::Position, Some(corner.vertex), document.positions.len()),
            (
                Attribute::TextureCoordinate,
                corner.texture_coordinate,
                document.texture_coordinates.len(),
            ),
            (Attribute::Normal, corner.normal, document.normals.len()),
        ];

        for (attribute, index, len) in references {
            let Some(index) = index else {
                continue;
            };

            if index == 0 || index > len {
                return Err(ObjError::IndexOutOfRange {
                    primitive: id(),
                    attribute,
                    index,
                    len,
                });
            }
        }
    }

    return Ok(());
}

/// Indices were validated, so every lookup is in range.
fn push_vertex(document: &Document, mesh: &mut MeshBuffers, corner: &FaceCorner, face_normal: Vec3f) {
    mesh.positions.push(document.positions[corner.vertex - 1]);

    if mesh.attributes.normal {
        let normal = match corner.normal {
            Some(index) => document.normals[index - 1],
            None => face_normal,
        };
        mesh.normals.push(normal);
    }

    if mesh.attributes.texture_coordinate {
        if let Some(index) = corner.texture_coordinate {
            mesh.texture_coordinates
                .push(document.texture_coordinates[index - 1]);
        }
    }
}

/// Newell's method.
fn face_normal(document: &Document, primitive: &Primitive) -> Vec3f {
    let corners = primitive.corners();
    let mut normal = Vec3f::ZERO;

    for (i, corner) in corners.iter().enumerate() {
        let current = document.positions[corner.vertex - 1];
        let next = document.positions[corners[(i + 1) % corners.len()].vertex - 1];

        let d = current - next;
        let s = current + next;
        normal = normal + Vec3f::new(d.y * s.z, d.z * s.x, d.x * s.y);
    }

    return normal.normalize();
}
