use std::ops::{Add, Sub};

/// Upper bound on corners per polygon.
pub const MAX_FACE_POINTS: usize = 8;

/// Name given to objects and groups the source never names.
pub const DEFAULT_NAME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        return Vec2f { x, y };
    }

    pub fn to_array(self) -> [f32; 2] {
        return [self.x, self.y];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3f {
    pub const ZERO: Vec3f = Vec3f::new(0., 0., 0.);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        return Vec3f { x, y, z };
    }

    pub fn to_array(self) -> [f32; 3] {
        return [self.x, self.y, self.z];
    }

    pub fn length(self) -> f32 {
        return (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length == 0. {
            return Vec3f::ZERO;
        }

        return Vec3f::new(self.x / length, self.y / length, self.z / length);
    }
}

impl Add for Vec3f {
    type Output = Vec3f;

    fn add(self, other: Vec3f) -> Vec3f {
        return Vec3f::new(self.x + other.x, self.y + other.y, self.z + other.z);
    }
}

impl Sub for Vec3f {
    type Output = Vec3f;

    fn sub(self, other: Vec3f) -> Vec3f {
        return Vec3f::new(self.x - other.x, self.y - other.y, self.z - other.z);
    }
}

/// One corner of a face: 1-based references into the document lists.
/// A `0` vertex means the reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceCorner {
    pub vertex: usize,
    pub texture_coordinate: Option<usize>,
    pub normal: Option<usize>,
}

impl FaceCorner {
    pub const fn new(vertex: usize, texture_coordinate: Option<usize>, normal: Option<usize>) -> Self {
        return FaceCorner {
            vertex,
            texture_coordinate,
            normal,
        };
    }
}

/// A polygon of at most [`MAX_FACE_POINTS`] corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    corners: [FaceCorner; MAX_FACE_POINTS],
    count: u8,
    smooth: bool,
}

impl Primitive {
    /// Returns `None` when there are more corners than a primitive can hold.
    /// Fewer than three corners is accepted here and rejected at assembly.
    pub fn new(corners: &[FaceCorner], smooth: bool) -> Option<Self> {
        if corners.len() > MAX_FACE_POINTS {
            return None;
        }

        let mut primitive = Primitive {
            corners: [FaceCorner::default(); MAX_FACE_POINTS],
            count: corners.len() as u8,
            smooth,
        };
        primitive.corners[..corners.len()].copy_from_slice(corners);

        return Some(primitive);
    }

    pub fn corners(&self) -> &[FaceCorner] {
        return &self.corners[..self.count as usize];
    }

    pub fn len(&self) -> usize {
        return self.count as usize;
    }

    pub fn is_empty(&self) -> bool {
        return self.count == 0;
    }

    pub fn is_degenerate(&self) -> bool {
        return self.len() < 3;
    }

    pub fn is_smooth(&self) -> bool {
        return self.smooth;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        return Group {
            name: name.to_string(),
            primitives: Vec::new(),
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.primitives.is_empty();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub groups: Vec<Group>,
}

impl Object {
    pub fn new(name: &str) -> Self {
        return Object {
            name: name.to_string(),
            groups: Vec::new(),
        };
    }

    pub fn find_group(&self, name: &str) -> Option<&Group> {
        return self.groups.iter().find(|group| group.name == name);
    }

    pub fn primitive_count(&self) -> usize {
        return self.groups.iter().map(|group| group.primitives.len()).sum();
    }
}

/// A parsed mesh description. Attribute lists are stored 0-indexed and
/// referenced 1-indexed from [`FaceCorner`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub positions: Vec<Vec3f>,
    pub normals: Vec<Vec3f>,
    pub texture_coordinates: Vec<Vec2f>,
    pub objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        return Document::default();
    }

    pub fn find_object(&self, name: &str) -> Option<&Object> {
        return self.objects.iter().find(|object| object.name == name);
    }

    pub fn group_count(&self) -> usize {
        return self.objects.iter().map(|object| object.groups.len()).sum();
    }

    pub fn primitive_count(&self) -> usize {
        return self.objects.iter().map(Object::primitive_count).sum();
    }
}
