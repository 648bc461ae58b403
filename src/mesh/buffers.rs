use std::fmt;

use crate::objects::{Vec2f, Vec3f};

/// Which vertex attributes an assembled mesh carries. Positions are
/// always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSet {
    pub position: bool,
    pub normal: bool,
    pub texture_coordinate: bool,
}

impl AttributeSet {
    pub const POSITION: AttributeSet = AttributeSet {
        position: true,
        normal: false,
        texture_coordinate: false,
    };

    pub const ALL: AttributeSet = AttributeSet {
        position: true,
        normal: true,
        texture_coordinate: true,
    };
}

impl Default for AttributeSet {
    fn default() -> Self {
        return AttributeSet::POSITION;
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.position {
            names.push("position");
        }
        if self.normal {
            names.push("normal");
        }
        if self.texture_coordinate {
            names.push("texcoord");
        }

        return f.write_str(&names.join("+"));
    }
}

/// CPU-side geometry ready for upload: per-vertex attribute arrays of equal
/// length (absent attributes are empty) and a triangle list of indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshBuffers {
    pub attributes: AttributeSet,
    pub positions: Vec<Vec3f>,
    pub normals: Vec<Vec3f>,
    pub texture_coordinates: Vec<Vec2f>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        return self.positions.len();
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> usize {
        return self.indices.len();
    }

    pub fn triangle_count(&self) -> usize {
        return self.indices.len() / 3;
    }

    pub fn is_empty(&self) -> bool {
        return self.indices.is_empty();
    }

    pub fn upload_to<S: GeometrySink>(&self, sink: &mut S) -> Result<(), S::Error> {
        return sink.upload(self);
    }
}

/// Receives assembled geometry on the way to a rendering backend.
pub trait GeometrySink {
    type Error;

    fn upload(&mut self, mesh: &MeshBuffers) -> Result<(), Self::Error>;
}
