use ash::vk;

use crate::mesh::{GeometrySink, MeshBuffers};
use crate::vulkan::{LayoutError, VertexLayout};

/// Host-side copy of a mesh in the exact shape the vertex and index
/// staging buffers expect.
#[derive(Debug, Clone, Default)]
pub struct StagedGeometry {
    pub layout: Option<VertexLayout>,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    index_count: u32,
}

impl StagedGeometry {
    pub fn new() -> Self {
        return StagedGeometry::default();
    }

    pub fn vertex_buffer_size(&self) -> vk::DeviceSize {
        return (std::mem::size_of::<f32>() * self.vertices.len()) as vk::DeviceSize;
    }

    pub fn index_buffer_size(&self) -> vk::DeviceSize {
        return (std::mem::size_of::<u32>() * self.indices.len()) as vk::DeviceSize;
    }

    pub fn index_type(&self) -> vk::IndexType {
        return vk::IndexType::UINT32;
    }

    /// Element count for the indexed draw.
    pub fn index_count(&self) -> u32 {
        return self.index_count;
    }
}

impl GeometrySink for StagedGeometry {
    type Error = LayoutError;

    /// Leaves the previous contents untouched when the mesh is rejected.
    fn upload(&mut self, mesh: &MeshBuffers) -> Result<(), LayoutError> {
        let index_count = u32::try_from(mesh.index_count()).map_err(|_| {
            LayoutError::TooManyIndices {
                count: mesh.index_count(),
            }
        })?;
        let vertices = VertexLayout::interleave(mesh)?;

        self.layout = Some(VertexLayout::from(mesh));
        self.vertices = vertices;
        self.indices = mesh.indices.clone();
        self.index_count = index_count;

        return Ok(());
    }
}
