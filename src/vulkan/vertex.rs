use ash::vk;
use thiserror::Error;

use crate::mesh::{AttributeSet, MeshBuffers};
use crate::objects::Attribute;

pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const TEXTURE_COORDINATE_LOCATION: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{attribute} array has {found} entries, expected {expected}")]
    LengthMismatch {
        attribute: Attribute,
        expected: usize,
        found: usize,
    },

    #[error("{count} indices do not fit a u32 draw count")]
    TooManyIndices { count: usize },
}

/// Interleaved vertex format for a given attribute set: position, then
/// normal, then texture coordinate, each only when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: AttributeSet,
}

impl VertexLayout {
    pub fn new(attributes: AttributeSet) -> Self {
        return VertexLayout { attributes };
    }

    pub fn attributes(&self) -> AttributeSet {
        return self.attributes;
    }

    pub fn floats_per_vertex(&self) -> usize {
        let mut count = 3;
        if self.attributes.normal {
            count += 3;
        }
        if self.attributes.texture_coordinate {
            count += 2;
        }

        return count;
    }

    pub fn stride(&self) -> u32 {
        return (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u32;
    }

    pub fn get_binding_description(&self) -> vk::VertexInputBindingDescription {
        return vk::VertexInputBindingDescription {
            binding: 0,
            stride: self.stride(),
            input_rate: vk::VertexInputRate::VERTEX,
        };
    }

    pub fn get_attribute_descriptions(&self) -> Vec<vk::VertexInputAttributeDescription> {
        let float_size = std::mem::size_of::<f32>() as u32;
        let mut descriptions = vec![vk::VertexInputAttributeDescription {
            binding: 0,
            location: POSITION_LOCATION,
            format: vk::Format::R32G32B32_SFLOAT,
            offset: 0,
        }];
        let mut offset = 3 * float_size;

        if self.attributes.normal {
            descriptions.push(vk::VertexInputAttributeDescription {
                binding: 0,
                location: NORMAL_LOCATION,
                format: vk::Format::R32G32B32_SFLOAT,
                offset,
            });
            offset += 3 * float_size;
        }

        if self.attributes.texture_coordinate {
            descriptions.push(vk::VertexInputAttributeDescription {
                binding: 0,
                location: TEXTURE_COORDINATE_LOCATION,
                format: vk::Format::R32G32_SFLOAT,
                offset,
            });
        }

        return descriptions;
    }

    /// Packs a mesh's attribute arrays into one vertex stream laid out
    /// according to the mesh's own attribute set. Every present attribute
    /// array must be as long as `positions`, and absent ones empty.
    pub fn interleave(mesh: &MeshBuffers) -> Result<Vec<f32>, LayoutError> {
        let layout = VertexLayout::new(mesh.attributes);
        let count = mesh.vertex_count();

        let arrays = [
            (Attribute::Normal, layout.attributes.normal, mesh.normals.len()),
            (
                Attribute::TextureCoordinate,
                layout.attributes.texture_coordinate,
                mesh.texture_coordinates.len(),
            ),
        ];
        for (attribute, present, found) in arrays {
            let expected = if present { count } else { 0 };
            if found != expected {
                return Err(LayoutError::LengthMismatch {
                    attribute,
                    expected,
                    found,
                });
            }
        }

        let mut data = Vec::with_capacity(layout.floats_per_vertex() * count);
        for (i, position) in mesh.positions.iter().enumerate() {
            data.extend(position.to_array());

            if layout.attributes.normal {
                data.extend(mesh.normals[i].to_array());
            }

            if layout.attributes.texture_coordinate {
                data.extend(mesh.texture_coordinates[i].to_array());
            }
        }

        return Ok(data);
    }
}

impl From<&MeshBuffers> for VertexLayout {
    fn from(mesh: &MeshBuffers) -> Self {
        return VertexLayout::new(mesh.attributes);
    }
}
