//! Wavefront OBJ ingestion: parse a mesh description into a [`Document`],
//! then assemble it into deduplicated, triangulated buffers ready for a
//! rendering backend.

pub mod config;
pub mod mesh;
pub mod objects;
pub mod vulkan;

pub use mesh::{
    AssembleOptions, Assembly, AttributeSet, DedupScope, ErrorPolicy, GeometrySink, MeshBuffers,
    NormalPolicy, Selection,
};
pub use objects::{Document, ObjError, Result};
