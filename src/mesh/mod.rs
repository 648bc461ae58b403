mod assembler;
mod buffers;
mod triangulate;

pub use assembler::*;
pub use buffers::*;
pub use triangulate::*;
