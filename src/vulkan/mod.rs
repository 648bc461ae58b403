mod staging;
mod vertex;

pub use staging::*;
pub use vertex::*;
