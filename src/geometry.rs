mod bounding_box;
mod mesh;

pub use bounding_box::*;
pub(crate) use mesh::*;
