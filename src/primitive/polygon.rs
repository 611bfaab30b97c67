use std::io::Write;

use once_cell::sync::OnceCell;

use super::Primitive;
use crate::aperture::{Aperture, REGION_APERTURE_INDEX};
use crate::format::{write_region, write_select_aperture};
use crate::geometry::BoundingBox;
use crate::spacial::{Position, ToVector, Vector};

/// A filled outline, implicitly closed back to its first vertex.
#[derive(Debug, Clone)]
pub struct PolygonPrimitive {
    pub offset: Vector,
    /// Relative to `offset`
    pub vertices: Vec<Position>,
    bounding_box: OnceCell<BoundingBox>,
}

impl PolygonPrimitive {
    pub fn new(offset: Position, vertices: Vec<Position>) -> Self {
        Self {
            offset: offset.to_vector(),
            vertices,
            bounding_box: OnceCell::new(),
        }
    }

    pub fn absolute_vertices(&self) -> Vec<Position> {
        self.vertices
            .iter()
            .map(|vertex| *vertex + self.offset)
            .collect()
    }
}

impl Primitive for PolygonPrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, _aperture_index: Option<u32>) -> std::io::Result<()> {
        write_select_aperture(w, REGION_APERTURE_INDEX)?;
        write_region(w, &self.absolute_vertices())
    }

    fn aperture(&self) -> Option<Aperture> {
        None
    }

    fn bounding_box(&self) -> BoundingBox {
        *self
            .bounding_box
            .get_or_init(|| BoundingBox::from_points(&self.absolute_vertices()))
    }
}
