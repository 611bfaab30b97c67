use std::io::Write;

use super::Primitive;
use crate::aperture::Aperture;
use crate::format::{write_draw, write_move};
use crate::geometry::BoundingBox;
use crate::spacial::Position;
use crate::types::ApertureShape;

#[derive(Debug, Clone)]
pub struct LinePrimitive {
    pub start: Position,
    pub end: Position,
    pub shape: ApertureShape,
    pub thickness: f64,
}

impl LinePrimitive {
    pub fn new(start: Position, end: Position, shape: ApertureShape, thickness: f64) -> Self {
        Self {
            start,
            end,
            shape,
            thickness,
        }
    }
}

impl Primitive for LinePrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, _aperture_index: Option<u32>) -> std::io::Result<()> {
        write_move(w, self.start)?;
        write_draw(w, self.end)
    }

    fn aperture(&self) -> Option<Aperture> {
        Some(Aperture::new(self.shape, self.thickness))
    }

    /// The segment's box grown by half the stroke width, which covers both round and square end caps.
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.start, self.end]).inflate(self.thickness / 2.0)
    }
}
