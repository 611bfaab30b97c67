use std::io::Write;

use super::Primitive;
use crate::aperture::Aperture;
use crate::format::{write_draw, write_move};
use crate::geometry::BoundingBox;
use crate::spacial::Position;

/// A round pad, flashed as a zero-length stroke with a circular aperture of the pad's diameter.
#[derive(Debug, Clone)]
pub struct CirclePrimitive {
    pub center: Position,
    /// Diameter, in mm.
    pub thickness: f64,
}

impl CirclePrimitive {
    pub fn new(center: Position, thickness: f64) -> Self {
        Self {
            center,
            thickness,
        }
    }
}

impl Primitive for CirclePrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, _aperture_index: Option<u32>) -> std::io::Result<()> {
        write_move(w, self.center)?;
        write_draw(w, self.center)
    }

    fn aperture(&self) -> Option<Aperture> {
        Some(Aperture::circle(self.thickness))
    }

    fn bounding_box(&self) -> BoundingBox {
        let Self {
            center,
            thickness,
        } = self;
        let radius = thickness / 2.0;
        BoundingBox {
            min: Position::new(center.x - radius, center.y - radius),
            max: Position::new(center.x + radius, center.y + radius),
        }
    }
}
