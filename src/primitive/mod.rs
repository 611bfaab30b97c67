use std::io::Write;

use log::trace;

use crate::aperture::Aperture;
use crate::geometry::BoundingBox;

mod arc;
mod circle;
mod line;
mod polygon;
mod text;

pub use arc::*;
pub use circle::*;
pub use line::*;
pub use polygon::*;
pub use text::*;

/// Capabilities shared by every shape that can be placed on a layer.
pub trait Primitive {
    /// Emit the draw sequence for this shape.
    ///
    /// The layer has already written `G54D<aperture_index>*` when this is called, so `aperture_index` is informational
    /// and implementations must not select it again. `None` means the shape requested no aperture and selects its own
    /// (region fills use the built-in one).
    fn write_gerber<W: Write>(&self, w: &mut W, aperture_index: Option<u32>) -> std::io::Result<()>;

    /// The aperture to select before drawing, `None` for region fills.
    fn aperture(&self) -> Option<Aperture>;

    /// Computed once, primitives must not be changed after being queried.
    fn bounding_box(&self) -> BoundingBox;
}

#[derive(Debug, Clone)]
pub enum GerberPrimitive {
    Arc(ArcPrimitive),
    Circle(CirclePrimitive),
    Line(LinePrimitive),
    Polygon(PolygonPrimitive),
    Text(TextPrimitive),
}

impl Primitive for GerberPrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, aperture_index: Option<u32>) -> std::io::Result<()> {
        trace!("writing primitive: {:?}", self);
        match self {
            GerberPrimitive::Arc(primitive) => primitive.write_gerber(w, aperture_index),
            GerberPrimitive::Circle(primitive) => primitive.write_gerber(w, aperture_index),
            GerberPrimitive::Line(primitive) => primitive.write_gerber(w, aperture_index),
            GerberPrimitive::Polygon(primitive) => primitive.write_gerber(w, aperture_index),
            GerberPrimitive::Text(primitive) => primitive.write_gerber(w, aperture_index),
        }
    }

    fn aperture(&self) -> Option<Aperture> {
        match self {
            GerberPrimitive::Arc(primitive) => primitive.aperture(),
            GerberPrimitive::Circle(primitive) => primitive.aperture(),
            GerberPrimitive::Line(primitive) => primitive.aperture(),
            GerberPrimitive::Polygon(primitive) => primitive.aperture(),
            GerberPrimitive::Text(primitive) => primitive.aperture(),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        match self {
            GerberPrimitive::Arc(primitive) => primitive.bounding_box(),
            GerberPrimitive::Circle(primitive) => primitive.bounding_box(),
            GerberPrimitive::Line(primitive) => primitive.bounding_box(),
            GerberPrimitive::Polygon(primitive) => primitive.bounding_box(),
            GerberPrimitive::Text(primitive) => primitive.bounding_box(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($variant:ident, $primitive:ident) => {
        impl From<$primitive> for GerberPrimitive {
            fn from(value: $primitive) -> Self {
                GerberPrimitive::$variant(value)
            }
        }
    };
}

impl_from_primitive!(Arc, ArcPrimitive);
impl_from_primitive!(Circle, CirclePrimitive);
impl_from_primitive!(Line, LinePrimitive);
impl_from_primitive!(Polygon, PolygonPrimitive);
impl_from_primitive!(Text, TextPrimitive);
