use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::Primitive;
use crate::aperture::Aperture;
use crate::font::{Font, TextLayout, TextOptions, TextPlacement};
use crate::geometry::BoundingBox;
use crate::spacial::Position;

/// A run of text, expanded into glyph region fills only when written or measured.
#[derive(Clone)]
pub struct TextPrimitive {
    pub origin: Position,
    /// `1.0`, or `-1.0` for mirrored text.
    pub x_scale: f64,
    pub message: String,
    pub font: Arc<Font>,
    /// Font size in points.
    pub pts: f64,
    pub options: TextOptions,
    bounding_box: OnceCell<BoundingBox>,
}

impl TextPrimitive {
    pub fn new(
        origin: Position,
        x_scale: f64,
        message: impl Into<String>,
        font: Arc<Font>,
        pts: f64,
        options: TextOptions,
    ) -> Self {
        Self {
            origin,
            x_scale,
            message: message.into(),
            font,
            pts,
            options,
            bounding_box: OnceCell::new(),
        }
    }

    pub fn layout(&self) -> TextLayout {
        let placement = TextPlacement {
            origin: self.origin,
            x_scale: self.x_scale,
            pts: self.pts,
            options: self.options,
        };
        TextLayout::new(&self.font, &self.message, &placement)
    }
}

impl Debug for TextPrimitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPrimitive")
            .field("origin", &self.origin)
            .field("x_scale", &self.x_scale)
            .field("message", &self.message)
            .field("font", &self.font.id)
            .field("pts", &self.pts)
            .field("options", &self.options)
            .finish()
    }
}

impl Primitive for TextPrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, _aperture_index: Option<u32>) -> std::io::Result<()> {
        self.layout().write_gerber(w)
    }

    fn aperture(&self) -> Option<Aperture> {
        None
    }

    fn bounding_box(&self) -> BoundingBox {
        *self
            .bounding_box
            .get_or_init(|| self.layout().bounding_box)
    }
}
