use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::aperture::ApertureTable;
use crate::format::{write_select_aperture, END_OF_PROGRAM, FORMAT_SPECIFICATION, UNIT_MILLIMETERS};
use crate::geometry::BoundingBox;
use crate::primitive::{GerberPrimitive, Primitive};
use crate::types::Polarity;

/// One Gerber file of a design.
///
/// Primitives are only ever appended, the aperture table grows with them.
#[derive(Debug, Clone)]
pub struct GerberLayer {
    filename: PathBuf,
    primitives: Vec<GerberPrimitive>,
    apertures: ApertureTable,
}

impl GerberLayer {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            primitives: Vec::new(),
            apertures: ApertureTable::default(),
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn primitives(&self) -> &[GerberPrimitive] {
        &self.primitives
    }

    pub fn apertures(&self) -> &ApertureTable {
        &self.apertures
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Appends a primitive, declaring its aperture the first time it is seen on this layer.
    pub fn add(&mut self, primitive: impl Into<GerberPrimitive>) -> &mut Self {
        let primitive = primitive.into();
        if let Some(aperture) = primitive.aperture() {
            self.apertures.allocate(aperture);
        }
        self.primitives.push(primitive);
        self
    }

    pub fn add_all<I, P>(&mut self, primitives: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GerberPrimitive>,
    {
        for primitive in primitives {
            self.add(primitive);
        }
        self
    }

    /// Writes a complete Gerber program: headers, aperture definitions, every primitive, then the end marker.
    #[profiling::function]
    pub fn write_gerber<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "{}", FORMAT_SPECIFICATION)?;
        writeln!(w, "{}", UNIT_MILLIMETERS)?;
        writeln!(w, "{}", Polarity::Dark.directive())?;
        self.apertures.write_definitions(w)?;

        for primitive in &self.primitives {
            let aperture_index = primitive
                .aperture()
                .and_then(|aperture| self.apertures.index_of(&aperture));
            if let Some(index) = aperture_index {
                write_select_aperture(w, index)?;
            }
            primitive.write_gerber(w, aperture_index)?;
        }

        writeln!(w, "{}", END_OF_PROGRAM)?;

        info!(
            "wrote layer. filename: {}, primitives: {}, apertures: {}",
            self.filename.display(),
            self.primitives.len(),
            self.apertures.len()
        );
        Ok(())
    }

    /// Union of every primitive's bounding box, empty for an empty layer.
    pub fn bounding_box(&self) -> BoundingBox {
        let bounding_box = self
            .primitives
            .iter()
            .fold(BoundingBox::default(), |bbox, primitive| {
                bbox.joined(&primitive.bounding_box())
            });
        debug!(
            "layer bounding box. filename: {}, bbox: {:?}",
            self.filename.display(),
            bounding_box
        );
        bounding_box
    }
}
