use std::collections::HashMap;
use std::io::Write;

use log::debug;

use crate::types::ApertureShape;

/// Aperture used to stroke region outlines, always declared first in every layer.
pub const REGION_APERTURE_INDEX: u32 = 10;
pub const REGION_APERTURE_DIAMETER: f64 = 0.001;

/// Resolution of the deduplication key, sizes closer than 10^-6 mm share one declaration.
const APERTURE_KEY_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aperture {
    pub shape: ApertureShape,
    /// Diameter for circles, side length for (square) rectangles, in mm.
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApertureKey {
    shape: ApertureShape,
    size: i64,
}

impl Aperture {
    pub fn new(shape: ApertureShape, size: f64) -> Self {
        Self {
            shape,
            size,
        }
    }

    pub fn circle(diameter: f64) -> Self {
        Self::new(ApertureShape::Circle, diameter)
    }

    pub fn key(&self) -> ApertureKey {
        ApertureKey {
            shape: self.shape,
            size: (self.size * APERTURE_KEY_SCALE).round() as i64,
        }
    }

    /// e.g. `%ADD11C,2.00000*%` or `%ADD12R,1.00000X1.00000*%`
    pub fn write_definition<W: Write>(&self, w: &mut W, index: u32) -> std::io::Result<()> {
        match self.shape {
            ApertureShape::Circle => writeln!(w, "%ADD{}C,{:.5}*%", index, self.size),
            ApertureShape::Rectangle => writeln!(w, "%ADD{}R,{:.5}X{:.5}*%", index, self.size, self.size),
        }
    }
}

/// Per-layer aperture declarations, in allocation order.
#[derive(Debug, Clone, Default)]
pub struct ApertureTable {
    apertures: Vec<Aperture>,
    index: HashMap<ApertureKey, u32>,
}

impl ApertureTable {
    /// Returns the index for `aperture`, allocating the next free index the first time its key is seen.
    pub fn allocate(&mut self, aperture: Aperture) -> u32 {
        let key = aperture.key();
        if let Some(index) = self.index.get(&key) {
            return *index;
        }

        let index = REGION_APERTURE_INDEX + 1 + self.apertures.len() as u32;
        debug!("allocated aperture. index: {}, aperture: {:?}", index, aperture);
        self.apertures.push(aperture);
        self.index.insert(key, index);
        index
    }

    pub fn index_of(&self, aperture: &Aperture) -> Option<u32> {
        self.index.get(&aperture.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    /// Allocated apertures with their indices, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Aperture)> {
        self.apertures
            .iter()
            .enumerate()
            .map(|(offset, aperture)| (REGION_APERTURE_INDEX + 1 + offset as u32, aperture))
    }

    /// Writes the built-in region aperture followed by every allocated aperture.
    pub fn write_definitions<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        Aperture::circle(REGION_APERTURE_DIAMETER).write_definition(w, REGION_APERTURE_INDEX)?;
        for (index, aperture) in self.iter() {
            aperture.write_definition(w, index)?;
        }
        Ok(())
    }
}
