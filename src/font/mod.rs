//! Font data consumed by the text primitive.
//!
//! Fonts are produced offline (e.g. compiled from SVG webfonts) and are read-only while rendering. Path data is
//! validated on construction, so a malformed font is rejected when it is loaded rather than half-way through
//! writing a layer.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::error::GerberError;
use crate::types::Polarity;

mod layout;
mod path;
mod polarity;

pub use layout::*;
pub use path::*;
pub use polarity::*;

/// Millimeters per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Path command vocabulary, following SVG path data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicTo,
    SmoothCubicTo,
    QuadraticTo,
    SmoothQuadraticTo,
    ClosePath,
}

impl PathCommand {
    /// Returns the command and whether the letter is the relative (lower-case) form.
    pub fn from_letter(letter: char) -> Result<(Self, bool), GerberError> {
        let command = match letter.to_ascii_uppercase() {
            'M' => PathCommand::MoveTo,
            'L' => PathCommand::LineTo,
            'H' => PathCommand::HorizontalLineTo,
            'V' => PathCommand::VerticalLineTo,
            'C' => PathCommand::CubicTo,
            'S' => PathCommand::SmoothCubicTo,
            'Q' => PathCommand::QuadraticTo,
            'T' => PathCommand::SmoothQuadraticTo,
            'Z' => PathCommand::ClosePath,
            _ => return Err(GerberError::UnsupportedPathCommand(letter)),
        };
        Ok((command, letter.is_ascii_lowercase()))
    }

    pub fn letter(&self, relative: bool) -> char {
        let letter = match self {
            PathCommand::MoveTo => 'M',
            PathCommand::LineTo => 'L',
            PathCommand::HorizontalLineTo => 'H',
            PathCommand::VerticalLineTo => 'V',
            PathCommand::CubicTo => 'C',
            PathCommand::SmoothCubicTo => 'S',
            PathCommand::QuadraticTo => 'Q',
            PathCommand::SmoothQuadraticTo => 'T',
            PathCommand::ClosePath => 'Z',
        };
        match relative {
            true => letter.to_ascii_lowercase(),
            false => letter,
        }
    }

    /// Number of parameters consumed by one application of the command.
    pub fn arity(&self) -> usize {
        match self {
            PathCommand::ClosePath => 0,
            PathCommand::HorizontalLineTo | PathCommand::VerticalLineTo => 1,
            PathCommand::MoveTo | PathCommand::LineTo | PathCommand::SmoothQuadraticTo => 2,
            PathCommand::SmoothCubicTo | PathCommand::QuadraticTo => 4,
            PathCommand::CubicTo => 6,
        }
    }
}

/// One command of a glyph outline, with one or more parameter groups (e.g. `L 1 2 3 4` is two line segments).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPathStep", into = "RawPathStep"))]
pub struct PathStep {
    command: PathCommand,
    relative: bool,
    params: Vec<f64>,
}

impl PathStep {
    pub fn new(letter: char, params: Vec<f64>) -> Result<Self, GerberError> {
        let (command, relative) = PathCommand::from_letter(letter)?;
        let arity = command.arity();

        let well_formed = match arity {
            0 => params.is_empty(),
            _ => !params.is_empty() && params.len() % arity == 0,
        };
        if !well_formed || params.iter().any(|value| !value.is_finite()) {
            return Err(GerberError::MalformedPathStep {
                command: letter,
                arity,
                count: params.len(),
            });
        }

        Ok(Self {
            command,
            relative,
            params,
        })
    }

    pub fn command(&self) -> PathCommand {
        self.command
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawPathStep {
    #[serde(rename = "c")]
    command: char,
    #[serde(rename = "p", default)]
    params: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPathStep> for PathStep {
    type Error = GerberError;

    fn try_from(value: RawPathStep) -> Result<Self, Self::Error> {
        PathStep::new(value.command, value.params)
    }
}

#[cfg(feature = "serde")]
impl From<PathStep> for RawPathStep {
    fn from(value: PathStep) -> Self {
        Self {
            command: value.command.letter(value.relative),
            params: value.params,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    /// Horizontal advance, in font units.
    advance: f64,
    /// One mark per subpath, `d` (dark) or `c` (clear).
    #[cfg_attr(feature = "serde", serde(default))]
    polarity: Option<String>,
    steps: Vec<PathStep>,
}

impl Glyph {
    pub fn new(advance: f64, steps: Vec<PathStep>) -> Self {
        Self {
            advance,
            polarity: None,
            steps,
        }
    }

    pub fn with_polarity(mut self, polarity: &str) -> Result<Self, GerberError> {
        Self::validate_polarity(polarity)?;
        self.polarity = Some(polarity.to_string());
        Ok(self)
    }

    fn validate_polarity(polarity: &str) -> Result<(), GerberError> {
        polarity
            .chars()
            .try_for_each(|mark| Polarity::try_from(mark).map(|_| ()))
    }

    pub fn advance(&self) -> f64 {
        self.advance
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn polarity(&self) -> Option<&str> {
        self.polarity.as_deref()
    }

    /// Polarity of the subpath at `index`, dark unless the precomputed string says otherwise.
    pub fn polarity_at(&self, index: usize) -> Polarity {
        self.polarity
            .as_ref()
            .and_then(|polarity| polarity.as_bytes().get(index))
            .and_then(|mark| Polarity::try_from(*mark as char).ok())
            .unwrap_or(Polarity::Dark)
    }

    /// A missing polarity string, or one with fewer marks than subpaths, cannot be trusted.
    pub fn needs_polarity(&self, subpath_count: usize) -> bool {
        self.polarity
            .as_ref()
            .map_or(true, |polarity| polarity.len() < subpath_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub id: String,
    pub units_per_em: f64,
    /// Advance used for characters the font has no glyph for.
    pub default_advance: f64,
    /// Keyed by the glyph's unicode string, usually a single character.
    pub glyphs: HashMap<String, Glyph>,
}

impl Font {
    pub fn new(id: impl Into<String>, units_per_em: f64, default_advance: f64) -> Self {
        Self {
            id: id.into(),
            units_per_em,
            default_advance,
            glyphs: HashMap::new(),
        }
    }

    pub fn with_glyph(mut self, key: impl Into<String>, glyph: Glyph) -> Self {
        self.glyphs.insert(key.into(), glyph);
        self
    }

    pub fn glyph(&self, key: &str) -> Option<&Glyph> {
        self.glyphs.get(key)
    }

    /// Load a font compiled to JSON. Path steps and polarity strings are validated while loading.
    #[cfg(feature = "serde")]
    pub fn from_json(source: &str) -> Result<Self, GerberError> {
        let font: Font = serde_json::from_str(source)?;
        for glyph in font.glyphs.values() {
            if let Some(polarity) = glyph.polarity() {
                Glyph::validate_polarity(polarity)?;
            }
        }
        info!("loaded font. id: {}, glyphs: {}", font.id, font.glyphs.len());
        Ok(font)
    }

    /// Fill in the polarity string of every glyph that lacks a usable one, returns the number of glyphs updated.
    #[profiling::function]
    pub fn precompute_polarity(&mut self, options: &PolarityOptions) -> Result<usize, GerberError> {
        let updated = self
            .glyphs
            .par_iter_mut()
            .map(|(key, glyph)| {
                let subpaths = flatten_glyph(glyph, &options.flatten);
                if !glyph.needs_polarity(subpaths.len()) {
                    return Ok(0);
                }
                let polarity = rasterize_polarity(&subpaths, options)?;
                debug!("precomputed polarity. glyph: {:?}, polarity: {}", key, polarity);
                glyph.polarity = Some(polarity);
                Ok(1)
            })
            .collect::<Result<Vec<usize>, GerberError>>()?
            .into_iter()
            .sum();

        info!("precomputed polarity. font: {}, glyphs updated: {}", self.id, updated);
        Ok(updated)
    }
}

/// Fonts available for text, by id.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, Arc<Font>>,
}

impl FontRegistry {
    pub fn register(&mut self, font: Font) -> Arc<Font> {
        let font = Arc::new(font);
        debug!("registered font. id: {}", font.id);
        self.fonts.insert(font.id.clone(), font.clone());
        font
    }

    pub fn get(&self, id: &str) -> Result<Arc<Font>, GerberError> {
        self.fonts
            .get(id)
            .cloned()
            .ok_or_else(|| GerberError::UnknownFont(id.to_string()))
    }
}
