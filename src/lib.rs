mod aperture;
mod design;
mod error;
pub mod font;
mod format;
mod geometry;
mod layer;
mod primitive;
pub mod spacial;
mod types;

pub use aperture::*;
pub use design::*;
pub use error::*;
pub use font::{
    FlattenOptions, Font, FontRegistry, Glyph, PathCommand, PathStep, PolarityOptions, Region, TextLayout, TextOptions,
    TextPlacement,
};
pub use format::*;
pub use geometry::*;
pub use layer::*;
pub use primitive::*;
pub use spacial::Position;
pub use types::*;

/// re-export 'lyon' crate, used for curve geometry
pub use lyon;

#[cfg(feature = "testing")]
pub mod testing;
