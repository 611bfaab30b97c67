//! Literal Gerber RS274X text fragments.
//!
//! Coordinates use the `%FSLAX36Y36*%` format, i.e. integers of 10^-6 mm.

use std::io::Write;

use crate::spacial::Position;

/// Integer units per millimeter.
pub const GERBER_SCALE: f64 = 1_000_000.0;

pub const FORMAT_SPECIFICATION: &str = "%FSLAX36Y36*%";
pub const UNIT_MILLIMETERS: &str = "%MOMM*%";
pub const REGION_START: &str = "G36*";
pub const REGION_END: &str = "G37*";
pub const END_OF_PROGRAM: &str = "M02*";

/// Convert millimeters to Gerber integer units.
pub fn to_gerber_units(mm: f64) -> i64 {
    (mm * GERBER_SCALE).round() as i64
}

/// Convert Gerber integer units back to millimeters.
pub fn from_gerber_units(units: i64) -> f64 {
    units as f64 / GERBER_SCALE
}

/// `D02`, pen up.
pub fn write_move<W: Write>(w: &mut W, position: Position) -> std::io::Result<()> {
    write_operation(w, position, 2)
}

/// `D01`, pen down.
pub fn write_draw<W: Write>(w: &mut W, position: Position) -> std::io::Result<()> {
    write_operation(w, position, 1)
}

fn write_operation<W: Write>(w: &mut W, position: Position, code: u8) -> std::io::Result<()> {
    writeln!(
        w,
        "X{:06}Y{:06}D0{}*",
        to_gerber_units(position.x),
        to_gerber_units(position.y),
        code
    )
}

pub fn write_select_aperture<W: Write>(w: &mut W, index: u32) -> std::io::Result<()> {
    writeln!(w, "G54D{}*", index)
}

/// Emit a filled region: move to the first vertex, draw to the rest, then draw back to the first.
///
/// Fewer than two vertices is degenerate and emits nothing.
pub fn write_region<W: Write>(w: &mut W, vertices: &[Position]) -> std::io::Result<()> {
    let Some((first, rest)) = vertices.split_first() else {
        return Ok(());
    };
    if rest.is_empty() {
        return Ok(());
    }

    writeln!(w, "{}", REGION_START)?;
    write_move(w, *first)?;
    for vertex in rest {
        write_draw(w, *vertex)?;
    }
    if rest.last() != Some(first) {
        write_draw(w, *first)?;
    }
    writeln!(w, "{}", REGION_END)
}
