//! Fonts and helpers shared by tests, benchmarks and demos.

use crate::font::{Font, Glyph, PathStep};
use crate::layer::GerberLayer;

/// Cubic handle length for a quarter circle of radius 1.
const KAPPA: f64 = 0.552_284_749_8;

/// A font with 1000 units per em and three glyphs:
///
/// * `O` - an outer dark ring with a clear counter, polarity `dc`.
/// * `I` - a single bar, polarity `d`.
/// * `o` - the same outline as `O` but without a polarity string, for the offline polarity pass.
pub fn test_font() -> Font {
    let ring = || {
        let mut steps = circle_steps(350.0, 350.0, 300.0);
        steps.extend(circle_steps(350.0, 350.0, 200.0));
        steps
    };

    Font::new("test", 1000.0, 500.0)
        .with_glyph("O", Glyph::new(700.0, ring()).with_polarity("dc").unwrap())
        .with_glyph("I", Glyph::new(300.0, bar_steps()).with_polarity("d").unwrap())
        .with_glyph("o", Glyph::new(700.0, ring()))
}

/// A closed circle drawn counter-clockwise from its rightmost point with four cubic segments.
pub fn circle_steps(cx: f64, cy: f64, r: f64) -> Vec<PathStep> {
    let k = KAPPA * r;
    vec![
        PathStep::new('M', vec![cx + r, cy]).unwrap(),
        PathStep::new('C', vec![cx + r, cy + k, cx + k, cy + r, cx, cy + r]).unwrap(),
        PathStep::new('C', vec![cx - k, cy + r, cx - r, cy + k, cx - r, cy]).unwrap(),
        PathStep::new('C', vec![cx - r, cy - k, cx - k, cy - r, cx, cy - r]).unwrap(),
        PathStep::new('C', vec![cx + k, cy - r, cx + r, cy - k, cx + r, cy]).unwrap(),
        PathStep::new('Z', vec![]).unwrap(),
    ]
}

fn bar_steps() -> Vec<PathStep> {
    vec![
        PathStep::new('M', vec![100.0, 0.0]).unwrap(),
        PathStep::new('h', vec![100.0]).unwrap(),
        PathStep::new('v', vec![700.0]).unwrap(),
        PathStep::new('h', vec![-100.0]).unwrap(),
        PathStep::new('z', vec![]).unwrap(),
    ]
}

/// Render a layer to a string.
pub fn layer_source(layer: &GerberLayer) -> String {
    let mut buffer = Vec::new();
    layer
        .write_gerber(&mut buffer)
        .expect("Could not generate Gerber code");
    String::from_utf8(buffer).expect("Gerber source is ASCII")
}
