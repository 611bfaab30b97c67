use std::path::Path;

use gerber_writer::{
    ApertureShape, ArcPrimitive, BoundingBox, CirclePrimitive, Font, FontRegistry, GerberDesign, GerberError,
    GerberLayer, LinePrimitive, PolarityOptions, Position, TextOptions, TextPrimitive, XAlign, YAlign,
};
use log::info;

const OUTPUT_PREFIX: &str = "output/coil";

const TURNS: usize = 8;
const INNER_RADIUS: f64 = 3.0;
const TRACE_WIDTH: f64 = 0.3;
const TRACE_GAP: f64 = 0.2;
const PAD_DIAMETER: f64 = 1.2;
const DRILL_DIAMETER: f64 = 0.6;
const BOARD_MARGIN: f64 = 2.0;
const LABEL_PTS: f64 = 8.0;

fn main() -> Result<(), GerberError> {
    env_logger::init(); // Log to stderr (optional).

    let mut font = Font::from_json(include_str!("../assets/block-font.json"))?;
    font.precompute_polarity(&PolarityOptions::default())?;
    let mut fonts = FontRegistry::default();
    fonts.register(font);

    if let Some(parent) = Path::new(OUTPUT_PREFIX).parent() {
        std::fs::create_dir_all(parent).map_err(|source| GerberError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut design = GerberDesign::new(OUTPUT_PREFIX);
    let center = Position::new(20.0, 20.0);
    let pitch = TRACE_WIDTH + TRACE_GAP;

    let (inner, outer) = add_spiral(design.top_copper(), center, pitch);
    add_spiral(design.bottom_copper(), center, pitch);

    // the two spirals are joined through the inner via, the outer pads are the coil's terminals
    for pad in [inner, outer] {
        design.top_copper().add(CirclePrimitive::new(pad, PAD_DIAMETER));
        design.bottom_copper().add(CirclePrimitive::new(pad, PAD_DIAMETER));
        design.top_solder_mask().add(CirclePrimitive::new(pad, PAD_DIAMETER + 0.1));
        design.bottom_solder_mask().add(CirclePrimitive::new(pad, PAD_DIAMETER + 0.1));
        design.drill().add(CirclePrimitive::new(pad, DRILL_DIAMETER));
    }
    info!("coil. inner: {:?}, outer: {:?}", inner, outer);

    let font = fonts.get("block")?;
    let outer_radius = INNER_RADIUS + TURNS as f64 * pitch;
    let label_origin = Position::new(center.x, center.y - outer_radius - 1.0);
    let options = TextOptions {
        x_align: XAlign::Center,
        y_align: YAlign::Top,
        ..TextOptions::default()
    };
    design.top_silkscreen().add(TextPrimitive::new(
        label_origin,
        1.0,
        "COIL",
        font.clone(),
        LABEL_PTS,
        options,
    ));
    design.bottom_silkscreen().add(TextPrimitive::new(
        label_origin,
        -1.0,
        "COIL",
        font,
        LABEL_PTS,
        options,
    ));

    // the design's own bounding box is cached on first use, so measure the layers before the outline exists
    let bbox = design
        .layers()
        .iter()
        .fold(BoundingBox::default(), |bbox, layer| bbox.joined(&layer.bounding_box()));
    let (min, max) = (
        Position::new(bbox.min.x - BOARD_MARGIN, bbox.min.y - BOARD_MARGIN),
        Position::new(bbox.max.x + BOARD_MARGIN, bbox.max.y + BOARD_MARGIN),
    );
    let corners = [min, Position::new(max.x, min.y), max, Position::new(min.x, max.y)];
    let outline = design.outline();
    for (index, corner) in corners.iter().enumerate() {
        let next = corners[(index + 1) % corners.len()];
        outline.add(LinePrimitive::new(*corner, next, ApertureShape::Circle, 0.1));
    }

    design.write_gerber()?;
    info!("design bounding box: {:?}", design.bounding_box());
    info!(
        "board. width: {:.2}mm, height: {:.2}mm, files: {}.*",
        max.x - min.x,
        max.y - min.y,
        OUTPUT_PREFIX
    );
    Ok(())
}

/// Adds a spiral of half turns, returning its inner and outer end points.
///
/// Even half turns are centered on `center`, odd ones half a pitch to the right, so each full turn grows the radius
/// by one pitch and consecutive arcs meet end to end.
fn add_spiral(layer: &mut GerberLayer, center: Position, pitch: f64) -> (Position, Position) {
    let half_pitch = pitch / 2.0;
    let mut radius = INNER_RADIUS;
    for half_turn in 0..TURNS * 2 {
        let (offset, start) = match half_turn % 2 {
            0 => (0.0, 0.0),
            _ => (half_pitch, 180.0),
        };
        layer.add(ArcPrimitive::new(
            Position::new(center.x + offset, center.y),
            radius,
            ApertureShape::Circle,
            1.0,
            1.0,
            start,
            start + 180.0,
            TRACE_WIDTH,
        ));
        radius += half_pitch;
    }

    let inner = Position::new(center.x + INNER_RADIUS, center.y);
    let outer = Position::new(center.x + radius, center.y);
    (inner, outer)
}
