//! Offline polarity detection.
//!
//! Each subpath of a glyph is painted, in traversal order, onto a monochrome canvas. Before a subpath is painted the
//! pixel under its start point is sampled: an unpainted pixel means the subpath is a solid region, a painted one means
//! it is a hole cut out of an earlier region. This is a sampled point-in-region test, it relies on fonts having
//! properly nested, non-overlapping subpaths.

use image::{GrayImage, Luma};
use log::trace;

use super::{flatten_glyph, FlattenOptions, Glyph};
use crate::error::GerberError;
use crate::geometry::{tessellate_polygon, BoundingBox};
use crate::spacial::Position;
use crate::types::Polarity;

const BACKGROUND: Luma<u8> = Luma([0]);
const INK: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolarityOptions {
    /// Canvas size, in pixels, along the glyph's longest side.
    pub raster_size: u32,
    /// Blank border, in pixels, around the glyph.
    pub margin: u32,
    pub flatten: FlattenOptions,
}

impl Default for PolarityOptions {
    fn default() -> Self {
        Self {
            raster_size: 1024,
            margin: 4,
            flatten: FlattenOptions::default(),
        }
    }
}

/// Compute the polarity string for `glyph`, one mark per subpath.
pub fn compute_polarity(glyph: &Glyph, options: &PolarityOptions) -> Result<String, GerberError> {
    let subpaths = flatten_glyph(glyph, &options.flatten);
    rasterize_polarity(&subpaths, options)
}

#[profiling::function]
pub fn rasterize_polarity(subpaths: &[Vec<Position>], options: &PolarityOptions) -> Result<String, GerberError> {
    let Some(first) = subpaths.first() else {
        return Ok(String::new());
    };

    let bbox = subpaths
        .iter()
        .fold(BoundingBox::default(), |bbox, subpath| {
            bbox.joined(&BoundingBox::from_points(subpath))
        });
    // a canvas needs at least one pixel
    let raster_size = options.raster_size.max(1);
    let extent = bbox.width().max(bbox.height());
    let scale = match extent > 0.0 {
        true => raster_size as f64 / extent,
        false => 1.0,
    };
    let side = raster_size + 2 * options.margin;
    let margin = options.margin as f64;

    // image rows grow downwards, font units grow upwards
    let to_pixel = |point: Position| -> [f32; 2] {
        [
            ((point.x - bbox.min.x) * scale + margin) as f32,
            ((bbox.max.y - point.y) * scale + margin) as f32,
        ]
    };

    let mut canvas = GrayImage::from_pixel(side, side, BACKGROUND);
    let mut marks = String::with_capacity(subpaths.len());

    paint(&mut canvas, first, &to_pixel, INK)?;
    marks.push(Polarity::Dark.mark());

    for subpath in &subpaths[1..] {
        let [x, y] = to_pixel(subpath[0]);
        let sample_x = (x.max(0.0) as u32).min(side - 1);
        let sample_y = (y.max(0.0) as u32).min(side - 1);

        let polarity = match *canvas.get_pixel(sample_x, sample_y) == BACKGROUND {
            true => Polarity::Dark,
            false => Polarity::Clear,
        };
        let color = match polarity {
            Polarity::Dark => INK,
            Polarity::Clear => BACKGROUND,
        };
        trace!("subpath sample. pixel: ({}, {}), polarity: {:?}", sample_x, sample_y, polarity);

        paint(&mut canvas, subpath, &to_pixel, color)?;
        marks.push(polarity.mark());
    }

    Ok(marks)
}

fn paint(
    canvas: &mut GrayImage,
    subpath: &[Position],
    to_pixel: &impl Fn(Position) -> [f32; 2],
    color: Luma<u8>,
) -> Result<(), GerberError> {
    let mesh = tessellate_polygon(subpath, to_pixel)?;
    for triangle in mesh.triangles() {
        fill_triangle(canvas, triangle, color);
    }
    Ok(())
}

/// Fill every pixel whose center lies inside (or on an edge of) the triangle.
fn fill_triangle(canvas: &mut GrayImage, [a, b, c]: [[f32; 2]; 3], color: Luma<u8>) {
    let edge = |p: [f32; 2], q: [f32; 2], x: f32, y: f32| (q[0] - p[0]) * (y - p[1]) - (q[1] - p[1]) * (x - p[0]);

    let (width, height) = canvas.dimensions();
    let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as u32;
    let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as u32;
    let max_x = (a[0].max(b[0]).max(c[0]).ceil().max(0.0) as u32).min(width);
    let max_y = (a[1].max(b[1]).max(c[1]).ceil().max(0.0) as u32).min(height);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(a, b, px, py);
            let w1 = edge(b, c, px, py);
            let w2 = edge(c, a, px, py);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if inside {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod polarity_tests {
    use super::*;
    use crate::font::PathStep;

    fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Vec<PathStep> {
        vec![
            PathStep::new('M', vec![x, y]).unwrap(),
            PathStep::new('h', vec![width]).unwrap(),
            PathStep::new('v', vec![height]).unwrap(),
            PathStep::new('h', vec![-width]).unwrap(),
            PathStep::new('Z', vec![]).unwrap(),
        ]
    }

    fn glyph(parts: &[Vec<PathStep>]) -> Glyph {
        Glyph::new(1000.0, parts.concat())
    }

    #[test]
    fn test_nested_rectangles_alternate() {
        // given, a frame with an island inside its hole
        let glyph = glyph(&[
            rectangle(0.0, 0.0, 900.0, 900.0),
            rectangle(100.0, 100.0, 700.0, 700.0),
            rectangle(300.0, 300.0, 300.0, 300.0),
        ]);

        // when
        let polarity = compute_polarity(&glyph, &PolarityOptions::default()).unwrap();

        // then
        assert_eq!(polarity, "dcd");
    }

    #[test]
    fn test_separate_outlines_are_all_dark() {
        // e.g. the two parts of a '='
        let glyph = glyph(&[rectangle(0.0, 0.0, 500.0, 100.0), rectangle(0.0, 300.0, 500.0, 100.0)]);

        let polarity = compute_polarity(&glyph, &PolarityOptions::default()).unwrap();

        assert_eq!(polarity, "dd");
    }

    #[test]
    fn test_two_holes() {
        // e.g. a 'B'
        let glyph = glyph(&[
            rectangle(0.0, 0.0, 600.0, 900.0),
            rectangle(100.0, 100.0, 400.0, 300.0),
            rectangle(100.0, 500.0, 400.0, 300.0),
        ]);

        let polarity = compute_polarity(&glyph, &PolarityOptions::default()).unwrap();

        assert_eq!(polarity, "dcc");
    }

    #[test]
    fn test_zero_sized_canvas_does_not_panic() {
        // given
        let glyph = glyph(&[rectangle(0.0, 0.0, 900.0, 900.0), rectangle(100.0, 100.0, 700.0, 700.0)]);
        let options = PolarityOptions {
            raster_size: 0,
            margin: 0,
            ..PolarityOptions::default()
        };

        // when
        let polarity = compute_polarity(&glyph, &options).unwrap();

        // then
        assert_eq!(polarity.len(), 2);
        assert!(polarity.starts_with('d'));
    }

    #[test]
    fn test_glyph_without_outline() {
        let polarity = compute_polarity(&Glyph::new(250.0, vec![]), &PolarityOptions::default()).unwrap();

        assert!(polarity.is_empty());
    }
}
