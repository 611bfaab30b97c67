use std::io::Write;

use log::{debug, warn};

use super::{flatten_glyph, FlattenOptions, Font, MM_PER_PT};
use crate::aperture::REGION_APERTURE_INDEX;
use crate::format::{write_region, write_select_aperture};
use crate::geometry::BoundingBox;
use crate::spacial::Position;
use crate::types::{Polarity, XAlign, YAlign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextOptions {
    pub x_align: XAlign,
    pub y_align: YAlign,
    pub flatten: FlattenOptions,
}

/// A closed outline in millimeters, filled with a single polarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub polarity: Polarity,
    pub vertices: Vec<Position>,
}

/// A text run expanded into per-glyph regions, already aligned and placed on the board.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    pub glyphs: Vec<Vec<Region>>,
    pub bounding_box: BoundingBox,
}

/// Where and how to place a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub origin: Position,
    /// `1.0`, or `-1.0` to mirror the run horizontally about its origin (e.g. bottom silkscreen).
    pub x_scale: f64,
    /// Font size in points.
    pub pts: f64,
    pub options: TextOptions,
}

impl TextLayout {
    pub fn new(font: &Font, message: &str, placement: &TextPlacement) -> Self {
        let scale = placement.pts * MM_PER_PT / font.units_per_em;

        let mut pen_x = 0.0;
        let mut glyphs = Vec::new();
        for character in message.chars() {
            let key = character.to_string();
            let Some(glyph) = font.glyph(&key) else {
                warn!(
                    "missing glyph, skipping. font: {}, character: {:?}",
                    font.id, character
                );
                pen_x += font.default_advance;
                continue;
            };

            let regions = flatten_glyph(glyph, &placement.options.flatten)
                .into_iter()
                .enumerate()
                .map(|(index, subpath)| Region {
                    polarity: glyph.polarity_at(index),
                    vertices: subpath
                        .into_iter()
                        .map(|point| Position::new((pen_x + point.x) * scale, point.y * scale))
                        .collect(),
                })
                .collect::<Vec<_>>();

            glyphs.push(regions);
            pen_x += glyph.advance();
        }

        let local_bbox = glyphs
            .iter()
            .flatten()
            .fold(BoundingBox::default(), |bbox, region| {
                bbox.joined(&BoundingBox::from_points(&region.vertices))
            });

        let (dx, dy) = match local_bbox.is_empty() {
            true => (0.0, 0.0),
            false => (
                placement
                    .options
                    .x_align
                    .offset(local_bbox.min.x, local_bbox.max.x),
                placement
                    .options
                    .y_align
                    .offset(local_bbox.min.y, local_bbox.max.y),
            ),
        };

        let origin = placement.origin;
        let mut bounding_box = BoundingBox::default();
        for region in glyphs.iter_mut().flatten() {
            for vertex in region.vertices.iter_mut() {
                *vertex = Position::new(
                    origin.x + placement.x_scale * (vertex.x + dx),
                    origin.y + vertex.y + dy,
                );
            }
            bounding_box.join(&BoundingBox::from_points(&region.vertices));
        }

        debug!(
            "text layout. message: {:?}, glyphs: {}, bbox: {:?}",
            message,
            glyphs.len(),
            bounding_box
        );

        Self {
            glyphs,
            bounding_box,
        }
    }

    /// Emit every region, switching polarity only when it changes and restoring dark after each glyph.
    pub fn write_gerber<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write_select_aperture(w, REGION_APERTURE_INDEX)?;

        for regions in &self.glyphs {
            let mut polarity = Polarity::Dark;
            for region in regions {
                if region.polarity != polarity {
                    writeln!(w, "{}", region.polarity.directive())?;
                    polarity = region.polarity;
                }
                write_region(w, &region.vertices)?;
            }
            if polarity != Polarity::Dark {
                writeln!(w, "{}", Polarity::Dark.directive())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use crate::font::{Glyph, PathStep};

    fn square_glyph(size: f64, advance: f64) -> Glyph {
        Glyph::new(advance, vec![
            PathStep::new('M', vec![0.0, 0.0]).unwrap(),
            PathStep::new('h', vec![size]).unwrap(),
            PathStep::new('v', vec![size]).unwrap(),
            PathStep::new('h', vec![-size]).unwrap(),
            PathStep::new('z', vec![]).unwrap(),
        ])
    }

    fn font() -> Font {
        // 72pt is 25.4mm, so with 25.4 units per em one font unit is 1mm
        Font::new("squares", 25.4, 30.0).with_glyph("a", square_glyph(10.0, 20.0))
    }

    fn placement(origin: Position, x_scale: f64, x_align: XAlign, y_align: YAlign) -> TextPlacement {
        TextPlacement {
            origin,
            x_scale,
            pts: 72.0,
            options: TextOptions {
                x_align,
                y_align,
                ..TextOptions::default()
            },
        }
    }

    fn assert_close(actual: Position, expected: Position) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "actual: {:?}, expected: {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_glyphs_advance_the_pen() {
        // when
        let layout = TextLayout::new(
            &font(),
            "aa",
            &placement(Position::origin(), 1.0, XAlign::Left, YAlign::Bottom),
        );

        // then
        assert_eq!(layout.glyphs.len(), 2);
        assert_close(layout.glyphs[1][0].vertices[0], Position::new(20.0, 0.0));
        assert_close(layout.bounding_box.max, Position::new(30.0, 10.0));
    }

    #[test]
    fn test_missing_glyph_advances_by_default_advance() {
        let layout = TextLayout::new(
            &font(),
            "a?a",
            &placement(Position::origin(), 1.0, XAlign::Left, YAlign::Bottom),
        );

        assert_eq!(layout.glyphs.len(), 2);
        // 20 for 'a' and 30 for the missing '?'
        assert_close(layout.glyphs[1][0].vertices[0], Position::new(50.0, 0.0));
    }

    #[test]
    fn test_center_alignment() {
        let layout = TextLayout::new(
            &font(),
            "a",
            &placement(Position::new(100.0, 100.0), 1.0, XAlign::Center, YAlign::Center),
        );

        assert_close(layout.bounding_box.min, Position::new(95.0, 95.0));
        assert_close(layout.bounding_box.max, Position::new(105.0, 105.0));
    }

    #[test]
    fn test_mirrored_right_aligned_text_extends_to_the_right_of_origin() {
        // right-aligned, then mirrored about the origin
        let layout = TextLayout::new(
            &font(),
            "aa",
            &placement(Position::new(10.0, 0.0), -1.0, XAlign::Right, YAlign::Top),
        );

        assert_close(layout.bounding_box.min, Position::new(10.0, -10.0));
        assert_close(layout.bounding_box.max, Position::new(40.0, 0.0));
    }

    #[test]
    fn test_empty_message() {
        let layout = TextLayout::new(
            &font(),
            "",
            &placement(Position::origin(), 1.0, XAlign::Center, YAlign::Center),
        );

        assert!(layout.glyphs.is_empty());
        assert!(layout.bounding_box.is_empty());
    }
}
