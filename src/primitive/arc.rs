use std::io::Write;

use once_cell::sync::OnceCell;

use super::Primitive;
use crate::aperture::Aperture;
use crate::format::{write_draw, write_move};
use crate::geometry::BoundingBox;
use crate::spacial::Position;
use crate::types::ApertureShape;

/// Chords per millimeter of arc length, i.e. one chord per 0.1mm.
const CHORDS_PER_MM: f64 = 10.0;

/// A stroked (elliptical) arc, drawn as a polyline of short chords.
#[derive(Debug, Clone)]
pub struct ArcPrimitive {
    pub center: Position,
    pub radius: f64,
    pub x_scale: f64,
    pub y_scale: f64,
    /// Radians, `start_angle <= end_angle`.
    pub start_angle: f64,
    pub end_angle: f64,
    pub shape: ApertureShape,
    pub thickness: f64,
    bounding_box: OnceCell<BoundingBox>,
}

impl ArcPrimitive {
    /// Angles are in degrees and may be given in either order.
    pub fn new(
        center: Position,
        radius: f64,
        shape: ApertureShape,
        x_scale: f64,
        y_scale: f64,
        start_degrees: f64,
        end_degrees: f64,
        thickness: f64,
    ) -> Self {
        let (start_degrees, end_degrees) = match start_degrees > end_degrees {
            true => (end_degrees, start_degrees),
            false => (start_degrees, end_degrees),
        };

        Self {
            center,
            radius,
            x_scale,
            y_scale,
            start_angle: start_degrees.to_radians(),
            end_angle: end_degrees.to_radians(),
            shape,
            thickness,
            bounding_box: OnceCell::new(),
        }
    }

    /// Number of chords, so that each one spans at most ~0.1mm of arc.
    pub fn segments(&self) -> usize {
        let length = (self.end_angle - self.start_angle) * self.radius;
        (0.5 + length * CHORDS_PER_MM).floor() as usize + 1
    }

    /// Chord end points, shared by drawing and the bounding box so that both agree.
    pub fn generate_points(&self) -> Vec<Position> {
        let segments = self.segments();
        let delta = (self.end_angle - self.start_angle) / segments as f64;

        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + delta * i as f64;
                Position::new(
                    self.center.x + self.x_scale * angle.cos() * self.radius,
                    self.center.y + self.y_scale * angle.sin() * self.radius,
                )
            })
            .collect()
    }
}

impl Primitive for ArcPrimitive {
    fn write_gerber<W: Write>(&self, w: &mut W, _aperture_index: Option<u32>) -> std::io::Result<()> {
        let points = self.generate_points();
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        write_move(w, *first)?;
        for point in rest {
            write_draw(w, *point)?;
        }
        Ok(())
    }

    fn aperture(&self) -> Option<Aperture> {
        Some(Aperture::new(self.shape, self.thickness))
    }

    fn bounding_box(&self) -> BoundingBox {
        *self
            .bounding_box
            .get_or_init(|| BoundingBox::from_points(&self.generate_points()))
    }
}

#[cfg(test)]
mod arc_tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use rstest::rstest;

    use super::*;

    fn arc(radius: f64, start: f64, end: f64, thickness: f64) -> ArcPrimitive {
        ArcPrimitive::new(Position::origin(), radius, ApertureShape::Circle, 1.0, 1.0, start, end, thickness)
    }

    #[rstest]
    #[case(0.1)]
    #[case(1.0)]
    #[case(5.0)]
    fn test_full_circle_bounds_ignore_thickness(#[case] thickness: f64) {
        // when
        let bbox = arc(10.0, 0.0, 360.0, thickness).bounding_box();

        // then
        assert!((bbox.min.x - -10.0).abs() <= 1e-3, "min.x: {}", bbox.min.x);
        assert!((bbox.min.y - -10.0).abs() <= 1e-3, "min.y: {}", bbox.min.y);
        assert!((bbox.max.x - 10.0).abs() <= 1e-3, "max.x: {}", bbox.max.x);
        assert!((bbox.max.y - 10.0).abs() <= 1e-3, "max.y: {}", bbox.max.y);
    }

    #[test]
    fn test_angles_are_normalized_and_converted() {
        let arc = arc(1.0, 90.0, 0.0, 0.1);

        assert_eq!(arc.start_angle, 0.0);
        assert!((arc.end_angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[rstest]
    // quarter circle of radius 1 is ~1.57mm long
    #[case(1.0, 90.0, 17)]
    #[case(10.0, 360.0, 629)]
    #[case(0.0, 360.0, 1)]
    fn test_segment_count(#[case] radius: f64, #[case] end: f64, #[case] expected: usize) {
        assert_eq!(arc(radius, 0.0, end, 0.1).segments(), expected);
    }

    #[test]
    fn test_half_circle_bounds() {
        let bbox = arc(2.0, 0.0, 180.0, 0.5).bounding_box();

        assert!((bbox.min.x - -2.0).abs() < 1e-9);
        assert!((bbox.max.x - 2.0).abs() < 1e-9);
        assert!(bbox.min.y.abs() < 1e-9);
        assert!((bbox.max.y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_scaled_arc_is_elliptical() {
        let arc = ArcPrimitive::new(Position::new(1.0, 1.0), 1.0, ApertureShape::Circle, 2.0, 1.0, 0.0, 360.0, 0.1);

        let bbox = arc.bounding_box();

        assert!((bbox.width() - 4.0).abs() < 1e-3);
        assert!((bbox.height() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_drawn_points_match_bounding_box() {
        // given
        let arc = arc(3.0, 10.0, 200.0, 0.2);

        // when
        let mut buffer = Vec::new();
        arc.write_gerber(&mut buffer, Some(11)).unwrap();
        let source = String::from_utf8(buffer).unwrap();

        // then
        assert_eq!(source.matches("D02*").count(), 1);
        assert_eq!(source.matches("D01*").count(), arc.segments());
        let bbox = arc.bounding_box();
        let (start_sin, start_cos) = (10.0_f64.to_radians()).sin_cos();
        assert!(bbox.max.x >= 3.0 * start_cos - 1e-9);
        assert!(bbox.max.y >= 3.0 * start_sin - 1e-9);
        assert!(bbox.min.x >= -3.0 - 1e-9);
        assert!(bbox.max.y <= 3.0 * (PI / 2.0).sin() + 1e-9);
    }

    #[test]
    fn test_aperture() {
        let arc = ArcPrimitive::new(Position::origin(), 1.0, ApertureShape::Rectangle, 1.0, 1.0, 0.0, 90.0, 0.3);

        assert_eq!(arc.aperture(), Some(Aperture::new(ApertureShape::Rectangle, 0.3)));
    }
}
