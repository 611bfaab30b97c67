use lyon::geom::{CubicBezierSegment, QuadraticBezierSegment};
use log::trace;

use super::{Glyph, PathCommand, PathStep};
use crate::spacial::{FromLyonPoint, Position, Reflect, ToLyonPoint};

/// Tolerance, in font units, used when measuring a curve's length.
const LENGTH_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlattenOptions {
    /// Target curve length per straight segment, in font units.
    pub curve_resolution: f64,
    pub min_steps: usize,
    pub max_steps: usize,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            curve_resolution: 10.0,
            min_steps: 4,
            max_steps: 100,
        }
    }
}

impl FlattenOptions {
    /// Segments for a curve of `length` font units, at least one.
    ///
    /// `max_steps` wins when the bounds are inverted (e.g. a hand-edited config).
    pub fn curve_steps(&self, length: f64) -> usize {
        let steps = (length / self.curve_resolution).round();
        // NaN and negative lengths become 0 and are clamped
        (steps as usize)
            .max(self.min_steps)
            .min(self.max_steps)
            .max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveFamily {
    Cubic,
    Quadratic,
}

/// Interpreter state threaded through a glyph's path steps.
#[derive(Debug)]
struct PathInterpreter<'a> {
    options: &'a FlattenOptions,
    pen: Position,
    subpath_start: Position,
    points: Vec<Position>,
    /// Control point of the previous curve command, for the smooth shorthand forms.
    last_control: Option<(CurveFamily, Position)>,
    subpaths: Vec<Vec<Position>>,
}

/// Flatten a glyph's outline into closed polylines, one per subpath, in font units.
///
/// Subpaths are returned in traversal order, which is the order the glyph's polarity string refers to.
#[profiling::function]
pub fn flatten_glyph(glyph: &Glyph, options: &FlattenOptions) -> Vec<Vec<Position>> {
    flatten_steps(glyph.steps(), options)
}

pub fn flatten_steps(steps: &[PathStep], options: &FlattenOptions) -> Vec<Vec<Position>> {
    let mut interpreter = PathInterpreter {
        options,
        pen: Position::origin(),
        subpath_start: Position::origin(),
        points: Vec::new(),
        last_control: None,
        subpaths: Vec::new(),
    };

    for step in steps {
        interpreter.apply(step);
    }
    interpreter.flush();

    trace!("flattened {} steps into {} subpaths", steps.len(), interpreter.subpaths.len());
    interpreter.subpaths
}

impl PathInterpreter<'_> {
    fn apply(&mut self, step: &PathStep) {
        let command = step.command();

        if command == PathCommand::ClosePath {
            self.close();
            self.last_control = None;
            return;
        }

        for (group_index, args) in step
            .params()
            .chunks_exact(command.arity())
            .enumerate()
        {
            let resolve = |pen: Position, x: f64, y: f64| match step.is_relative() {
                true => Position::new(pen.x + x, pen.y + y),
                false => Position::new(x, y),
            };

            match command {
                // subsequent pairs of a moveto are implicit linetos
                PathCommand::MoveTo if group_index == 0 => {
                    let target = resolve(self.pen, args[0], args[1]);
                    self.move_to(target);
                }
                PathCommand::MoveTo | PathCommand::LineTo => {
                    let target = resolve(self.pen, args[0], args[1]);
                    self.line_to(target);
                }
                PathCommand::HorizontalLineTo => {
                    let x = match step.is_relative() {
                        true => self.pen.x + args[0],
                        false => args[0],
                    };
                    self.line_to(Position::new(x, self.pen.y));
                }
                PathCommand::VerticalLineTo => {
                    let y = match step.is_relative() {
                        true => self.pen.y + args[0],
                        false => args[0],
                    };
                    self.line_to(Position::new(self.pen.x, y));
                }
                PathCommand::CubicTo => {
                    let ctrl1 = resolve(self.pen, args[0], args[1]);
                    let ctrl2 = resolve(self.pen, args[2], args[3]);
                    let to = resolve(self.pen, args[4], args[5]);
                    self.cubic_to(ctrl1, ctrl2, to);
                }
                PathCommand::SmoothCubicTo => {
                    let ctrl1 = self.reflected_control(CurveFamily::Cubic);
                    let ctrl2 = resolve(self.pen, args[0], args[1]);
                    let to = resolve(self.pen, args[2], args[3]);
                    self.cubic_to(ctrl1, ctrl2, to);
                }
                PathCommand::QuadraticTo => {
                    let ctrl = resolve(self.pen, args[0], args[1]);
                    let to = resolve(self.pen, args[2], args[3]);
                    self.quadratic_to(ctrl, to);
                }
                PathCommand::SmoothQuadraticTo => {
                    let ctrl = self.reflected_control(CurveFamily::Quadratic);
                    let to = resolve(self.pen, args[0], args[1]);
                    self.quadratic_to(ctrl, to);
                }
                PathCommand::ClosePath => unreachable!(),
            }
        }

        if !matches!(
            command,
            PathCommand::CubicTo | PathCommand::SmoothCubicTo | PathCommand::QuadraticTo | PathCommand::SmoothQuadraticTo
        ) {
            self.last_control = None;
        }
    }

    /// The previous curve's control point mirrored through the pen, or the pen itself (a zero tangent) when the
    /// previous command was not a curve of the same family.
    fn reflected_control(&self, family: CurveFamily) -> Position {
        match self.last_control {
            Some((last_family, control)) if last_family == family => control.reflect_about(self.pen),
            _ => self.pen,
        }
    }

    fn move_to(&mut self, target: Position) {
        self.flush();
        self.pen = target;
        self.subpath_start = target;
        self.points.push(target);
    }

    /// A drawing command straight after a closepath continues from the closed subpath's start.
    fn ensure_started(&mut self) {
        if self.points.is_empty() {
            self.subpath_start = self.pen;
            self.points.push(self.pen);
        }
    }

    fn line_to(&mut self, target: Position) {
        self.ensure_started();
        self.points.push(target);
        self.pen = target;
    }

    fn cubic_to(&mut self, ctrl1: Position, ctrl2: Position, to: Position) {
        self.ensure_started();
        let segment = CubicBezierSegment {
            from: self.pen.to_lyon(),
            ctrl1: ctrl1.to_lyon(),
            ctrl2: ctrl2.to_lyon(),
            to: to.to_lyon(),
        };
        sample_curve(&segment, self.options, &mut self.points);
        self.pen = to;
        self.last_control = Some((CurveFamily::Cubic, ctrl2));
    }

    fn quadratic_to(&mut self, ctrl: Position, to: Position) {
        self.ensure_started();
        let segment = QuadraticBezierSegment {
            from: self.pen.to_lyon(),
            ctrl: ctrl.to_lyon(),
            to: to.to_lyon(),
        }
        .to_cubic();
        sample_curve(&segment, self.options, &mut self.points);
        self.pen = to;
        self.last_control = Some((CurveFamily::Quadratic, ctrl));
    }

    fn close(&mut self) {
        if self.points.is_empty() {
            return;
        }
        if self.points.last() != Some(&self.subpath_start) {
            self.points.push(self.subpath_start);
        }
        self.flush();
        self.pen = self.subpath_start;
    }

    /// Ends the open subpath; a lone moveto point is not a region and is dropped.
    fn flush(&mut self) {
        let points = std::mem::take(&mut self.points);
        if points.len() >= 2 {
            self.subpaths.push(points);
        }
    }
}

/// Append `steps` samples of the curve at equal parameter increments, excluding its start point.
fn sample_curve(segment: &CubicBezierSegment<f64>, options: &FlattenOptions, points: &mut Vec<Position>) {
    let length = segment.approximate_length(LENGTH_TOLERANCE);
    let steps = options.curve_steps(length);

    for i in 1..steps {
        let t = i as f64 / steps as f64;
        points.push(Position::from_lyon(segment.sample(t)));
    }
    points.push(Position::from_lyon(segment.to));
}
