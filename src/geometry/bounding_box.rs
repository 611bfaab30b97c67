use log::trace;

use crate::spacial::Position;

/// Minimum bounding box (MBB), in millimeters.
///
/// The default value is the *empty* box (min = +MAX, max = -MAX), so joining anything into it adopts the other box.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Position::new(f64::MAX, f64::MAX),
            max: Position::new(f64::MIN, f64::MIN),
        }
    }
}

impl BoundingBox {
    pub fn new(min: Position, max: Position) -> Self {
        Self {
            min,
            max,
        }
    }

    /// Note that a bounding box of 0,0 -> 0,0 is NOT empty
    /// e.g., a circle of zero thickness at the origin still has a position.
    ///
    /// Only a bounding box which is the same as the one returned by `default` counts as empty.
    pub fn is_empty(&self) -> bool {
        self.eq(&BoundingBox::default())
    }

    /// Grow `self` in place to the union of both boxes.
    pub fn join(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// Returns a new box which is the union of both boxes.
    pub fn joined(mut self, other: &BoundingBox) -> Self {
        self.join(other);
        self
    }

    /// AABB overlap test, touching edges count as intersecting.
    ///
    /// Used to cull primitives that lie outside a viewport.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max.x < other.min.x || other.max.x < self.min.x || self.max.y < other.min.y || other.max.y < self.min.y)
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.min.x && self.min.y <= other.min.y && self.max.x >= other.max.x && self.max.y >= other.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the geometric center of the bounding box as a Position
    pub fn center(&self) -> Position {
        Position::new(self.min.x + self.max.x, self.min.y + self.max.y) / 2.0
    }

    /// Returns a copy grown by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            min: Position::new(self.min.x - amount, self.min.y - amount),
            max: Position::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Constructs a bounding box from a list of points
    pub fn from_points(points: &[Position]) -> Self {
        let mut min = Position::new(f64::MAX, f64::MAX);
        let mut max = Position::new(f64::MIN, f64::MIN);

        for position in points {
            min.x = min.x.min(position.x);
            min.y = min.y.min(position.y);
            max.x = max.x.max(position.x);
            max.y = max.y.max(position.y);
        }

        let result = Self {
            min,
            max,
        };
        trace!("bbox from {} points: {:?}", points.len(), result);
        result
    }
}
