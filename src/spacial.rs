pub type Vector = nalgebra::Vector2<f64>;
pub type Position = nalgebra::Point2<f64>;

pub trait ToVector {
    fn to_vector(self) -> Vector;
}

impl ToVector for Position {
    fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }
}

/// Conversions between nalgebra positions and the lyon points used for curve math.
pub trait ToLyonPoint {
    fn to_lyon(self) -> lyon::geom::Point<f64>;
}

impl ToLyonPoint for Position {
    fn to_lyon(self) -> lyon::geom::Point<f64> {
        lyon::geom::point(self.x, self.y)
    }
}

pub trait FromLyonPoint {
    fn from_lyon(value: lyon::geom::Point<f64>) -> Self;
}

impl FromLyonPoint for Position {
    fn from_lyon(value: lyon::geom::Point<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

pub trait Reflect {
    /// Mirror `self` through `pivot`, e.g. a previous control point through the current pen position.
    fn reflect_about(self, pivot: Position) -> Self;
}

impl Reflect for Position {
    fn reflect_about(self, pivot: Position) -> Self {
        Self::new(2.0 * pivot.x - self.x, 2.0 * pivot.y - self.y)
    }
}
