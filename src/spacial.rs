/// Integer board coordinate, 1_000_000 units per millimetre.
pub type Coordinate = nalgebra::Point2<i64>;
pub type Vector = nalgebra::Vector2<f64>;
pub type Position = nalgebra::Point2<f64>;

pub const UNITS_PER_MM: f64 = 1_000_000.0;

pub fn units_to_mm(units: i64) -> f64 {
    units as f64 / UNITS_PER_MM
}

pub fn mm_to_units(mm: f64) -> i64 {
    (mm * UNITS_PER_MM).round() as i64
}

/// Standard counter-clockwise rotation of `point` by `angle` degrees, with `offset` added afterwards.
///
/// The point is rotated about the origin of its own frame, it is not made relative to `offset` first.
pub fn rotate_point(point: Position, angle: f64, offset: Vector) -> Position {
    let (sin_theta, cos_theta) = angle.to_radians().sin_cos();

    let rotated_x = point.x * cos_theta - point.y * sin_theta;
    let rotated_y = point.x * sin_theta + point.y * cos_theta;

    Position::new(rotated_x + offset.x, rotated_y + offset.y)
}

pub trait ToPosition {
    fn to_position(self) -> Position;
}

impl ToPosition for Coordinate {
    fn to_position(self) -> Position {
        Position::new(self.x as f64, self.y as f64)
    }
}

pub trait ToVector {
    fn to_vector(self) -> Vector;
}

impl ToVector for Position {
    fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }
}

impl ToVector for Coordinate {
    fn to_vector(self) -> Vector {
        Vector::new(self.x as f64, self.y as f64)
    }
}

/// Rounds half away from zero, the only rounding used when leaving floating point.
pub trait ToCoordinate {
    fn to_coordinate(self) -> Coordinate;
}

impl ToCoordinate for Position {
    fn to_coordinate(self) -> Coordinate {
        Coordinate::new(self.x.round() as i64, self.y.round() as i64)
    }
}
