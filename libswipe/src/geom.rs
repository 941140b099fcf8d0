use std::f64;
use std::f64::consts::PI;
use std::fmt;

/// Device-independent length units, as reported by the touch layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dip;

/// Device-independent units per millisecond.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DipPerMs;

pub type Point = euclid::TypedPoint2D<f64, Dip>;
pub type Vector = euclid::TypedVector2D<f64, Dip>;
pub type Velocity = euclid::TypedVector2D<f64, DipPerMs>;

/// Returns the Euclidean length of the displacement `(dx, dy)`.
///
/// ```
/// use libswipe::geom::distance;
/// assert_eq!(distance(3.0, 4.0), 5.0);
/// ```
pub fn distance(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}

/// Returns the angle, in degrees, between the displacement `(dx, dy)` and the horizontal axis.
///
/// The `y` axis points down, so an upward movement has a positive angle. Only the slope is taken
/// into account, which means that the result lies in `[-90, 90]` and that leftward and rightward
/// movements along the same line have the same angle.
///
/// When `dx` is zero the slope is infinite, and the angle saturates to `±90`:
///
/// ```
/// use libswipe::geom::angle_degrees;
/// assert_eq!(angle_degrees(0.0, 100.0), -90.0);
/// assert_eq!(angle_degrees(0.0, -100.0), 90.0);
/// assert_eq!(angle_degrees(100.0, 0.0).abs(), 0.0);
/// ```
pub fn angle_degrees(dx: f64, dy: f64) -> f64 {
    (-dy / dx).atan() * 180.0 / PI
}

/// Returns the larger of `|a|` and `|b|`.
///
/// Unlike `f64::max`, this returns NaN if either of the inputs is NaN.
///
/// ```
/// use libswipe::geom::max_magnitude;
/// assert_eq!(max_magnitude(-0.5, 0.25), 0.5);
/// assert!(max_magnitude(std::f64::NAN, 1.0).is_nan());
/// ```
pub fn max_magnitude(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.abs().max(b.abs())
    }
}

/// The direction of a swipe.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Is this one of the four axis-aligned directions?
    pub fn is_cardinal(&self) -> bool {
        use self::Direction::*;

        match *self {
            Up | Down | Left | Right => true,
            UpLeft | UpRight | DownLeft | DownRight => false,
        }
    }

    pub fn name(&self) -> &'static str {
        use self::Direction::*;

        match *self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
            UpLeft => "up-left",
            UpRight => "up-right",
            DownLeft => "down-left",
            DownRight => "down-right",
        }
    }

    /// The inverse of `name`.
    ///
    /// ```
    /// use libswipe::geom::Direction;
    /// assert_eq!(Direction::from_name("down-left"), Some(Direction::DownLeft));
    /// assert_eq!(Direction::from_name("sideways"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Direction> {
        Direction::ALL.iter().cloned().find(|d| d.name() == name)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_is_measured_from_the_horizontal() {
        assert!((angle_degrees(100.0, -100.0) - 45.0).abs() < 1e-9);
        assert!((angle_degrees(100.0, 100.0) + 45.0).abs() < 1e-9);
        // Only the slope matters.
        assert!((angle_degrees(-100.0, 100.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn angle_of_a_zero_displacement_is_nan() {
        assert!(angle_degrees(0.0, 0.0).is_nan());
    }

    #[test]
    fn nan_propagates() {
        assert!(distance(f64::NAN, 1.0).is_nan());
        assert!(max_magnitude(1.0, f64::NAN).is_nan());
        assert!(angle_degrees(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn names_round_trip() {
        for d in Direction::ALL.iter() {
            assert_eq!(Direction::from_name(d.name()), Some(*d));
            assert_eq!(d.to_string(), d.name());
        }
    }

    #[test]
    fn cardinal_directions() {
        let cardinal: Vec<_> = Direction::ALL.iter().filter(|d| d.is_cardinal()).collect();
        assert_eq!(cardinal, vec![&Direction::Up, &Direction::Down, &Direction::Left, &Direction::Right]);
    }
}
