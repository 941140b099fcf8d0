use euclid::vec2;

use crate::geom::{Point, Vector, Velocity};

/// A snapshot of the motion of a touch sequence.
///
/// Samples are produced over and over while a finger is dragging; the one that gets classified is
/// the one that was current when the sequence ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Identifies the touch sequence that this sample belongs to.
    pub state_id: u64,
    /// Where the sequence started.
    pub start: Point,
    /// Where the sequence is now.
    pub current: Point,
    /// The total displacement since `start`.
    ///
    /// This is always relative to the start of this sequence, never to an earlier one.
    pub delta: Vector,
    /// The most recent velocity.
    pub velocity: Velocity,
    /// How many fingers were down when this sample was taken.
    pub touch_count: u8,
}

impl MotionSample {
    /// Creates a single-finger sample that started at the origin.
    pub fn new(delta: Vector, velocity: Velocity) -> MotionSample {
        MotionSample {
            state_id: 0,
            start: Point::new(0.0, 0.0),
            current: Point::new(0.0, 0.0) + delta,
            delta: delta,
            velocity: velocity,
            touch_count: 1,
        }
    }

    /// Shorthand for `MotionSample::new` taking the raw components.
    pub fn from_components(dx: f64, dy: f64, vx: f64, vy: f64) -> MotionSample {
        MotionSample::new(vec2(dx, dy), vec2(vx, vy))
    }

    /// Moves the start of the sequence to `start`, keeping the displacement.
    pub fn start(self, start: Point) -> MotionSample {
        MotionSample {
            start: start,
            current: start + self.delta,
            ..self
        }
    }

    pub fn touch_count(self, touch_count: u8) -> MotionSample {
        MotionSample {
            touch_count: touch_count,
            ..self
        }
    }

    pub fn state_id(self, state_id: u64) -> MotionSample {
        MotionSample {
            state_id: state_id,
            ..self
        }
    }

    pub fn dx(&self) -> f64 {
        self.delta.x
    }

    pub fn dy(&self) -> f64 {
        self.delta.y
    }

    pub fn vx(&self) -> f64 {
        self.velocity.x
    }

    pub fn vy(&self) -> f64 {
        self.velocity.y
    }

    /// Does the displacement or the velocity have a NaN component?
    pub fn has_nan(&self) -> bool {
        self.dx().is_nan() || self.dy().is_nan() || self.vx().is_nan() || self.vy().is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_follows_the_start() {
        let s = MotionSample::from_components(10.0, -5.0, 0.0, 0.0).start(Point::new(100.0, 100.0));
        assert_eq!(s.current, Point::new(110.0, 95.0));
        assert_eq!(s.delta, vec2(10.0, -5.0));
    }

    #[test]
    fn nan_detection() {
        assert!(!MotionSample::from_components(1.0, 2.0, 3.0, 4.0).has_nan());
        assert!(MotionSample::from_components(1.0, 2.0, ::std::f64::NAN, 4.0).has_nan());
    }
}
