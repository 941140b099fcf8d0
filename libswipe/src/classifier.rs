use std::fmt::Debug;

use crate::geom::{angle_degrees, distance, max_magnitude, Direction};
use crate::sample::MotionSample;

/// Selects how a finished gesture is turned into a `Direction`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Classify by the angle of the total displacement. Supports diagonals.
    Angular,
    /// Classify by the velocity along each axis and the drift across it. Four directions only.
    Orthogonal,
}

impl Default for Algorithm {
    fn default() -> Algorithm {
        Algorithm::Angular
    }
}

/// A strategy for deciding which way (if any) a finished gesture went.
pub trait Strategy: Debug {
    fn classify(&self, sample: &MotionSample) -> Option<Direction>;
}

/// Thresholds for `Algorithm::Angular`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularThresholds {
    /// The fastest velocity component must be strictly larger than this.
    pub velocity_threshold: f64,
    /// The displacement must be strictly longer than this.
    pub distance_threshold: f64,
    /// Movements within this many degrees of an axis count as moving along that axis.
    pub angle_threshold: f64,
    /// If false, movements that aren't close to an axis are not swipes at all.
    pub diagonal_swipe: bool,
}

impl Default for AngularThresholds {
    fn default() -> AngularThresholds {
        AngularThresholds {
            velocity_threshold: 0.3,
            distance_threshold: 40.0,
            angle_threshold: 15.0,
            diagonal_swipe: true,
        }
    }
}

impl Strategy for AngularThresholds {
    fn classify(&self, sample: &MotionSample) -> Option<Direction> {
        let (dx, dy) = (sample.dx(), sample.dy());
        let speed = max_magnitude(sample.vx(), sample.vy());
        let dist = distance(dx, dy);

        // Written so that NaNs fail the check.
        if !(speed > self.velocity_threshold && dist > self.distance_threshold) {
            trace!("too slow or too short: speed {}, distance {}", speed, dist);
            return None;
        }

        let angle = angle_degrees(dx, dy).abs();
        if angle.is_nan() {
            return None;
        }

        if angle < self.angle_threshold {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else if angle > 90.0 - self.angle_threshold {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        } else if self.diagonal_swipe {
            Some(match (dx > 0.0, dy > 0.0) {
                (true, true) => Direction::DownRight,
                (true, false) => Direction::UpRight,
                (false, true) => Direction::DownLeft,
                (false, false) => Direction::UpLeft,
            })
        } else {
            trace!("diagonal angle {} with diagonals disabled", angle);
            None
        }
    }
}

/// Thresholds for `Algorithm::Orthogonal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthogonalThresholds {
    /// The velocity along the swipe's axis must be strictly larger than this.
    pub velocity_threshold: f64,
    /// The displacement across the swipe's axis must be strictly smaller than this.
    pub directional_offset_threshold: f64,
}

impl Default for OrthogonalThresholds {
    fn default() -> OrthogonalThresholds {
        OrthogonalThresholds {
            velocity_threshold: 0.3,
            directional_offset_threshold: 80.0,
        }
    }
}

impl OrthogonalThresholds {
    fn along_axis(&self, velocity: f64, offset: f64) -> bool {
        velocity.abs() > self.velocity_threshold && offset.abs() < self.directional_offset_threshold
    }
}

impl Strategy for OrthogonalThresholds {
    fn classify(&self, sample: &MotionSample) -> Option<Direction> {
        let (dx, dy) = (sample.dx(), sample.dy());

        // If both axes qualify, horizontal wins.
        if self.along_axis(sample.vx(), dy) {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else if self.along_axis(sample.vy(), dx) {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        } else {
            trace!("no axis qualifies: delta ({}, {}), velocity ({}, {})", dx, dy, sample.vx(), sample.vy());
            None
        }
    }
}

/// The thresholds for both algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeConfig {
    pub angular: AngularThresholds,
    pub orthogonal: OrthogonalThresholds,
}

impl SwipeConfig {
    pub fn strategy(&self, algorithm: Algorithm) -> &dyn Strategy {
        match algorithm {
            Algorithm::Angular => &self.angular,
            Algorithm::Orthogonal => &self.orthogonal,
        }
    }
}

/// Decides which way a finished gesture went, or returns `None` if it wasn't a swipe.
///
/// This never fails: samples containing NaNs are simply not swipes.
pub fn classify(sample: &MotionSample, config: &SwipeConfig, algorithm: Algorithm) -> Option<Direction> {
    if sample.has_nan() {
        debug!("not classifying a sample with NaNs: {:?}", sample);
        return None;
    }

    let ret = config.strategy(algorithm).classify(sample);
    debug!("{:?} classified sample {} as {:?}", algorithm, sample.state_id, ret);
    ret
}
