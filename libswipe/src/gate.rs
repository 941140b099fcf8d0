use crate::sample::MotionSample;

/// Sequences that stay within this distance of their start (on both axes) are taps, not drags.
pub const CLICK_EPSILON: f64 = 5.0;

/// Only sequences with exactly this many fingers down can be swipes.
pub const REQUIRED_TOUCHES: u8 = 1;

/// The outcome of checking whether a touch sequence could be a swipe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Eligibility {
    Eligible,
    /// The wrong number of fingers are down.
    MultiTouch,
    /// The fingers haven't moved far enough to be dragging.
    Click,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        *self == Eligibility::Eligible
    }
}

/// Decides which touch sequences are candidates for swipe classification.
///
/// The gate is stateless; it is meant to be consulted on every sample, so that the caller can
/// decide as early as possible whether to claim the gesture for itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EligibilityGate {
    touches: u8,
    click_epsilon: f64,
}

impl EligibilityGate {
    pub fn new() -> EligibilityGate {
        EligibilityGate {
            touches: REQUIRED_TOUCHES,
            click_epsilon: CLICK_EPSILON,
        }
    }

    /// Changes the distance under which a sequence counts as a tap.
    pub fn click_epsilon(self, epsilon: f64) -> EligibilityGate {
        EligibilityGate {
            click_epsilon: epsilon,
            ..self
        }
    }

    /// Changes the number of fingers that must be down.
    pub fn touches(self, touches: u8) -> EligibilityGate {
        EligibilityGate {
            touches: touches,
            ..self
        }
    }

    pub fn check(&self, sample: &MotionSample) -> Eligibility {
        if sample.touch_count != self.touches {
            debug!("{} fingers down, not a swipe", sample.touch_count);
            Eligibility::MultiTouch
        } else if self.is_click(sample) {
            Eligibility::Click
        } else {
            Eligibility::Eligible
        }
    }

    pub fn admits(&self, sample: &MotionSample) -> bool {
        self.check(sample).is_eligible()
    }

    fn is_click(&self, sample: &MotionSample) -> bool {
        sample.dx().abs() < self.click_epsilon && sample.dy().abs() < self.click_epsilon
    }
}

impl Default for EligibilityGate {
    fn default() -> EligibilityGate {
        EligibilityGate::new()
    }
}
