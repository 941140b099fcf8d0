extern crate euclid;
#[macro_use]
extern crate log;

pub mod classifier;
pub mod dispatcher;
pub mod gate;
pub mod geom;
pub mod sample;
pub mod tracker;

pub use crate::classifier::{classify, Algorithm, AngularThresholds, OrthogonalThresholds, Strategy, SwipeConfig};
pub use crate::dispatcher::{Callbacks, Dispatcher, Swipe};
pub use crate::gate::{Eligibility, EligibilityGate};
pub use crate::geom::Direction;
pub use crate::sample::MotionSample;
pub use crate::tracker::{Stage, TouchEvent, Tracker};
