use std::fmt;

use crate::classifier::{classify, Algorithm, SwipeConfig};
use crate::gate::EligibilityGate;
use crate::geom::Direction;
use crate::sample::MotionSample;
use crate::tracker::Stage;

pub type SwipeFn = Box<dyn FnMut(Option<Direction>, &MotionSample)>;
pub type DirectionFn = Box<dyn FnMut(&MotionSample)>;

/// The functions that get told about finished gestures.
///
/// ```
/// use libswipe::dispatcher::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .on_swipe(|dir, _| println!("swiped {:?}", dir))
///     .on_swipe_left(|sample| println!("swiped left from {:?}", sample.start));
/// ```
#[derive(Default)]
pub struct Callbacks {
    on_swipe: Option<SwipeFn>,
    on_swipe_up: Option<DirectionFn>,
    on_swipe_down: Option<DirectionFn>,
    on_swipe_left: Option<DirectionFn>,
    on_swipe_right: Option<DirectionFn>,
}

impl Callbacks {
    pub fn new() -> Callbacks {
        Callbacks::default()
    }

    /// Sets the function that is called once for every tracked gesture, whether or not it turned
    /// out to be a swipe.
    pub fn on_swipe<F: FnMut(Option<Direction>, &MotionSample) + 'static>(self, f: F) -> Callbacks {
        Callbacks {
            on_swipe: Some(Box::new(f)),
            ..self
        }
    }

    pub fn on_swipe_up<F: FnMut(&MotionSample) + 'static>(self, f: F) -> Callbacks {
        Callbacks {
            on_swipe_up: Some(Box::new(f)),
            ..self
        }
    }

    pub fn on_swipe_down<F: FnMut(&MotionSample) + 'static>(self, f: F) -> Callbacks {
        Callbacks {
            on_swipe_down: Some(Box::new(f)),
            ..self
        }
    }

    pub fn on_swipe_left<F: FnMut(&MotionSample) + 'static>(self, f: F) -> Callbacks {
        Callbacks {
            on_swipe_left: Some(Box::new(f)),
            ..self
        }
    }

    pub fn on_swipe_right<F: FnMut(&MotionSample) + 'static>(self, f: F) -> Callbacks {
        Callbacks {
            on_swipe_right: Some(Box::new(f)),
            ..self
        }
    }

    fn dispatch(&mut self, direction: Option<Direction>, sample: &MotionSample) {
        if let Some(ref mut f) = self.on_swipe {
            f(direction, sample);
        }

        let specific = match direction {
            Some(Direction::Up) => &mut self.on_swipe_up,
            Some(Direction::Down) => &mut self.on_swipe_down,
            Some(Direction::Left) => &mut self.on_swipe_left,
            Some(Direction::Right) => &mut self.on_swipe_right,
            _ => return,
        };
        if let Some(ref mut f) = *specific {
            f(sample);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_swipe", &self.on_swipe.is_some())
            .field("on_swipe_up", &self.on_swipe_up.is_some())
            .field("on_swipe_down", &self.on_swipe_down.is_some())
            .field("on_swipe_left", &self.on_swipe_left.is_some())
            .field("on_swipe_right", &self.on_swipe_right.is_some())
            .finish()
    }
}

/// A gesture that finished while it was being tracked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swipe {
    /// Which way it went, or `None` if it wasn't a swipe after all.
    pub direction: Option<Direction>,
    /// The last sample of the gesture.
    pub sample: MotionSample,
}

/// The configuration that a gesture was started with.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    config: SwipeConfig,
    algorithm: Algorithm,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    /// There is no gesture in progress.
    Idle,
    /// A gesture started, but hasn't (yet) been admitted by the gate.
    Pending { snapshot: Snapshot },
    /// A gesture is being tracked, and it will be classified when it finishes.
    Tracking { snapshot: Snapshot, sample: MotionSample },
}

/// Follows touch sequences from start to finish, and reports the swipes.
///
/// The dispatcher expects a start, followed by any number of moves, followed by an end or a
/// cancel. Events that arrive when no sequence is in progress are ignored.
#[derive(Debug)]
pub struct Dispatcher {
    gate: EligibilityGate,
    config: SwipeConfig,
    algorithm: Algorithm,
    callbacks: Callbacks,
    phase: Phase,
}

impl Dispatcher {
    pub fn new(config: SwipeConfig, algorithm: Algorithm) -> Dispatcher {
        Dispatcher {
            gate: EligibilityGate::new(),
            config: config,
            algorithm: algorithm,
            callbacks: Callbacks::new(),
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Replaces the thresholds. Gestures that are already in progress keep using the old ones.
    pub fn set_config(&mut self, config: SwipeConfig) {
        self.config = config;
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Replaces the algorithm. Gestures that are already in progress keep using the old one.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn gate(&self) -> &EligibilityGate {
        &self.gate
    }

    pub fn set_gate(&mut self, gate: EligibilityGate) {
        self.gate = gate;
    }

    /// Replaces all of the callbacks at once.
    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    pub fn is_tracking(&self) -> bool {
        match self.phase {
            Phase::Tracking { .. } => true,
            _ => false,
        }
    }

    /// The most recent sample of the sequence being tracked.
    pub fn current_sample(&self) -> Option<&MotionSample> {
        match self.phase {
            Phase::Tracking { ref sample, .. } => Some(sample),
            _ => None,
        }
    }

    /// Should the caller claim a sequence that looks like `sample`?
    pub fn should_claim(&self, sample: &MotionSample) -> bool {
        self.gate.admits(sample)
    }

    /// Starts a new sequence, returning true if it's already eligible to be a swipe.
    pub fn on_start(&mut self, sample: MotionSample) -> bool {
        match self.phase {
            Phase::Idle => {}
            _ => warn!("sequence {} started while another was in progress; dropping the old one", sample.state_id),
        }

        let snapshot = Snapshot {
            config: self.config,
            algorithm: self.algorithm,
        };
        let eligible = self.gate.admits(&sample);
        self.phase = if eligible {
            debug!("tracking sequence {}", sample.state_id);
            Phase::Tracking {
                snapshot: snapshot,
                sample: sample,
            }
        } else {
            Phase::Pending { snapshot: snapshot }
        };
        eligible
    }

    /// Updates the current sequence, returning true if it's (still) eligible to be a swipe.
    pub fn on_move(&mut self, new_sample: MotionSample) -> bool {
        let eligibility = self.gate.check(&new_sample);
        self.phase = match self.phase {
            Phase::Idle => {
                debug!("ignoring a move with no sequence in progress");
                return false;
            }
            Phase::Pending { snapshot } => {
                if eligibility.is_eligible() {
                    debug!("tracking sequence {}", new_sample.state_id);
                    Phase::Tracking {
                        snapshot: snapshot,
                        sample: new_sample,
                    }
                } else {
                    Phase::Pending { snapshot: snapshot }
                }
            }
            Phase::Tracking { snapshot, .. } => {
                // Once claimed, the sequence is classified when it finishes, even if the host let go.
                if !eligibility.is_eligible() {
                    debug!("sequence {} is no longer eligible: {:?}", new_sample.state_id, eligibility);
                }
                Phase::Tracking {
                    snapshot: snapshot,
                    sample: new_sample,
                }
            }
        };
        eligibility.is_eligible()
    }

    /// Finishes the current sequence because the fingers went up.
    pub fn on_end(&mut self, sample: MotionSample) -> Option<Swipe> {
        self.finish(sample)
    }

    /// Finishes the current sequence because the platform took it away.
    ///
    /// This is treated exactly like `on_end`.
    pub fn on_cancel(&mut self, sample: MotionSample) -> Option<Swipe> {
        self.finish(sample)
    }

    /// Feeds a stage of a sequence to the dispatcher.
    ///
    /// Returns the finished swipe, if there was one.
    pub fn handle(&mut self, stage: Stage) -> Option<Swipe> {
        match stage {
            Stage::Start(s) => {
                self.on_start(s);
                None
            }
            Stage::Move(s) => {
                self.on_move(s);
                None
            }
            Stage::End(s) => self.on_end(s),
            Stage::Cancel(s) => self.on_cancel(s),
        }
    }

    fn finish(&mut self, sample: MotionSample) -> Option<Swipe> {
        match ::std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {
                debug!("ignoring the end of a sequence that never started");
                None
            }
            Phase::Pending { .. } => {
                debug!("sequence {} ended without being tracked", sample.state_id);
                None
            }
            Phase::Tracking { snapshot, .. } => {
                let direction = classify(&sample, &snapshot.config, snapshot.algorithm);
                self.callbacks.dispatch(direction, &sample);
                Some(Swipe {
                    direction: direction,
                    sample: sample,
                })
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::new(SwipeConfig::default(), Algorithm::default())
    }
}
