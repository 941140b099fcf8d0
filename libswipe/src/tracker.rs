use crate::geom::{Point, Vector, Velocity};
use crate::sample::MotionSample;

/// We don't pay any attention to more than this many fingers.
pub const MAX_SLOTS: usize = 10;

/// A raw touch event. Times are in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    /// The finger in `slot` touched down at `pos`.
    Down { slot: usize, pos: Point, time: f64 },
    /// The finger in `slot` moved to `pos`.
    Motion { slot: usize, pos: Point, time: f64 },
    /// The finger in `slot` went up.
    Up { slot: usize, time: f64 },
    /// The platform took the whole sequence away from us.
    Cancel { time: f64 },
}

/// One step in the life of a touch sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    Start(MotionSample),
    Move(MotionSample),
    End(MotionSample),
    Cancel(MotionSample),
}

impl Stage {
    pub fn sample(&self) -> &MotionSample {
        match *self {
            Stage::Start(ref s) | Stage::Move(ref s) | Stage::End(ref s) | Stage::Cancel(ref s) => s,
        }
    }
}

/// A `Snapshot` stores a snapshot of the state of the fingers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Snapshot {
    /// How many fingers are down?
    pub(crate) num_down: u8,
    /// Which of the indices in `pos` represent fingers that are down?
    pub(crate) down: [bool; MAX_SLOTS],
    /// What are the positions of the fingers that are down?
    pub(crate) pos: [Vector; MAX_SLOTS],
}

impl Snapshot {
    /// Creates a new, empty, `Snapshot`.
    pub(crate) fn new() -> Snapshot {
        Snapshot {
            num_down: 0,
            down: [false; MAX_SLOTS],
            pos: [Vector::new(0.0, 0.0); MAX_SLOTS],
        }
    }

    /// Returns the arithmetic mean of the positions of all the fingers that are down.
    ///
    /// If there are no down fingers, returns zero.
    pub(crate) fn mean_pos(&self) -> Point {
        let count = self.num_down as usize;
        self.mean_of(|i| self.down[i], count)
    }

    /// Returns the arithmetic mean of the positions of all the fingers that are down in both this
    /// snapshot and `other`.
    ///
    /// If there are no such fingers, returns zero.
    pub(crate) fn mean_pos_filtered(&self, other: &Snapshot) -> Point {
        let both = |i: usize| self.down[i] && other.down[i];
        let count = (0..MAX_SLOTS).filter(|&i| both(i)).count();
        self.mean_of(both, count)
    }

    fn mean_of<F: Fn(usize) -> bool>(&self, include: F, count: usize) -> Point {
        if count == 0 {
            return Point::new(0.0, 0.0);
        }
        let sum = (0..MAX_SLOTS)
            .filter(|&i| include(i))
            .map(|i| self.pos[i])
            .fold(Vector::new(0.0, 0.0), |a, b| a + b);
        let mean = sum / (count as f64);
        Point::new(mean.x, mean.y)
    }

    /// Marks finger `i` as down, in position `pos`. If the finger is already down, its position is
    /// updated to `pos`.
    ///
    /// # Panics
    /// Panics if `i` is too large (i.e., greater than or equal to `MAX_SLOTS`).
    pub(crate) fn set_down(&mut self, i: usize, pos: Point) {
        if !self.down[i] {
            self.num_down += 1;
            self.down[i] = true;
        }
        self.pos[i] = Vector::new(pos.x, pos.y);
    }

    /// Marks finger `i` as up.
    ///
    /// # Panics
    /// Panics if `i` is too large (i.e., greater than or equal to `MAX_SLOTS`).
    pub(crate) fn set_up(&mut self, i: usize) {
        if self.down[i] {
            self.num_down -= 1;
            self.down[i] = false;
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct InProgress {
    sample: MotionSample,
    /// The time of the last movement that was used to compute the velocity.
    last_time: f64,
    /// The displacement at `last_time`.
    last_delta: Vector,
}

/// Turns raw touch events into a sequence of `MotionSample`s.
///
/// A sequence starts when the first finger goes down, and ends when the last finger goes up. The
/// displacement follows the mean position of the fingers, but fingers going up or down don't
/// count as movement.
#[derive(Clone, Debug)]
pub struct Tracker {
    cur: Snapshot,
    next_id: u64,
    gesture: Option<InProgress>,
}

impl Tracker {
    pub fn new() -> Tracker {
        Tracker {
            cur: Snapshot::new(),
            next_id: 0,
            gesture: None,
        }
    }

    /// Forgets about all the fingers and the current sequence.
    pub fn reset(&mut self) {
        self.cur = Snapshot::new();
        self.gesture = None;
    }

    /// Updates the tracker with a new event, returning the resulting stage of the sequence.
    pub fn update(&mut self, ev: &TouchEvent) -> Option<Stage> {
        match *ev {
            TouchEvent::Down { slot, pos, time } => {
                if slot >= MAX_SLOTS {
                    warn!("not enough slots for {:?}", ev);
                    return None;
                }
                if self.cur.down[slot] {
                    warn!("down event, but the finger was already down?");
                    return None;
                }

                let last = self.cur;
                self.cur.set_down(slot, pos);
                if self.gesture.is_none() {
                    return Some(Stage::Start(self.start(time)));
                }
                self.shift(&last, None).map(Stage::Move)
            }
            TouchEvent::Motion { slot, pos, time } => {
                if slot >= MAX_SLOTS || !self.cur.down[slot] {
                    warn!("motion event, but the finger isn't down?");
                    return None;
                }

                let last = self.cur;
                self.cur.set_down(slot, pos);
                self.shift(&last, Some(time)).map(Stage::Move)
            }
            TouchEvent::Up { slot, .. } => {
                if slot >= MAX_SLOTS || !self.cur.down[slot] {
                    warn!("up event, but the finger was already up?");
                    return None;
                }

                let last = self.cur;
                self.cur.set_up(slot);
                let sample = self.shift(&last, None)?;
                if self.cur.num_down == 0 {
                    self.gesture = None;
                    Some(Stage::End(sample))
                } else {
                    Some(Stage::Move(sample))
                }
            }
            TouchEvent::Cancel { .. } => {
                let ret = self.gesture.map(|g| Stage::Cancel(g.sample));
                self.reset();
                ret
            }
        }
    }

    fn start(&mut self, time: f64) -> MotionSample {
        let start = self.cur.mean_pos();
        let sample = MotionSample {
            state_id: self.next_id,
            start: start,
            current: start,
            delta: Vector::new(0.0, 0.0),
            velocity: Velocity::new(0.0, 0.0),
            touch_count: self.cur.num_down,
        };
        debug!("starting sequence {} at {:?}", self.next_id, start);
        self.next_id += 1;
        self.gesture = Some(InProgress {
            sample: sample,
            last_time: time,
            last_delta: sample.delta,
        });
        sample
    }

    /// Accounts for the fingers moving from `last` to `self.cur`.
    ///
    /// Only movements (as opposed to fingers going up or down) come with a `time`, and only they
    /// update the velocity.
    fn shift(&mut self, last: &Snapshot, time: Option<f64>) -> Option<MotionSample> {
        let step = self.cur.mean_pos_filtered(last) - last.mean_pos_filtered(&self.cur);
        let num_down = self.cur.num_down;
        let g = self.gesture.as_mut()?;

        g.sample.delta += step;
        g.sample.current = g.sample.start + g.sample.delta;
        g.sample.touch_count = num_down;

        if let Some(time) = time {
            let dt = time - g.last_time;
            // Events with the same timestamp are folded into the next velocity.
            if dt > 0.0 {
                let d = g.sample.delta - g.last_delta;
                g.sample.velocity = Velocity::new(d.x / dt, d.y / dt);
                g.last_time = time;
                g.last_delta = g.sample.delta;
            }
        }
        Some(g.sample)
    }
}

impl Default for Tracker {
    fn default() -> Tracker {
        Tracker::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(slot: usize, x: f64, y: f64, time: f64) -> TouchEvent {
        TouchEvent::Down { slot, pos: Point::new(x, y), time }
    }

    fn motion(slot: usize, x: f64, y: f64, time: f64) -> TouchEvent {
        TouchEvent::Motion { slot, pos: Point::new(x, y), time }
    }

    fn up(slot: usize, time: f64) -> TouchEvent {
        TouchEvent::Up { slot, time }
    }

    #[test]
    fn single_finger_drag() {
        let mut t = Tracker::new();

        let s = t.update(&down(0, 100.0, 100.0, 0.0)).unwrap();
        match s {
            Stage::Start(s) => {
                assert_eq!(s.start, Point::new(100.0, 100.0));
                assert_eq!(s.dx(), 0.0);
                assert_eq!(s.touch_count, 1);
            }
            _ => panic!("expected a start, got {:?}", s),
        }

        let s = *t.update(&motion(0, 110.0, 100.0, 10.0)).unwrap().sample();
        assert_eq!((s.dx(), s.dy()), (10.0, 0.0));
        assert_eq!(s.vx(), 1.0);

        let s = *t.update(&motion(0, 200.0, 90.0, 20.0)).unwrap().sample();
        assert_eq!((s.dx(), s.dy()), (100.0, -10.0));
        assert_eq!((s.vx(), s.vy()), (9.0, -1.0));
        assert_eq!(s.current, Point::new(200.0, 90.0));

        // Lifting the finger doesn't change the velocity.
        match t.update(&up(0, 25.0)).unwrap() {
            Stage::End(e) => {
                assert_eq!(e.delta, s.delta);
                assert_eq!(e.velocity, s.velocity);
                assert_eq!(e.touch_count, 0);
                assert_eq!(e.state_id, s.state_id);
            }
            other => panic!("expected an end, got {:?}", other),
        }
    }

    #[test]
    fn each_sequence_starts_from_zero() {
        let mut t = Tracker::new();
        t.update(&down(0, 0.0, 0.0, 0.0));
        t.update(&motion(0, 50.0, 0.0, 10.0));
        t.update(&up(0, 20.0));

        let s = *t.update(&down(0, 500.0, 500.0, 100.0)).unwrap().sample();
        assert_eq!(s.state_id, 1);
        assert_eq!(s.start, Point::new(500.0, 500.0));
        assert_eq!((s.dx(), s.dy()), (0.0, 0.0));
        assert_eq!((s.vx(), s.vy()), (0.0, 0.0));
    }

    #[test]
    fn fingers_coming_and_going_are_not_movement() {
        let mut t = Tracker::new();
        t.update(&down(0, 0.0, 0.0, 0.0));
        let s = *t.update(&down(1, 100.0, 0.0, 1.0)).unwrap().sample();
        assert_eq!(s.touch_count, 2);
        assert_eq!(s.dx(), 0.0);

        // Both fingers move right by 20.
        t.update(&motion(0, 20.0, 0.0, 10.0));
        let s = *t.update(&motion(1, 120.0, 0.0, 10.0)).unwrap().sample();
        assert_eq!(s.dx(), 20.0);
        // The two movements share a timestamp, so only the first one made it into the velocity.
        assert_eq!(s.vx(), 1.0);

        match t.update(&up(1, 12.0)).unwrap() {
            Stage::Move(s) => {
                assert_eq!(s.touch_count, 1);
                assert_eq!(s.dx(), 20.0);
            }
            other => panic!("expected a move, got {:?}", other),
        }
        match t.update(&up(0, 13.0)).unwrap() {
            Stage::End(_) => {}
            other => panic!("expected an end, got {:?}", other),
        }
    }

    #[test]
    fn cancel_reports_the_last_sample() {
        let mut t = Tracker::new();
        t.update(&down(0, 0.0, 0.0, 0.0));
        let last = *t.update(&motion(0, 0.0, -80.0, 16.0)).unwrap().sample();
        assert_eq!(t.update(&TouchEvent::Cancel { time: 20.0 }), Some(Stage::Cancel(last)));

        // Everything was forgotten, so the finger isn't down any more.
        assert_eq!(t.update(&motion(0, 0.0, -90.0, 30.0)), None);
        assert_eq!(t.update(&TouchEvent::Cancel { time: 40.0 }), None);
    }

    #[test]
    fn bad_events_are_ignored() {
        let mut t = Tracker::new();
        assert_eq!(t.update(&up(0, 0.0)), None);
        assert_eq!(t.update(&motion(3, 1.0, 1.0, 0.0)), None);
        assert_eq!(t.update(&down(MAX_SLOTS, 1.0, 1.0, 0.0)), None);
        assert!(t.update(&down(0, 1.0, 1.0, 0.0)).is_some());
        assert_eq!(t.update(&down(0, 1.0, 1.0, 0.0)), None);
        assert_eq!(t.update(&up(MAX_SLOTS + 1, 1.0)), None);
    }

    #[test]
    fn out_of_range_slots_leave_the_sequence_alone() {
        let mut t = Tracker::new();
        t.update(&down(0, 0.0, 0.0, 0.0));
        let s = *t.update(&motion(0, 30.0, 0.0, 10.0)).unwrap().sample();
        assert_eq!(t.update(&down(usize::max_value(), 5.0, 5.0, 11.0)), None);
        assert_eq!(t.update(&motion(MAX_SLOTS, 5.0, 5.0, 12.0)), None);
        assert_eq!(t.update(&up(usize::max_value(), 13.0)), None);
        assert_eq!(t.update(&up(0, 14.0)), Some(Stage::End(MotionSample { touch_count: 0, ..s })));
    }
}
