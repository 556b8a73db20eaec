// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference momentum model implementing [`InertiaSource`].
//!
//! [`Inertia`] integrates pointer movement into a position and keeps it moving
//! after release, decaying by a constant friction per frame. It owns no clock:
//! callers pass event timestamps in milliseconds and call [`Inertia::step`]
//! once per frame while [`Inertia::is_decelerating`] holds.
//!
//! ```
//! use kurbo::Point;
//! use understory_pan_zoom::Inertia;
//!
//! let mut inertia = Inertia::new(0.75, 1.0);
//! inertia.press(Point::new(0.0, 0.0), 0.0);
//! assert_eq!(inertia.drag(Point::new(30.0, 0.0), 15.0), Some(Point::new(30.0, 0.0)));
//!
//! // A fast flick keeps moving after release.
//! assert!(inertia.release(15.0));
//! let next = inertia.step().unwrap();
//! assert!(next.x > 30.0);
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::host::InertiaSource;

/// Samples older than this, relative to the newest, do not count toward the
/// release velocity.
const TRACKING_WINDOW_MS: f64 = 100.0;
/// Nominal frame duration used to express velocity in pixels per frame.
const FRAME_MS: f64 = 15.0;
/// Release speed (pixels per frame) needed to start decelerating.
const FLICK_THRESHOLD: f64 = 1.0;
/// Deceleration stops once both velocity components fall below this,
/// scaled by the multiplier.
const STOP_THRESHOLD: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    at: Point,
    time: f64,
}

/// What the model is doing.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Phase {
    /// At rest.
    #[default]
    Idle,
    /// A press is active and samples are being integrated.
    Tracking {
        /// Last pointer sample.
        last: Point,
    },
    /// Released with momentum.
    Decelerating {
        /// Current velocity in pixels per frame.
        velocity: Vec2,
    },
}

/// Pointer-driven position with friction-decayed momentum.
#[derive(Clone, Debug)]
pub struct Inertia {
    friction: f64,
    multiplier: f64,
    position: Point,
    phase: Phase,
    samples: SmallVec<[Sample; 16]>,
    paused: bool,
    destroyed: bool,
}

impl Default for Inertia {
    fn default() -> Self {
        Self::new(0.75, 1.0)
    }
}

impl Inertia {
    /// Creates a model at the origin.
    ///
    /// `friction` is the fraction of velocity kept each frame; `multiplier`
    /// scales pointer movement into position movement.
    #[must_use]
    pub fn new(friction: f64, multiplier: f64) -> Self {
        Self {
            friction,
            multiplier,
            position: Point::ZERO,
            phase: Phase::Idle,
            samples: SmallVec::new(),
            paused: false,
            destroyed: false,
        }
    }

    /// Integrated position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` while a press is being tracked.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self.phase, Phase::Tracking { .. })
    }

    /// Returns `true` while momentum remains and the model is not paused.
    ///
    /// Hosts keep calling [`Inertia::step`] once per frame while this holds.
    #[must_use]
    pub fn is_decelerating(&self) -> bool {
        !self.paused && !self.destroyed && matches!(self.phase, Phase::Decelerating { .. })
    }

    /// Returns `true` after [`InertiaSource::pause`] until resumed.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns `true` after [`InertiaSource::destroy`].
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Starts tracking a press at `at`, stopping any momentum.
    ///
    /// Ignored while paused or destroyed.
    pub fn press(&mut self, at: Point, now: f64) {
        if self.paused || self.destroyed {
            return;
        }
        self.phase = Phase::Tracking { last: at };
        self.samples.clear();
        self.track(at, now);
    }

    /// Integrates a pointer move, returning the new position.
    ///
    /// Returns `None` when no press is being tracked.
    pub fn drag(&mut self, at: Point, now: f64) -> Option<Point> {
        let Phase::Tracking { last } = self.phase else {
            return None;
        };
        self.position += (at - last) * self.multiplier;
        self.phase = Phase::Tracking { last: at };
        self.track(at, now);
        Some(self.position)
    }

    /// Ends the press, returning `true` if enough velocity remains to keep
    /// moving.
    pub fn release(&mut self, now: f64) -> bool {
        let Phase::Tracking { last } = self.phase else {
            return false;
        };
        self.track(last, now);
        let velocity = self.release_velocity();
        self.samples.clear();
        if velocity.x.abs() > FLICK_THRESHOLD || velocity.y.abs() > FLICK_THRESHOLD {
            self.phase = Phase::Decelerating { velocity };
            true
        } else {
            self.phase = Phase::Idle;
            false
        }
    }

    /// Advances momentum by one frame.
    ///
    /// Returns the new position while the model is still visibly moving.
    pub fn step(&mut self) -> Option<Point> {
        if !self.is_decelerating() {
            return None;
        }
        let Phase::Decelerating { velocity } = self.phase else {
            return None;
        };
        let velocity = velocity * self.friction;
        self.position += velocity;
        let stop = STOP_THRESHOLD * self.multiplier;
        if velocity.x.abs() > stop || velocity.y.abs() > stop {
            self.phase = Phase::Decelerating { velocity };
            Some(self.position)
        } else {
            self.phase = Phase::Idle;
            None
        }
    }

    fn track(&mut self, at: Point, time: f64) {
        self.samples.retain(|s| time - s.time <= TRACKING_WINDOW_MS);
        self.samples.push(Sample { at, time });
    }

    fn release_velocity(&self) -> Vec2 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return Vec2::ZERO;
        };
        let elapsed = last.time - first.time;
        if elapsed <= 0.0 {
            return Vec2::ZERO;
        }
        let frames = (elapsed / FRAME_MS) / self.multiplier;
        (last.at - first.at) / frames
    }
}

impl InertiaSource for Inertia {
    fn pause(&mut self) {
        if matches!(self.phase, Phase::Tracking { .. }) {
            self.phase = Phase::Idle;
            self.samples.clear();
        }
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.phase = Phase::Idle;
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flick() -> Inertia {
        let mut inertia = Inertia::default();
        inertia.press(Point::new(0.0, 0.0), 0.0);
        inertia.drag(Point::new(15.0, 0.0), 15.0);
        inertia.drag(Point::new(30.0, 0.0), 30.0);
        inertia
    }

    #[test]
    fn drag_integrates_movement_with_multiplier() {
        let mut inertia = Inertia::new(0.75, 2.0);
        inertia.press(Point::new(10.0, 10.0), 0.0);

        assert_eq!(inertia.drag(Point::new(12.0, 11.0), 5.0), Some(Point::new(4.0, 2.0)));
        assert_eq!(inertia.drag(Point::new(11.0, 11.0), 10.0), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut inertia = Inertia::default();
        assert_eq!(inertia.drag(Point::new(5.0, 5.0), 0.0), None);
        assert_eq!(inertia.position(), Point::ZERO);
    }

    #[test]
    fn fast_release_decelerates_with_friction() {
        let mut inertia = flick();
        assert!(inertia.release(30.0));
        // 30px over two nominal frames.
        assert_eq!(
            inertia.phase(),
            Phase::Decelerating {
                velocity: Vec2::new(15.0, 0.0)
            }
        );

        let p1 = inertia.step().unwrap();
        let p2 = inertia.step().unwrap();
        assert_eq!(p1, Point::new(30.0 + 11.25, 0.0));
        assert!(p2.x - p1.x < p1.x - 30.0);
    }

    #[test]
    fn momentum_eventually_stops() {
        let mut inertia = flick();
        inertia.release(30.0);

        let mut frames = 0;
        while inertia.step().is_some() {
            frames += 1;
            assert!(frames < 100, "momentum never settled");
        }
        assert!(!inertia.is_decelerating());
        assert_eq!(inertia.phase(), Phase::Idle);
    }

    #[test]
    fn slow_release_stops_immediately() {
        let mut inertia = Inertia::default();
        inertia.press(Point::new(0.0, 0.0), 0.0);
        inertia.drag(Point::new(1.0, 0.0), 60.0);

        assert!(!inertia.release(60.0));
        assert_eq!(inertia.step(), None);
    }

    #[test]
    fn stale_samples_do_not_count_toward_velocity() {
        let mut inertia = Inertia::default();
        inertia.press(Point::new(0.0, 0.0), 0.0);
        inertia.drag(Point::new(300.0, 0.0), 10.0);
        // Pointer held still for a while before release.
        inertia.drag(Point::new(300.0, 0.0), 500.0);

        assert!(!inertia.release(510.0));
    }

    #[test]
    fn pause_cancels_press_and_holds_momentum() {
        let mut inertia = flick();
        inertia.pause();
        assert!(!inertia.is_tracking());
        assert_eq!(inertia.drag(Point::new(50.0, 0.0), 40.0), None);

        inertia.press(Point::new(0.0, 0.0), 50.0);
        assert!(!inertia.is_tracking());

        inertia.resume();
        inertia.press(Point::new(0.0, 0.0), 60.0);
        assert!(inertia.is_tracking());
    }

    #[test]
    fn paused_deceleration_resumes_where_it_left_off() {
        let mut inertia = flick();
        inertia.release(30.0);
        let before = inertia.step().unwrap();

        inertia.pause();
        assert_eq!(inertia.step(), None);
        assert_eq!(inertia.position(), before);

        inertia.resume();
        assert!(inertia.step().unwrap().x > before.x);
    }

    #[test]
    fn destroy_is_terminal() {
        let mut inertia = flick();
        inertia.destroy();
        inertia.resume();
        inertia.press(Point::new(0.0, 0.0), 100.0);

        assert!(inertia.is_destroyed());
        assert!(!inertia.is_tracking());
        assert_eq!(inertia.step(), None);
    }
}
