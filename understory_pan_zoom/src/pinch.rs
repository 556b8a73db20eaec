// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch source: two-finger contact into pan and zoom deltas.
//!
//! The source is a two-state machine. `start` moves `Idle → Active` and
//! captures the centroid of the two fingers as the baseline; `change` is only
//! meaningful while `Active`; `end` returns to `Idle`. A `change` that arrives
//! without a `start` (out-of-order notifications) does nothing.
//!
//! ```
//! use kurbo::Point;
//! use understory_pan_zoom::pinch::{PinchSource, PinchStrategy};
//!
//! let mut pinch = PinchSource::new(PinchStrategy::TrackCentroid, 2.0);
//! pinch.start([Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
//!
//! // The centroid moves right by 5px while the fingers spread by 6px.
//! let ev = pinch
//!     .change([Point::new(2.0, 0.0), Point::new(18.0, 0.0)], 16.0, 10.0, &())
//!     .unwrap();
//! assert_eq!(ev.dx(), 5.0);
//! assert_eq!(ev.dz, -12.0);
//! ```

use kurbo::{Point, Vec2};

use crate::event::{InputKind, PanZoomEvent};

/// How pinch changes report their anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PinchStrategy {
    /// Anchor every change at the starting centroid; report zoom only.
    FixedAnchor,
    /// Follow the centroid and report its movement as pan.
    #[default]
    TrackCentroid,
}

/// Pinch lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PinchState {
    /// No two-finger contact.
    #[default]
    Idle,
    /// Two fingers are down.
    Active {
        /// Centroid when the pinch started.
        baseline: Point,
        /// Centroid at the last change.
        last: Point,
    },
}

/// Midpoint of two contacts.
#[must_use]
pub fn centroid(fingers: [Point; 2]) -> Point {
    fingers[0].midpoint(fingers[1])
}

/// Normalizes pinch notifications into touch events.
#[derive(Clone, Copy, Debug)]
pub struct PinchSource {
    state: PinchState,
    strategy: PinchStrategy,
    multiplier: f64,
}

impl Default for PinchSource {
    fn default() -> Self {
        Self::new(PinchStrategy::default(), 2.0)
    }
}

impl PinchSource {
    /// Creates an idle source.
    ///
    /// `multiplier` scales the change in finger distance into `dz`.
    #[must_use]
    pub fn new(strategy: PinchStrategy, multiplier: f64) -> Self {
        Self {
            state: PinchState::Idle,
            strategy,
            multiplier,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PinchState {
        self.state
    }

    /// Returns `true` between `start` and `end`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, PinchState::Active { .. })
    }

    /// Begins a pinch at the centroid of `fingers`.
    ///
    /// The caller pauses inertial dragging.
    pub fn start(&mut self, fingers: [Point; 2]) {
        let c = centroid(fingers);
        self.state = PinchState::Active {
            baseline: c,
            last: c,
        };
    }

    /// Reports a change in finger positions and distance.
    ///
    /// `distance` and `previous` are the current and previous inter-finger
    /// distance. Fingers moving apart yield a negative `dz`.
    pub fn change<T: Clone>(
        &mut self,
        fingers: [Point; 2],
        distance: f64,
        previous: f64,
        target: &T,
    ) -> Option<PanZoomEvent<T>> {
        let PinchState::Active { baseline, last } = self.state else {
            log::trace!("ignoring pinch change without start");
            return None;
        };
        let dz = -(distance - previous) * self.multiplier;
        let (delta, position) = match self.strategy {
            PinchStrategy::FixedAnchor => (Vec2::ZERO, baseline),
            PinchStrategy::TrackCentroid => {
                let current = centroid(fingers);
                self.state = PinchState::Active {
                    baseline,
                    last: current,
                };
                (current - last, current)
            }
        };
        Some(PanZoomEvent {
            delta,
            dz,
            position,
            origin: baseline,
            kind: InputKind::Touch,
            target: target.clone(),
            source: Some(target.clone()),
        })
    }

    /// Ends the pinch.
    ///
    /// Returns `true` if a pinch was active, in which case the caller resumes
    /// inertial dragging.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = PinchState::Idle;
        was_active
    }
}
