// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag source: turn integrated inertia positions into pan deltas.
//!
//! ## Usage
//!
//! 1) Call [`DragSource::press`] when a press starts a new session.
//! 2) Feed every position the inertia primitive reports, including
//!    post-release momentum, to [`DragSource::update`].
//! 3) Use [`DragSource::block`] and [`DragSource::unblock`] to take the
//!    in-progress session away from the pan stream.
//!
//! The inertia primitive reports integrated positions, not screen
//! coordinates, so deltas come from its samples while anchors come from the
//! pointer tracker.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_pan_zoom::drag::DragSource;
//!
//! let mut drag = DragSource::<u32>::new();
//! drag.press(None);
//!
//! // The first sample of a session only establishes the baseline.
//! let first = drag.update(Point::new(0.0, 0.0), Some(Point::new(40.0, 40.0)), &1).unwrap();
//! assert_eq!(first.delta, Vec2::ZERO);
//!
//! let next = drag.update(Point::new(5.0, -2.0), Some(Point::new(45.0, 38.0)), &1).unwrap();
//! assert_eq!(next.delta, Vec2::new(5.0, -2.0));
//! assert_eq!(next.origin, Point::new(40.0, 40.0));
//! ```

use kurbo::Point;

use crate::event::{InputKind, PanZoomEvent};

/// State of the current press-to-release session.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Session {
    /// No sample accepted since the last press (or discarding unblock).
    #[default]
    Fresh,
    /// Samples are being turned into deltas.
    Tracking {
        /// Pointer position captured by the first sample.
        origin: Point,
        /// Last accepted inertia sample.
        last: Point,
    },
}

/// Whether the pan stream currently accepts drag samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanGate {
    /// Samples are accepted.
    #[default]
    Open,
    /// Samples are dropped and the session is frozen.
    Blocked,
}

/// Normalizes inertial drag samples into pan events.
#[derive(Clone, Debug)]
pub struct DragSource<T> {
    session: Session,
    gate: PanGate,
    source: Option<T>,
}

impl<T> Default for DragSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DragSource<T> {
    /// Creates a source with no session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Session::Fresh,
            gate: PanGate::Open,
            source: None,
        }
    }

    /// Current session state.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    /// Current gate state.
    #[must_use]
    pub fn gate(&self) -> PanGate {
        self.gate
    }

    /// Returns `true` while samples are being dropped.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.gate == PanGate::Blocked
    }

    /// Starts a new session.
    ///
    /// `source` is the element the press landed on; it is reported on every
    /// event of the session. A block left over from the previous session is
    /// lifted.
    pub fn press(&mut self, source: Option<T>) {
        self.session = Session::Fresh;
        self.gate = PanGate::Open;
        self.source = source;
    }

    /// Stops accepting samples of the in-progress session.
    pub fn block(&mut self) {
        self.gate = PanGate::Blocked;
    }

    /// Accepts samples again.
    ///
    /// With `discard_current`, the next sample starts a fresh session, so any
    /// momentum left over from before the block produces no delta. Without it,
    /// the next sample continues from the last one accepted before the block.
    /// Does nothing unless blocked.
    pub fn unblock(&mut self, discard_current: bool) {
        if self.gate != PanGate::Blocked {
            return;
        }
        self.gate = PanGate::Open;
        if discard_current {
            self.session = Session::Fresh;
        }
    }

    /// Turns an inertia sample into a pan event.
    ///
    /// `pointer` is the pointer tracker's current position; `target` is the
    /// interactive surface. Returns `None` while blocked.
    pub fn update(
        &mut self,
        sample: Point,
        pointer: Option<Point>,
        target: &T,
    ) -> Option<PanZoomEvent<T>>
    where
        T: Clone,
    {
        if self.gate == PanGate::Blocked {
            log::trace!("dropping blocked drag sample");
            return None;
        }
        // The pointer tracker may not have seen the pointer yet.
        let anchor = pointer.unwrap_or(Point::ZERO);
        let (origin, last) = match self.session {
            Session::Fresh => (anchor, sample),
            Session::Tracking { origin, last } => (origin, last),
        };
        self.session = Session::Tracking {
            origin,
            last: sample,
        };
        Some(PanZoomEvent {
            delta: sample - last,
            dz: 0.0,
            position: anchor,
            origin,
            kind: InputKind::Mouse,
            target: target.clone(),
            source: self.source.clone(),
        })
    }
}
