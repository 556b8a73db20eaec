// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame coalescing: deliver at most one merged event per display frame.
//!
//! ## Usage
//!
//! 1) Every normalized event goes through [`FrameCoalescer::schedule`].
//! 2) When the requested frame fires, call [`FrameCoalescer::fire`], or
//!    [`FrameCoalescer::begin_frame`] and [`FrameCoalescer::end_frame`] when the
//!    consumer must run without the coalescer borrowed.
//! 3) On teardown, call [`FrameCoalescer::cancel`].
//!
//! Delivery always waits for a frame notification, even when nothing is
//! pending; some rendering backends do not clear their draw buffer before a
//! synchronous repaint in the same tick.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_pan_zoom::{FrameCoalescer, FrameHandle, FrameScheduler, InputKind, PanZoomEvent};
//!
//! #[derive(Default)]
//! struct Frames(u64);
//!
//! impl FrameScheduler for Frames {
//!     fn request_frame(&mut self) -> FrameHandle {
//!         self.0 += 1;
//!         FrameHandle(self.0)
//!     }
//!     fn cancel_frame(&mut self, _: FrameHandle) {}
//! }
//!
//! let mut frames = Frames::default();
//! let mut coalescer = FrameCoalescer::new();
//! let pan = |dx: f64| PanZoomEvent {
//!     delta: Vec2::new(dx, 0.0),
//!     dz: 0.0,
//!     position: Point::ZERO,
//!     origin: Point::ZERO,
//!     kind: InputKind::Mouse,
//!     target: (),
//!     source: None,
//! };
//!
//! coalescer.schedule(pan(1.0), &mut frames);
//! coalescer.schedule(pan(2.0), &mut frames);
//!
//! let mut delivered = Vec::new();
//! coalescer.fire(FrameHandle(1), &mut frames, |ev| delivered.push(ev.dx()));
//! assert_eq!(delivered, [3.0]);
//! ```

use crate::event::PanZoomEvent;
use crate::host::{FrameHandle, FrameScheduler};

#[derive(Clone, Debug)]
enum Slot<T> {
    /// No frame requested.
    Idle,
    /// A frame is requested and `event` will be delivered when it fires.
    Requested {
        handle: FrameHandle,
        event: PanZoomEvent<T>,
    },
    /// The consumer is receiving the event for a frame that just fired.
    Delivering,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Merges normalized events into at most one delivery per frame.
#[derive(Clone, Debug)]
pub struct FrameCoalescer<T> {
    slot: Slot<T>,
    /// Events that arrived while the consumer was being called.
    queued: Option<PanZoomEvent<T>>,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameCoalescer<T> {
    /// Creates an idle coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Slot::Idle,
            queued: None,
        }
    }

    /// Returns `true` while a frame has been requested and not yet delivered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.slot, Slot::Requested { .. })
    }

    /// The frame currently requested, if any.
    #[must_use]
    pub fn pending_handle(&self) -> Option<FrameHandle> {
        match self.slot {
            Slot::Requested { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Schedules `event` for delivery on the next frame.
    ///
    /// If a frame is already requested the event is merged into the one bound
    /// to it. Events arriving during delivery are held and merged until the
    /// consumer returns, then scheduled for the following frame.
    pub fn schedule(&mut self, event: PanZoomEvent<T>, frames: &mut impl FrameScheduler) {
        match &mut self.slot {
            Slot::Idle => {
                let handle = frames.request_frame();
                self.slot = Slot::Requested { handle, event };
            }
            Slot::Requested { event: bound, .. } => {
                log::trace!("merging pan/zoom event into pending frame");
                bound.merge(event);
            }
            Slot::Delivering => match &mut self.queued {
                Some(queued) => queued.merge(event),
                None => self.queued = Some(event),
            },
        }
    }

    /// Takes the event bound to `handle` and enters the delivering state.
    ///
    /// Returns `None` for a handle that is not the pending one, for example a
    /// notification that raced with [`FrameCoalescer::cancel`]. Every `Some`
    /// must be followed by [`FrameCoalescer::end_frame`].
    pub fn begin_frame(&mut self, handle: FrameHandle) -> Option<PanZoomEvent<T>> {
        match core::mem::take(&mut self.slot) {
            Slot::Requested { handle: pending, event } if pending == handle => {
                self.slot = Slot::Delivering;
                Some(event)
            }
            other => {
                self.slot = other;
                None
            }
        }
    }

    /// Leaves the delivering state and schedules anything queued meanwhile.
    pub fn end_frame(&mut self, frames: &mut impl FrameScheduler) {
        if !matches!(self.slot, Slot::Delivering) {
            return;
        }
        self.slot = Slot::Idle;
        if let Some(queued) = self.queued.take() {
            self.schedule(queued, frames);
        }
    }

    /// Delivers the event bound to `handle` to `deliver`.
    ///
    /// Returns `true` if an event was delivered.
    pub fn fire(
        &mut self,
        handle: FrameHandle,
        frames: &mut impl FrameScheduler,
        deliver: impl FnOnce(PanZoomEvent<T>),
    ) -> bool {
        let Some(event) = self.begin_frame(handle) else {
            return false;
        };
        deliver(event);
        self.end_frame(frames);
        true
    }

    /// Cancels the pending frame request and forgets every undelivered event.
    pub fn cancel(&mut self, frames: &mut impl FrameScheduler) {
        if let Slot::Requested { handle, .. } = core::mem::take(&mut self.slot) {
            frames.cancel_frame(handle);
        }
        self.queued = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec::Vec;
    use kurbo::{Point, Vec2};

    use crate::event::InputKind;

    #[derive(Default)]
    struct Frames {
        next: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for Frames {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn ev(dx: f64, dy: f64, dz: f64, x: f64, y: f64) -> PanZoomEvent<u8> {
        PanZoomEvent {
            delta: Vec2::new(dx, dy),
            dz,
            position: Point::new(x, y),
            origin: Point::new(x, y),
            kind: InputKind::Mouse,
            target: 0,
            source: None,
        }
    }

    #[test]
    fn first_schedule_requests_a_frame_without_delivering() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();

        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);

        assert!(c.is_pending());
        assert_eq!(frames.requested, [FrameHandle(1)]);
    }

    #[test]
    fn events_before_the_frame_merge_into_one_delivery() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();

        c.schedule(ev(2.0, 3.0, 0.0, 10.0, 10.0), &mut frames);
        c.schedule(ev(1.0, -1.0, 5.0, 12.0, 9.0), &mut frames);

        let mut delivered = Vec::new();
        assert!(c.fire(FrameHandle(1), &mut frames, |e| delivered.push(e)));

        assert_eq!(delivered.len(), 1);
        let e = &delivered[0];
        assert_eq!(e.delta, Vec2::new(3.0, 2.0));
        assert_eq!(e.dz, 5.0);
        assert_eq!(e.position, Point::new(12.0, 9.0));
        assert_eq!(e.origin, Point::new(10.0, 10.0));
        assert_eq!(frames.requested.len(), 1);
        assert!(!c.is_pending());
    }

    #[test]
    fn many_events_in_one_frame_produce_one_callback() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();

        for i in 0..50 {
            c.schedule(ev(1.0, 0.0, 0.0, f64::from(i), 0.0), &mut frames);
        }

        let mut calls = 0;
        c.fire(FrameHandle(1), &mut frames, |e| {
            calls += 1;
            assert_eq!(e.dx(), 50.0);
            assert_eq!(e.x(), 49.0);
        });
        assert_eq!(calls, 1);
        assert_eq!(frames.requested.len(), 1);
    }

    #[test]
    fn frames_deliver_in_order() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();
        let mut delivered = Vec::new();

        for (frame, dx) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
            c.schedule(ev(dx, 0.0, 0.0, 0.0, 0.0), &mut frames);
            assert_eq!(c.pending_handle(), Some(FrameHandle(frame)));
            c.fire(FrameHandle(frame), &mut frames, |e| delivered.push(e.dx()));
        }

        assert_eq!(delivered, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn events_during_delivery_go_to_the_next_frame() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();

        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);
        let first = c.begin_frame(FrameHandle(1)).unwrap();
        assert_eq!(first.dx(), 1.0);

        // Input dispatched from inside the consumer.
        c.schedule(ev(2.0, 0.0, 0.0, 1.0, 1.0), &mut frames);
        c.schedule(ev(3.0, 0.0, 1.0, 2.0, 2.0), &mut frames);
        assert_eq!(frames.requested.len(), 1);

        c.end_frame(&mut frames);
        assert_eq!(c.pending_handle(), Some(FrameHandle(2)));

        let mut delivered = Vec::new();
        c.fire(FrameHandle(2), &mut frames, |e| delivered.push(e));
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].dx(), 5.0);
        assert_eq!(delivered[0].dz, 1.0);
        assert_eq!(delivered[0].position, Point::new(2.0, 2.0));
        assert_eq!(delivered[0].origin, Point::new(1.0, 1.0));
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();
        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);

        assert!(!c.fire(FrameHandle(7), &mut frames, |_| panic!("stale frame delivered")));
        assert!(c.is_pending());
    }

    #[test]
    fn cancel_prevents_delivery() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();
        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);

        c.cancel(&mut frames);

        assert_eq!(frames.cancelled, [FrameHandle(1)]);
        assert!(!c.fire(FrameHandle(1), &mut frames, |_| panic!("cancelled frame delivered")));
        c.cancel(&mut frames);
        assert_eq!(frames.cancelled.len(), 1);
    }

    #[test]
    fn cancel_during_delivery_drops_queued_events() {
        let mut frames = Frames::default();
        let mut c = FrameCoalescer::new();
        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);

        let _ = c.begin_frame(FrameHandle(1));
        c.schedule(ev(1.0, 0.0, 0.0, 0.0, 0.0), &mut frames);
        c.cancel(&mut frames);
        c.end_frame(&mut frames);

        assert!(!c.is_pending());
        assert_eq!(frames.requested.len(), 1);
    }
}
