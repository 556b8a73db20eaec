// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The normalized pan/zoom event every input source produces.

use kurbo::{Point, Vec2};

/// The kind of device interaction an event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    /// Mouse drag, wheel, or trackpad gesture.
    #[default]
    Mouse,
    /// Two-finger touch pinch.
    Touch,
    /// Keyboard-driven navigation.
    ///
    /// No source in this crate produces it; it exists so consumers can share
    /// the event type with their own keyboard handling.
    Keyboard,
}

/// A normalized pan/zoom delta.
///
/// `T` is the host's handle type for the interactive surface and the element
/// that originated the input.
#[derive(Clone, Debug, PartialEq)]
pub struct PanZoomEvent<T> {
    /// Pan delta since the previously emitted event, in pixels.
    pub delta: Vec2,
    /// Zoom delta. Negative values zoom in (wheel up, fingers apart).
    pub dz: f64,
    /// Current anchor position.
    pub position: Point,
    /// Anchor captured when the gesture started.
    pub origin: Point,
    /// Which kind of device produced the event.
    pub kind: InputKind,
    /// The interactive surface.
    pub target: T,
    /// The low-level element that originated the input, when known.
    pub source: Option<T>,
}

impl<T> PanZoomEvent<T> {
    /// Creates a zoom-only event anchored at `anchor`, with `origin == position`.
    pub fn zoom(dz: f64, anchor: Point, kind: InputKind, target: T, source: Option<T>) -> Self {
        Self {
            delta: Vec2::ZERO,
            dz,
            position: anchor,
            origin: anchor,
            kind,
            target,
            source,
        }
    }

    /// Horizontal pan delta.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.delta.x
    }

    /// Vertical pan delta.
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.delta.y
    }

    /// Current anchor x.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Current anchor y.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Gesture-start anchor x.
    #[must_use]
    pub fn x0(&self) -> f64 {
        self.origin.x
    }

    /// Gesture-start anchor y.
    #[must_use]
    pub fn y0(&self) -> f64 {
        self.origin.y
    }

    /// Folds a later event of the same frame into this one.
    ///
    /// Deltas accumulate and the anchor moves to the later position. The
    /// gesture origin, kind, target and source of `self` are kept.
    pub fn merge(&mut self, later: Self) {
        self.delta += later.delta;
        self.dz += later.dz;
        self.position = later.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pan(dx: f64, dy: f64, dz: f64, at: Point, target: u32) -> PanZoomEvent<u32> {
        PanZoomEvent {
            delta: Vec2::new(dx, dy),
            dz,
            position: at,
            origin: at,
            kind: InputKind::Mouse,
            target,
            source: None,
        }
    }

    #[test]
    fn merge_sums_deltas_and_takes_latest_position() {
        let mut first = pan(2.0, 3.0, 0.0, Point::new(10.0, 10.0), 1);
        let mut second = pan(1.0, -1.0, 5.0, Point::new(12.0, 9.0), 2);
        second.kind = InputKind::Touch;
        second.origin = Point::new(99.0, 99.0);

        first.merge(second);

        assert_eq!(first.delta, Vec2::new(3.0, 2.0));
        assert_eq!(first.dz, 5.0);
        assert_eq!(first.position, Point::new(12.0, 9.0));
        assert_eq!(first.origin, Point::new(10.0, 10.0));
        assert_eq!(first.kind, InputKind::Mouse);
        assert_eq!(first.target, 1);
    }

    #[test]
    fn zoom_event_has_no_pan_and_shared_anchor() {
        let ev = PanZoomEvent::zoom(-3.0, Point::new(4.0, 5.0), InputKind::Mouse, 7_u32, None);

        assert_eq!((ev.dx(), ev.dy()), (0.0, 0.0));
        assert_eq!((ev.x(), ev.y()), (4.0, 5.0));
        assert_eq!((ev.x0(), ev.y0()), (4.0, 5.0));
        assert_eq!(ev.dz, -3.0);
    }
}
