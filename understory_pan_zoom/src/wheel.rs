// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel source: one zoom event per wheel tick.

use kurbo::{Point, Vec2};

use crate::event::{InputKind, PanZoomEvent};
use crate::host::{Disposition, Surface};

/// A wheel tick as reported by the wheel listener.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    /// Raw horizontal and vertical deltas, in pixels.
    pub pan: Vec2,
    /// Raw zoom-axis delta, in pixels.
    pub zoom: f64,
    /// Pointer position in client coordinates at the time of the tick.
    pub client: Point,
}

/// Normalizes wheel ticks into zoom events.
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelSource;

impl WheelSource {
    /// Creates a wheel source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Anchor for a tick: the tracked pointer, or the tick's own client
    /// position relative to the surface when the tracker has not seen the
    /// pointer yet.
    #[must_use]
    pub fn anchor<S: Surface>(&self, input: &WheelInput, pointer: Option<Point>, surface: &S) -> Point {
        pointer.unwrap_or_else(|| {
            let origin = surface.client_origin();
            Point::new(input.client.x - origin.x, input.client.y - origin.y)
        })
    }

    /// Normalizes a tick.
    ///
    /// Native scrolling is suppressed unless the surface is document-level.
    pub fn normalize<S: Surface>(
        &self,
        input: &WheelInput,
        pointer: Option<Point>,
        surface: &S,
        source: Option<S>,
    ) -> (Disposition, PanZoomEvent<S>) {
        let disposition = if surface.is_document_level() {
            Disposition::Default
        } else {
            Disposition::PreventDefault
        };
        let anchor = self.anchor(input, pointer, surface);
        let event = PanZoomEvent::zoom(input.zoom, anchor, InputKind::Mouse, surface.clone(), source);
        (disposition, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Panel {
        origin: Point,
        document: bool,
    }

    impl Surface for Panel {
        fn client_origin(&self) -> Point {
            self.origin
        }

        fn is_document_level(&self) -> bool {
            self.document
        }
    }

    const ELEMENT: Panel = Panel {
        origin: Point::new(20.0, 30.0),
        document: false,
    };

    fn tick(zoom: f64, client: Point) -> WheelInput {
        WheelInput {
            pan: Vec2::ZERO,
            zoom,
            client,
        }
    }

    #[test]
    fn unset_pointer_falls_back_to_client_position_in_surface() {
        let (_, ev) = WheelSource::new().normalize(
            &tick(-100.0, Point::new(50.0, 80.0)),
            None,
            &ELEMENT,
            None,
        );

        assert_eq!(ev.position, Point::new(30.0, 50.0));
        assert_eq!(ev.origin, Point::new(30.0, 50.0));
    }

    #[test]
    fn tracked_pointer_wins_over_client_position() {
        let (_, ev) = WheelSource::new().normalize(
            &tick(3.0, Point::new(50.0, 80.0)),
            Some(Point::new(7.0, 8.0)),
            &ELEMENT,
            None,
        );

        assert_eq!(ev.position, Point::new(7.0, 8.0));
    }

    #[test]
    fn tick_is_zoom_only_mouse_event() {
        let input = WheelInput {
            pan: Vec2::new(4.0, 9.0),
            zoom: 12.5,
            client: Point::ZERO,
        };
        let (_, ev) = WheelSource::new().normalize(&input, Some(Point::ZERO), &ELEMENT, None);

        assert_eq!(ev.delta, Vec2::ZERO);
        assert_eq!(ev.dz, 12.5);
        assert_eq!(ev.kind, InputKind::Mouse);
        assert_eq!(ev.target, ELEMENT);
    }

    #[test]
    fn element_surfaces_suppress_native_scroll() {
        let (disposition, _) =
            WheelSource::new().normalize(&tick(1.0, Point::ZERO), None, &ELEMENT, None);
        assert_eq!(disposition, Disposition::PreventDefault);
    }

    #[test]
    fn document_surfaces_keep_native_scroll() {
        let document = Panel {
            origin: Point::ZERO,
            document: true,
        };
        let (disposition, _) =
            WheelSource::new().normalize(&tick(1.0, Point::ZERO), None, &document, None);
        assert_eq!(disposition, Disposition::Default);
    }
}
