// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform quirk handling for gesture and two-finger touch events.
//!
//! Two independent shims, both driven by [`Capabilities`] detected once by the
//! host:
//!
//! - **Gesture events** (`gesturestart`/`gesturechange`/`gestureend`): always
//!   suppressed. When the platform has no touch events at all, pinch zoom is
//!   synthesized from the gesture's scale, anchored where the gesture started.
//! - **Two-finger touch**: default handling of touch events with exactly two
//!   contacts is suppressed so it cannot fight the pinch source.

use kurbo::Point;

use crate::event::{InputKind, PanZoomEvent};
use crate::host::Disposition;

/// Platform capabilities, detected once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    /// The platform emits native `gesture*` events.
    pub gesture_events: bool,
    /// The platform delivers touch events.
    pub touch_events: bool,
    /// Default two-finger touch handling conflicts with pinching.
    pub touch_scroll_conflict: bool,
}

impl Capabilities {
    /// Whether gesture events need listeners at all.
    #[must_use]
    pub fn handles_gestures(&self) -> bool {
        self.gesture_events
    }

    /// Whether gesture events must be turned into zoom events, because the
    /// pinch source will never see the underlying touches.
    #[must_use]
    pub fn synthesizes_gesture_zoom(&self) -> bool {
        self.gesture_events && !self.touch_events
    }

    /// Whether two-finger touch events need suppressing.
    #[must_use]
    pub fn suppresses_double_touch(&self) -> bool {
        self.touch_events && self.touch_scroll_conflict
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
enum GestureState {
    #[default]
    Idle,
    Active {
        anchor: Point,
        scale: f64,
    },
}

/// Applies the quirk shims for one surface.
#[derive(Clone, Copy, Debug)]
pub struct PlatformShim {
    capabilities: Capabilities,
    scale_multiplier: f64,
    gesture: GestureState,
}

impl PlatformShim {
    /// Creates a shim; `scale_multiplier` converts gesture scale changes into `dz`.
    #[must_use]
    pub fn new(capabilities: Capabilities, scale_multiplier: f64) -> Self {
        Self {
            capabilities,
            scale_multiplier,
            gesture: GestureState::Idle,
        }
    }

    /// Capabilities this shim was built with.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Handles `gesturestart` at page position `page` with initial `scale`.
    pub fn gesture_start(&mut self, page: Point, scale: f64) -> Disposition {
        if self.capabilities.synthesizes_gesture_zoom() {
            self.gesture = GestureState::Active {
                anchor: page,
                scale,
            };
        }
        Disposition::PreventDefault
    }

    /// Handles `gesturechange`, synthesizing a zoom event when required.
    pub fn gesture_change<T: Clone>(
        &mut self,
        scale: f64,
        target: &T,
    ) -> (Disposition, Option<PanZoomEvent<T>>) {
        if !self.capabilities.synthesizes_gesture_zoom() {
            return (Disposition::PreventDefault, None);
        }
        let GestureState::Active {
            anchor,
            scale: previous,
        } = self.gesture
        else {
            log::trace!("ignoring gesture change without start");
            return (Disposition::PreventDefault, None);
        };
        self.gesture = GestureState::Active { anchor, scale };
        let dz = (previous - scale) * self.scale_multiplier;
        let event = PanZoomEvent::zoom(
            dz,
            anchor,
            InputKind::Mouse,
            target.clone(),
            Some(target.clone()),
        );
        (Disposition::PreventDefault, Some(event))
    }

    /// Handles `gestureend`.
    pub fn gesture_end(&mut self) -> Disposition {
        self.gesture = GestureState::Idle;
        Disposition::PreventDefault
    }

    /// Handles `touchstart`/`touchmove`/`touchend` with `contacts` touches down.
    #[must_use]
    pub fn touch(&self, contacts: usize) -> Disposition {
        if self.capabilities.suppresses_double_touch() && contacts == 2 {
            Disposition::PreventDefault
        } else {
            Disposition::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_SAFARI: Capabilities = Capabilities {
        gesture_events: true,
        touch_events: false,
        touch_scroll_conflict: false,
    };

    const MOBILE_SAFARI: Capabilities = Capabilities {
        gesture_events: true,
        touch_events: true,
        touch_scroll_conflict: false,
    };

    const MOBILE_CHROME: Capabilities = Capabilities {
        gesture_events: false,
        touch_events: true,
        touch_scroll_conflict: true,
    };

    #[test]
    fn gesture_zoom_is_synthesized_without_touch_events() {
        let mut shim = PlatformShim::new(DESKTOP_SAFARI, 100.0);
        assert_eq!(
            shim.gesture_start(Point::new(40.0, 50.0), 1.0),
            Disposition::PreventDefault
        );

        let (disposition, ev) = shim.gesture_change(1.25, &0_u8);
        let ev = ev.unwrap();
        assert_eq!(disposition, Disposition::PreventDefault);
        assert_eq!(ev.dz, -25.0);
        assert_eq!(ev.position, Point::new(40.0, 50.0));
        assert_eq!(ev.origin, Point::new(40.0, 50.0));
        assert_eq!(ev.dx(), 0.0);
        assert_eq!(ev.kind, InputKind::Mouse);

        // Scale is tracked between changes and the anchor stays put.
        let (_, ev) = shim.gesture_change(1.0, &0_u8);
        let ev = ev.unwrap();
        assert_eq!(ev.dz, 25.0);
        assert_eq!(ev.position, Point::new(40.0, 50.0));
    }

    #[test]
    fn gesture_events_are_only_suppressed_with_touch_support() {
        let mut shim = PlatformShim::new(MOBILE_SAFARI, 100.0);

        assert!(shim.gesture_start(Point::ZERO, 1.0).prevents_default());
        let (disposition, ev) = shim.gesture_change(2.0, &0_u8);
        assert!(disposition.prevents_default());
        assert!(ev.is_none());
        assert!(shim.gesture_end().prevents_default());
    }

    #[test]
    fn gesture_change_without_start_is_ignored() {
        let mut shim = PlatformShim::new(DESKTOP_SAFARI, 100.0);
        let (disposition, ev) = shim.gesture_change(2.0, &0_u8);
        assert!(disposition.prevents_default());
        assert!(ev.is_none());

        shim.gesture_start(Point::ZERO, 1.0);
        shim.gesture_end();
        assert!(shim.gesture_change(2.0, &0_u8).1.is_none());
    }

    #[test]
    fn two_finger_touches_are_suppressed_on_conflicting_platforms() {
        let shim = PlatformShim::new(MOBILE_CHROME, 100.0);
        assert_eq!(shim.touch(1), Disposition::Default);
        assert_eq!(shim.touch(2), Disposition::PreventDefault);
        assert_eq!(shim.touch(3), Disposition::Default);

        let shim = PlatformShim::new(MOBILE_SAFARI, 100.0);
        assert_eq!(shim.touch(2), Disposition::Default);
    }

    #[test]
    fn capability_combinations() {
        assert!(DESKTOP_SAFARI.synthesizes_gesture_zoom());
        assert!(!MOBILE_SAFARI.synthesizes_gesture_zoom());
        assert!(MOBILE_SAFARI.handles_gestures());
        assert!(MOBILE_CHROME.suppresses_double_touch());
        assert!(!Capabilities::default().handles_gestures());
    }
}
