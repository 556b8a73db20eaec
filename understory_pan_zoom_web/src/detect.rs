// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser capability detection and wheel delta normalization.
//!
//! Both are pure functions of values read from the DOM once, so they are
//! usable (and tested) off the web as well.

use understory_pan_zoom::Capabilities;

/// Pixels per line for `WheelEvent.DOM_DELTA_LINE`.
pub const LINE_HEIGHT: f64 = 16.0;

/// Derives the quirk shims to enable from `navigator.vendor` and whether the
/// global `Touch` constructor exists.
///
/// Apple browsers emit `gesture*` events; Google browsers with touch support
/// fight two-finger pinches with native scrolling.
#[must_use]
pub fn capabilities(vendor: &str, has_touch: bool) -> Capabilities {
    Capabilities {
        gesture_events: vendor.contains("Apple"),
        touch_events: has_touch,
        touch_scroll_conflict: vendor.contains("Google Inc"),
    }
}

/// Unit of a `WheelEvent` delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeltaMode {
    /// `DOM_DELTA_PIXEL`.
    #[default]
    Pixel,
    /// `DOM_DELTA_LINE`.
    Line,
    /// `DOM_DELTA_PAGE`.
    Page,
}

impl DeltaMode {
    /// Maps `WheelEvent.deltaMode`; unknown values are treated as pixels.
    #[must_use]
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }

    /// Converts `delta` in this unit to pixels, given the viewport height
    /// used for page deltas.
    #[must_use]
    pub fn to_pixels(self, delta: f64, page_height: f64) -> f64 {
        match self {
            Self::Pixel => delta,
            Self::Line => delta * LINE_HEIGHT,
            Self::Page => delta * page_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFARI: &str = "Apple Computer, Inc.";
    const CHROME: &str = "Google Inc.";

    #[test]
    fn apple_vendor_enables_gesture_shim() {
        let desktop = capabilities(SAFARI, false);
        assert!(desktop.synthesizes_gesture_zoom());
        assert!(!desktop.suppresses_double_touch());

        let mobile = capabilities(SAFARI, true);
        assert!(mobile.handles_gestures());
        assert!(!mobile.synthesizes_gesture_zoom());
    }

    #[test]
    fn google_vendor_needs_touch_for_double_touch_suppression() {
        assert!(capabilities(CHROME, true).suppresses_double_touch());
        assert!(!capabilities(CHROME, false).suppresses_double_touch());
        assert!(!capabilities(CHROME, true).handles_gestures());
    }

    #[test]
    fn other_vendors_get_no_shims() {
        let expected = Capabilities {
            gesture_events: false,
            touch_events: true,
            touch_scroll_conflict: false,
        };
        assert_eq!(capabilities("", true), expected);
    }

    #[test]
    fn wheel_deltas_are_normalized_to_pixels() {
        assert_eq!(DeltaMode::from_dom(0).to_pixels(-53.0, 800.0), -53.0);
        assert_eq!(DeltaMode::from_dom(1).to_pixels(3.0, 800.0), 48.0);
        assert_eq!(DeltaMode::from_dom(2).to_pixels(-1.0, 800.0), -800.0);
        assert_eq!(DeltaMode::from_dom(9), DeltaMode::Pixel);
    }
}
