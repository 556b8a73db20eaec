// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-finger tracking over raw touch lists.
//!
//! [`FingerPair`] follows the first two contacts to touch down by identifier
//! and turns touch starts, moves and ends into pinch notifications. It knows
//! nothing about the DOM; the binding converts each `TouchList` into a slice
//! of [`Contact`]s first.
//!
//! ```
//! use kurbo::Point;
//! use understory_pan_zoom_web::touch::{Contact, FingerPair, PinchNote};
//!
//! let mut pair = FingerPair::default();
//! let a = Contact { id: 1, at: Point::new(0.0, 0.0) };
//! let b = Contact { id: 2, at: Point::new(30.0, 40.0) };
//!
//! assert_eq!(pair.touch_start(&[a, b]), Some(PinchNote::Start));
//! let b = Contact { id: 2, at: Point::new(60.0, 80.0) };
//! assert_eq!(
//!     pair.touch_move(&[a, b]),
//!     Some(PinchNote::Change { current: 100.0, previous: 50.0 })
//! );
//! assert_eq!(pair.touch_end(&[a]), Some(PinchNote::End));
//! ```

use kurbo::Point;

/// One touch point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// `Touch.identifier`.
    pub id: i32,
    /// Position relative to the surface.
    pub at: Point,
}

/// What a touch event meant for the pinch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinchNote {
    /// Two fingers are now down.
    Start,
    /// The tracked fingers moved; distances are in pixels.
    Change {
        /// Distance between the fingers now.
        current: f64,
        /// Distance at the previous notification.
        previous: f64,
    },
    /// One of the tracked fingers lifted.
    End,
}

/// Tracks the pair of fingers forming a pinch.
#[derive(Clone, Copy, Debug, Default)]
pub struct FingerPair {
    pair: Option<[Contact; 2]>,
    distance: f64,
    disabled: bool,
}

impl FingerPair {
    /// Positions of both tracked fingers while pinching.
    #[must_use]
    pub fn positions(&self) -> Option<[Point; 2]> {
        self.pair.map(|[a, b]| [a.at, b.at])
    }

    /// Returns `true` while two fingers are tracked.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pair.is_some()
    }

    /// Stops tracking; later touches are ignored.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.pair = None;
    }

    /// Handles `touchstart` with every contact currently down.
    pub fn touch_start(&mut self, touches: &[Contact]) -> Option<PinchNote> {
        if self.disabled || self.pair.is_some() {
            return None;
        }
        let &[a, b, ..] = touches else {
            return None;
        };
        self.pair = Some([a, b]);
        self.distance = a.at.distance(b.at);
        Some(PinchNote::Start)
    }

    /// Handles `touchmove` with every contact currently down.
    pub fn touch_move(&mut self, touches: &[Contact]) -> Option<PinchNote> {
        let pair = self.pair.as_mut()?;
        let mut moved = false;
        for finger in pair.iter_mut() {
            if let Some(t) = touches.iter().find(|t| t.id == finger.id) {
                moved |= t.at != finger.at;
                finger.at = t.at;
            }
        }
        if !moved {
            return None;
        }
        let previous = self.distance;
        self.distance = pair[0].at.distance(pair[1].at);
        Some(PinchNote::Change {
            current: self.distance,
            previous,
        })
    }

    /// Handles `touchend`/`touchcancel` with the contacts still down.
    pub fn touch_end(&mut self, remaining: &[Contact]) -> Option<PinchNote> {
        let pair = self.pair?;
        let intact = pair
            .iter()
            .all(|finger| remaining.iter().any(|t| t.id == finger.id));
        if intact {
            return None;
        }
        self.pair = None;
        Some(PinchNote::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: i32, x: f64, y: f64) -> Contact {
        Contact {
            id,
            at: Point::new(x, y),
        }
    }

    #[test]
    fn one_finger_is_not_a_pinch() {
        let mut pair = FingerPair::default();
        assert_eq!(pair.touch_start(&[contact(1, 0.0, 0.0)]), None);
        assert!(!pair.is_pinching());
        assert_eq!(pair.touch_move(&[contact(1, 5.0, 0.0)]), None);
    }

    #[test]
    fn second_finger_starts_the_pinch() {
        let mut pair = FingerPair::default();
        pair.touch_start(&[contact(1, 0.0, 0.0)]);

        let note = pair.touch_start(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]);

        assert_eq!(note, Some(PinchNote::Start));
        assert_eq!(
            pair.positions(),
            Some([Point::new(0.0, 0.0), Point::new(10.0, 0.0)])
        );
    }

    #[test]
    fn third_finger_is_ignored() {
        let mut pair = FingerPair::default();
        pair.touch_start(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]);

        let all = [
            contact(1, 0.0, 0.0),
            contact(2, 10.0, 0.0),
            contact(3, 99.0, 99.0),
        ];
        assert_eq!(pair.touch_start(&all), None);
        assert_eq!(pair.touch_move(&[contact(3, 50.0, 50.0)]), None);
        assert_eq!(pair.touch_end(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]), None);
        assert!(pair.is_pinching());
    }

    #[test]
    fn moves_report_current_and_previous_distance() {
        let mut pair = FingerPair::default();
        pair.touch_start(&[contact(7, 0.0, 0.0), contact(9, 10.0, 0.0)]);

        let first = pair.touch_move(&[contact(9, 20.0, 0.0), contact(7, 0.0, 0.0)]);
        let second = pair.touch_move(&[contact(7, 5.0, 0.0), contact(9, 20.0, 0.0)]);

        assert_eq!(
            first,
            Some(PinchNote::Change {
                current: 20.0,
                previous: 10.0
            })
        );
        assert_eq!(
            second,
            Some(PinchNote::Change {
                current: 15.0,
                previous: 20.0
            })
        );
    }

    #[test]
    fn lifting_a_tracked_finger_ends_the_pinch() {
        let mut pair = FingerPair::default();
        pair.touch_start(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]);

        assert_eq!(pair.touch_end(&[contact(2, 10.0, 0.0)]), Some(PinchNote::End));
        assert!(!pair.is_pinching());
        assert_eq!(pair.positions(), None);
        assert_eq!(pair.touch_end(&[]), None);
    }

    #[test]
    fn disabled_pair_ignores_touches() {
        let mut pair = FingerPair::default();
        pair.touch_start(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]);

        pair.disable();

        assert!(!pair.is_pinching());
        assert_eq!(
            pair.touch_start(&[contact(1, 0.0, 0.0), contact(2, 10.0, 0.0)]),
            None
        );
    }
}
