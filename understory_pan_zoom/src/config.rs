// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::inertia::Inertia;
use crate::pinch::PinchStrategy;
use crate::platform::Capabilities;

/// Tuning constants and platform capabilities for a
/// [`GestureController`](crate::GestureController).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoomConfig {
    /// Fraction of drag momentum kept each frame after release.
    pub friction: f64,
    /// Scale applied to pointer movement while dragging.
    pub multiplier: f64,
    /// Scale applied to the change in finger distance while pinching.
    pub pinch_multiplier: f64,
    /// Scale applied to gesture-event scale changes.
    pub gesture_scale_multiplier: f64,
    /// How pinch changes report their anchor.
    pub pinch_strategy: PinchStrategy,
    /// Platform quirks to work around.
    pub capabilities: Capabilities,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            friction: 0.75,
            multiplier: 1.0,
            pinch_multiplier: 2.0,
            gesture_scale_multiplier: 100.0,
            pinch_strategy: PinchStrategy::TrackCentroid,
            capabilities: Capabilities::default(),
        }
    }
}

impl PanZoomConfig {
    /// Sets the drag friction.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the drag multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the pinch zoom multiplier.
    #[must_use]
    pub fn with_pinch_multiplier(mut self, multiplier: f64) -> Self {
        self.pinch_multiplier = multiplier;
        self
    }

    /// Sets the gesture-event zoom multiplier.
    #[must_use]
    pub fn with_gesture_scale_multiplier(mut self, multiplier: f64) -> Self {
        self.gesture_scale_multiplier = multiplier;
        self
    }

    /// Sets the pinch anchoring strategy.
    #[must_use]
    pub fn with_pinch_strategy(mut self, strategy: PinchStrategy) -> Self {
        self.pinch_strategy = strategy;
        self
    }

    /// Sets the platform capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Builds the reference inertia model with this friction and multiplier.
    #[must_use]
    pub fn inertia(&self) -> Inertia {
        Inertia::new(self.friction, self.multiplier)
    }
}
