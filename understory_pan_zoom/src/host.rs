// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the collaborators a [`GestureController`](crate::GestureController) drives.
//!
//! The controller never talks to a windowing system directly. Hosts implement
//! these traits over whatever they have (DOM listeners, winit, a test double)
//! and push raw notifications into the controller's entry points.

use core::fmt;

use kurbo::Point;

/// The interactive surface gestures are reported against.
pub trait Surface: Clone {
    /// Top-left corner of the surface's bounding box in client coordinates.
    fn client_origin(&self) -> Point;

    /// Whether the surface is a document-level target (window, document,
    /// document element, or body).
    ///
    /// Wheel input over such a target keeps its native scroll behavior.
    fn is_document_level(&self) -> bool;
}

/// Latest known pointer position over the surface.
pub trait PointerTracker {
    /// Current position, or `None` until the first pointer interaction.
    fn position(&self) -> Option<Point>;

    /// Stops tracking and releases any resources.
    fn dispose(&mut self);
}

/// Control surface of an inertial drag primitive.
///
/// Position updates, including post-release momentum, are pushed into
/// [`GestureController::drag_update`](crate::GestureController::drag_update)
/// by whoever drives the primitive.
pub trait InertiaSource {
    /// Stops reacting to pointer samples and holds any momentum.
    fn pause(&mut self);

    /// Undoes [`InertiaSource::pause`].
    fn resume(&mut self);

    /// Tears the primitive down for good.
    fn destroy(&mut self);
}

/// Two-finger contact tracker.
///
/// `start`, `change` and `end` notifications are pushed into the
/// controller's `pinch_*` entry points.
pub trait PinchTracker {
    /// Positions of the two tracked fingers, if both are down.
    fn fingers(&self) -> Option<[Point; 2]>;

    /// Whether a two-finger pinch is in progress.
    fn is_pinching(&self) -> bool;

    /// Stops tracking.
    fn disable(&mut self);
}

/// Identifies one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Frame-callback primitive (for example `requestAnimationFrame`).
///
/// When a requested frame fires, the host calls
/// [`GestureController::fire`](crate::GestureController::fire) (or the
/// `begin_frame`/`end_frame` pair) with the handle it was given.
pub trait FrameScheduler {
    /// Requests one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a previously requested callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// An installed device-event listener.
pub trait Listener {
    /// Deregisters the listener. Calling this twice is harmless.
    fn remove(&mut self);
}

/// Whether the host should suppress the native default for a raw event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Disposition {
    /// Let the platform handle the event as usual.
    #[default]
    Default,
    /// Call the platform's `preventDefault` equivalent.
    PreventDefault,
}

impl Disposition {
    /// Returns `true` for [`Disposition::PreventDefault`].
    #[must_use]
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::PreventDefault)
    }
}

/// The set of collaborator types one host provides.
pub trait Backend {
    /// Surface and element handle.
    type Surface: Surface;
    /// Pointer position source.
    type Pointer: PointerTracker;
    /// Inertial drag primitive.
    type Inertia: InertiaSource;
    /// Two-finger contact tracker.
    type Pinch: PinchTracker;
    /// Frame scheduler.
    type Frames: FrameScheduler;
    /// Installed listener handle.
    type Listener: Listener;
}

/// The collaborator instances a controller takes ownership of.
pub struct Collaborators<B: Backend> {
    /// Pointer tracker.
    pub pointer: B::Pointer,
    /// Inertia primitive.
    pub inertia: B::Inertia,
    /// Pinch tracker.
    pub pinch: B::Pinch,
    /// Frame scheduler.
    pub frames: B::Frames,
}

impl<B: Backend> fmt::Debug for Collaborators<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
