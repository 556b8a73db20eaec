// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture controller: every source, one coalesced stream.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::coalesce::FrameCoalescer;
use crate::config::PanZoomConfig;
use crate::drag::DragSource;
use crate::event::PanZoomEvent;
use crate::host::{
    Backend, Collaborators, Disposition, FrameHandle, InertiaSource, Listener, PinchTracker,
    PointerTracker,
};
use crate::pinch::PinchSource;
use crate::platform::{Capabilities, PlatformShim};
use crate::wheel::{WheelInput, WheelSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Live,
    Destroyed,
}

/// Composes the drag, wheel, pinch and platform sources over one surface and
/// funnels their events through a [`FrameCoalescer`].
///
/// Hosts push raw notifications into the entry points below and call
/// [`GestureController::fire`] (or [`GestureController::begin_frame`] and
/// [`GestureController::end_frame`]) when a requested frame arrives. After
/// [`GestureController::destroy`] every entry point is a no-op.
pub struct GestureController<B: Backend> {
    surface: B::Surface,
    pointer: B::Pointer,
    inertia: B::Inertia,
    pinch_tracker: B::Pinch,
    frames: B::Frames,
    listeners: Vec<B::Listener>,
    drag: DragSource<B::Surface>,
    wheel: WheelSource,
    pinch: PinchSource,
    shim: PlatformShim,
    coalescer: FrameCoalescer<B::Surface>,
    lifecycle: Lifecycle,
}

impl<B: Backend> fmt::Debug for GestureController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureController")
            .field("listeners", &self.listeners.len())
            .field("blocked", &self.drag.is_blocked())
            .field("pinching", &self.pinch.is_active())
            .field("frame_pending", &self.coalescer.is_pending())
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> GestureController<B> {
    /// Creates a controller for `surface`.
    pub fn new(surface: B::Surface, collaborators: Collaborators<B>, config: PanZoomConfig) -> Self {
        let Collaborators {
            pointer,
            inertia,
            pinch,
            frames,
        } = collaborators;
        Self {
            surface,
            pointer,
            inertia,
            pinch_tracker: pinch,
            frames,
            listeners: Vec::new(),
            drag: DragSource::new(),
            wheel: WheelSource::new(),
            pinch: PinchSource::new(config.pinch_strategy, config.pinch_multiplier),
            shim: PlatformShim::new(config.capabilities, config.gesture_scale_multiplier),
            coalescer: FrameCoalescer::new(),
            lifecycle: Lifecycle::Live,
        }
    }

    /// The interactive surface.
    pub fn surface(&self) -> &B::Surface {
        &self.surface
    }

    /// Capabilities the platform shim was configured with.
    pub fn capabilities(&self) -> Capabilities {
        self.shim.capabilities()
    }

    /// The pointer tracker.
    pub fn pointer(&self) -> &B::Pointer {
        &self.pointer
    }

    /// The inertia primitive, for hosts that drive it.
    pub fn inertia_mut(&mut self) -> &mut B::Inertia {
        &mut self.inertia
    }

    /// The pinch tracker, for hosts that feed it.
    pub fn pinch_tracker_mut(&mut self) -> &mut B::Pinch {
        &mut self.pinch_tracker
    }

    /// Takes ownership of an installed listener; it is removed on
    /// [`GestureController::destroy`], or immediately if already destroyed.
    pub fn add_listener(&mut self, mut listener: B::Listener) {
        if self.is_destroyed() {
            listener.remove();
        } else {
            self.listeners.push(listener);
        }
    }

    /// Returns `true` once [`GestureController::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    /// Returns `true` while panning is blocked.
    pub fn is_blocked(&self) -> bool {
        self.drag.is_blocked()
    }

    /// Returns `true` while a two-finger pinch is active.
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_active()
    }

    /// Returns `true` while a frame has been requested and not yet delivered.
    pub fn is_frame_pending(&self) -> bool {
        self.coalescer.is_pending()
    }

    /// Queues a normalized event for the next frame.
    ///
    /// Every source funnels through here; hosts may use it for events they
    /// synthesize themselves.
    pub fn schedule(&mut self, event: PanZoomEvent<B::Surface>) {
        if self.is_destroyed() {
            return;
        }
        self.coalescer.schedule(event, &mut self.frames);
    }

    /// A press landed on the surface, starting a new drag session.
    pub fn press(&mut self, source: Option<B::Surface>) {
        if self.is_destroyed() {
            return;
        }
        self.drag.press(source);
    }

    /// The inertia primitive moved to `sample`.
    ///
    /// Dropped while blocked or while a pinch is active; neither case moves
    /// the session's baseline.
    pub fn drag_update(&mut self, sample: Point) {
        if self.is_destroyed() {
            return;
        }
        if self.pinch.is_active() {
            log::trace!("dropping drag sample during pinch");
            return;
        }
        let pointer = self.pointer.position();
        if let Some(event) = self.drag.update(sample, pointer, &self.surface) {
            self.schedule(event);
        }
    }

    /// A wheel tick over the surface.
    pub fn wheel(&mut self, input: WheelInput, source: Option<B::Surface>) -> Disposition {
        if self.is_destroyed() {
            return Disposition::Default;
        }
        let pointer = self.pointer.position();
        let (disposition, event) = self.wheel.normalize(&input, pointer, &self.surface, source);
        self.schedule(event);
        disposition
    }

    /// Two fingers touched down.
    pub fn pinch_start(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let Some(fingers) = self.pinch_tracker.fingers() else {
            return;
        };
        self.pinch.start(fingers);
        self.inertia.pause();
        log::debug!("pinch started, inertia paused");
    }

    /// The distance between the two fingers changed from `previous` to `current`.
    pub fn pinch_change(&mut self, current: f64, previous: f64) {
        if self.is_destroyed() || !self.pinch_tracker.is_pinching() {
            return;
        }
        let Some(fingers) = self.pinch_tracker.fingers() else {
            return;
        };
        if let Some(event) = self.pinch.change(fingers, current, previous, &self.surface) {
            self.schedule(event);
        }
    }

    /// A finger lifted, ending the pinch.
    pub fn pinch_end(&mut self) {
        if self.is_destroyed() {
            return;
        }
        if self.pinch.end() {
            self.inertia.resume();
            log::debug!("pinch ended, inertia resumed");
        }
    }

    /// A native `gesturestart` at page position `page`.
    pub fn gesture_start(&mut self, page: Point, scale: f64) -> Disposition {
        if self.is_destroyed() {
            return Disposition::Default;
        }
        self.shim.gesture_start(page, scale)
    }

    /// A native `gesturechange` with the gesture's current `scale`.
    pub fn gesture_change(&mut self, scale: f64) -> Disposition {
        if self.is_destroyed() {
            return Disposition::Default;
        }
        let (disposition, event) = self.shim.gesture_change(scale, &self.surface);
        if let Some(event) = event {
            self.schedule(event);
        }
        disposition
    }

    /// A native `gestureend`.
    pub fn gesture_end(&mut self) -> Disposition {
        if self.is_destroyed() {
            return Disposition::Default;
        }
        self.shim.gesture_end()
    }

    /// A touch event with `contacts` fingers down.
    pub fn touch(&self, contacts: usize) -> Disposition {
        if self.is_destroyed() {
            return Disposition::Default;
        }
        self.shim.touch(contacts)
    }

    /// Stops panning from the in-progress drag session.
    ///
    /// Its samples are dropped and its baseline frozen until
    /// [`GestureController::unblock_pan`] or the next press.
    pub fn block_pan(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.drag.block();
        log::debug!("pan blocked");
    }

    /// Lifts a [`GestureController::block_pan`].
    ///
    /// With `discard_current`, momentum left over from before the block is
    /// thrown away and the next sample starts a fresh session. Does nothing
    /// unless blocked.
    pub fn unblock_pan(&mut self, discard_current: bool) {
        if self.is_destroyed() || !self.drag.is_blocked() {
            return;
        }
        self.drag.unblock(discard_current);
        log::debug!("pan unblocked (discard_current: {discard_current})");
    }

    /// Takes the event for frame `handle`, leaving the controller in its
    /// delivering state. Must be paired with [`GestureController::end_frame`].
    ///
    /// Use this pair when the consumer may call back into the controller.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> Option<PanZoomEvent<B::Surface>> {
        if self.is_destroyed() {
            return None;
        }
        self.coalescer.begin_frame(handle)
    }

    /// Finishes a delivery started by [`GestureController::begin_frame`].
    pub fn end_frame(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.coalescer.end_frame(&mut self.frames);
    }

    /// Delivers the event for frame `handle`, returning `true` if there was one.
    pub fn fire(
        &mut self,
        handle: FrameHandle,
        deliver: impl FnOnce(PanZoomEvent<B::Surface>),
    ) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.coalescer.fire(handle, &mut self.frames, deliver)
    }

    /// Tears everything down: removes listeners, destroys the inertia
    /// primitive, disables the pinch tracker, disposes the pointer tracker,
    /// and cancels the pending frame. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.lifecycle = Lifecycle::Destroyed;
        for mut listener in self.listeners.drain(..) {
            listener.remove();
        }
        self.inertia.destroy();
        self.pinch_tracker.disable();
        self.pointer.dispose();
        self.coalescer.cancel(&mut self.frames);
        log::debug!("gesture controller destroyed");
    }
}
