// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom --heading-base-level=0

//! Understory Pan/Zoom: one pan/zoom stream from many kinds of input.
//!
//! This crate normalizes inertial mouse/touch drags, wheel ticks, two-finger
//! pinches and platform gesture events into a single stream of
//! [`PanZoomEvent`]s, delivered at most once per rendered frame.
//!
//! - [`drag`]: integrated inertia positions into pan deltas, with block/unblock
//! - [`wheel`]: wheel ticks into zoom deltas anchored at the pointer
//! - [`pinch`]: two-finger contact into pan and zoom deltas around the centroid
//! - [`platform`]: gesture-event and two-finger touch quirk shims
//! - [`coalesce`]: merge same-frame events into one delivery
//! - [`GestureController`]: composes all of the above over one surface
//!
//! The crate owns no event loop and no windowing types. Hosts implement the
//! collaborator traits in [`host`] (pointer tracker, inertia primitive, pinch
//! tracker, frame scheduler, listener handles) and push raw notifications into
//! the controller. `understory_pan_zoom_web` does this for the DOM.
//!
//! ## Event model
//!
//! Each [`PanZoomEvent`] carries a pan delta (`dx`, `dy`), a zoom delta (`dz`,
//! negative for zoom-in), the current anchor (`x`, `y`), and the anchor
//! captured when the gesture started (`x0`, `y0`). When several events land
//! in the same frame they are merged: deltas add up, the anchor moves to the
//! latest position, and the gesture origin of the first event is kept.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_pan_zoom::{
//!     Backend, Collaborators, FrameHandle, FrameScheduler, GestureController, Inertia,
//!     Listener, PanZoomConfig, PinchTracker, PointerTracker, Surface, WheelInput,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Canvas;
//!
//! impl Surface for Canvas {
//!     fn client_origin(&self) -> Point { Point::new(20.0, 30.0) }
//!     fn is_document_level(&self) -> bool { false }
//! }
//!
//! struct NoPointer;
//! impl PointerTracker for NoPointer {
//!     fn position(&self) -> Option<Point> { None }
//!     fn dispose(&mut self) {}
//! }
//!
//! struct NoPinch;
//! impl PinchTracker for NoPinch {
//!     fn fingers(&self) -> Option<[Point; 2]> { None }
//!     fn is_pinching(&self) -> bool { false }
//!     fn disable(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Frames(u64);
//! impl FrameScheduler for Frames {
//!     fn request_frame(&mut self) -> FrameHandle { self.0 += 1; FrameHandle(self.0) }
//!     fn cancel_frame(&mut self, _: FrameHandle) {}
//! }
//!
//! struct NoListener;
//! impl Listener for NoListener {
//!     fn remove(&mut self) {}
//! }
//!
//! struct Host;
//! impl Backend for Host {
//!     type Surface = Canvas;
//!     type Pointer = NoPointer;
//!     type Inertia = Inertia;
//!     type Pinch = NoPinch;
//!     type Frames = Frames;
//!     type Listener = NoListener;
//! }
//!
//! let config = PanZoomConfig::default();
//! let mut controller = GestureController::<Host>::new(
//!     Canvas,
//!     Collaborators {
//!         pointer: NoPointer,
//!         inertia: config.inertia(),
//!         pinch: NoPinch,
//!         frames: Frames::default(),
//!     },
//!     config,
//! );
//!
//! // Two wheel ticks before the frame fires are delivered together.
//! let tick = |zoom| WheelInput { pan: kurbo::Vec2::ZERO, zoom, client: Point::new(50.0, 80.0) };
//! controller.wheel(tick(-10.0), None);
//! controller.wheel(tick(-5.0), None);
//!
//! let mut seen = Vec::new();
//! controller.fire(FrameHandle(1), |ev| seen.push((ev.dz, ev.x(), ev.y())));
//! assert_eq!(seen, [(-15.0, 30.0, 50.0)]);
//!
//! controller.destroy();
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod coalesce;
mod config;
mod controller;
pub mod drag;
mod event;
pub mod host;
mod inertia;
pub mod pinch;
pub mod platform;
pub mod wheel;

pub use coalesce::FrameCoalescer;
pub use config::PanZoomConfig;
pub use controller::GestureController;
pub use event::{InputKind, PanZoomEvent};
pub use host::{
    Backend, Collaborators, Disposition, FrameHandle, FrameScheduler, InertiaSource, Listener,
    PinchTracker, PointerTracker, Surface,
};
pub use inertia::{Inertia, Phase};
pub use pinch::PinchStrategy;
pub use platform::Capabilities;
pub use wheel::WheelInput;
