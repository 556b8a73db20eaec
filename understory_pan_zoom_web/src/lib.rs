// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom_web --heading-base-level=0

//! DOM binding for `understory_pan_zoom`.
//!
//! Attaches a `GestureController` to an element (or the whole document) and
//! calls back with at most one coalesced `PanZoomEvent` per animation frame,
//! built from:
//!
//! - inertial mouse and single-finger touch drags (pan),
//! - wheel ticks (zoom, anchored at the pointer),
//! - two-finger pinches (zoom and pan around the finger centroid),
//! - Safari `gesture*` events, and Chrome's two-finger scroll quirk.
//!
//! # Usage
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn attach() -> Result<understory_pan_zoom_web::PanZoom, understory_pan_zoom_web::PanZoomError> {
//!     use understory_pan_zoom_web::{PanZoomTarget, pan_zoom};
//!
//!     pan_zoom(PanZoomTarget::Selector("#viewport"), |ev| {
//!         // Apply `ev.delta` as a pan and `ev.dz` as a zoom around `ev.position`.
//!         let _ = (ev.delta, ev.dz, ev.position);
//!     })
//! }
//! ```
//!
//! Keep the returned `PanZoom` alive for as long as the binding should stay
//! attached; dropping it removes every listener.
//!
//! Browser capabilities are sniffed once when attaching, see [`detect`]. The
//! DOM-facing parts of this crate only exist on `wasm32`; [`detect`] and
//! [`touch`] are plain logic and available everywhere.

#![no_std]

extern crate alloc;

pub mod detect;
mod error;
pub mod touch;

#[cfg(target_arch = "wasm32")]
mod binding;
#[cfg(target_arch = "wasm32")]
mod dom;

pub use error::PanZoomError;

#[cfg(target_arch = "wasm32")]
pub use binding::{PanZoom, PanZoomTarget, pan_zoom, pan_zoom_document, pan_zoom_with_config};
#[cfg(target_arch = "wasm32")]
pub use dom::ElementSurface;
