// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wires a [`GestureController`] to the DOM.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::ToString;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Point, Vec2};
use understory_pan_zoom::{
    Capabilities, Collaborators, Disposition, FrameHandle, GestureController, PanZoomConfig,
    PanZoomEvent, WheelInput,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, MouseEvent, TouchEvent, WheelEvent, Window};

use crate::detect::{self, DeltaMode};
use crate::dom::{
    DomPointer, ElementSurface, EventListener, RafScheduler, TouchPinch, WebBackend,
    first_touch_client, mouse_client, touch_contacts,
};
use crate::error::PanZoomError;
use crate::touch::{Contact, PinchNote};

type Callback = Box<dyn FnMut(PanZoomEvent<ElementSurface>)>;

/// What to attach pan/zoom handling to.
#[derive(Clone, Debug)]
pub enum PanZoomTarget<'a> {
    /// The whole document.
    Document,
    /// A specific element.
    Element(Element),
    /// The first element matching a CSS selector, resolved when attaching.
    Selector(&'a str),
}

/// Handle to an attached pan/zoom binding.
///
/// Dropping the handle detaches it.
pub struct PanZoom {
    runtime: Rc<Runtime>,
}

impl fmt::Debug for PanZoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoom")
            .field("surface", &self.runtime.surface)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

impl PanZoom {
    /// Removes every listener and cancels pending frames. Safe to call more
    /// than once.
    pub fn destroy(&self) {
        self.runtime.destroy();
    }

    /// Returns `true` once destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.runtime
            .with_controller(|c| c.is_destroyed())
            .unwrap_or(false)
    }

    /// Stops the in-progress drag from panning.
    pub fn block_pan(&self) {
        self.runtime.with_controller(|c| c.block_pan());
    }

    /// Lifts [`PanZoom::block_pan`]; with `discard_current`, leftover momentum
    /// from before the block is thrown away.
    pub fn unblock_pan(&self, discard_current: bool) {
        self.runtime.with_controller(|c| c.unblock_pan(discard_current));
    }
}

impl Drop for PanZoom {
    fn drop(&mut self) {
        self.runtime.destroy();
    }
}

/// Attaches pan/zoom handling to the whole document.
pub fn pan_zoom_document(
    callback: impl FnMut(PanZoomEvent<ElementSurface>) + 'static,
) -> Result<PanZoom, PanZoomError> {
    pan_zoom(PanZoomTarget::Document, callback)
}

/// Attaches pan/zoom handling to `target` with the default configuration.
///
/// `callback` receives at most one coalesced event per animation frame. It
/// runs with no internal state borrowed, so it may call back into the
/// returned [`PanZoom`].
pub fn pan_zoom(
    target: PanZoomTarget<'_>,
    callback: impl FnMut(PanZoomEvent<ElementSurface>) + 'static,
) -> Result<PanZoom, PanZoomError> {
    pan_zoom_with_config(target, PanZoomConfig::default(), callback)
}

/// Attaches pan/zoom handling to `target`.
///
/// The configuration's capabilities are replaced by the ones detected from
/// the browser.
pub fn pan_zoom_with_config(
    target: PanZoomTarget<'_>,
    config: PanZoomConfig,
    callback: impl FnMut(PanZoomEvent<ElementSurface>) + 'static,
) -> Result<PanZoom, PanZoomError> {
    let window = web_sys::window().ok_or(PanZoomError::NoWindow)?;
    let document = window.document().ok_or(PanZoomError::NoDocument)?;
    let element = match target {
        PanZoomTarget::Document => document
            .document_element()
            .ok_or(PanZoomError::NoDocument)?,
        PanZoomTarget::Element(element) => element,
        PanZoomTarget::Selector(selector) => document
            .query_selector(selector)?
            .ok_or_else(|| PanZoomError::SelectorNotFound(selector.to_string()))?,
    };
    let surface = ElementSurface::new(element, &document);
    let config = config.with_capabilities(detect_capabilities(&window));
    let pointer = DomPointer::new(&window, &surface)?;
    let callback: Callback = Box::new(callback);

    let runtime = Rc::new_cyclic(|weak: &Weak<Runtime>| {
        let frames = {
            let weak = weak.clone();
            RafScheduler::new(window.clone(), move |handle| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.deliver(handle);
                }
            })
        };
        let momentum = {
            let weak = weak.clone();
            Momentum::new(move || {
                if let Some(runtime) = weak.upgrade() {
                    runtime.momentum_tick();
                }
            })
        };
        let controller = GestureController::new(
            surface.clone(),
            Collaborators {
                pointer,
                inertia: config.inertia(),
                pinch: TouchPinch::default(),
                frames,
            },
            config,
        );
        Runtime {
            window: window.clone(),
            document,
            surface,
            controller: RefCell::new(controller),
            callback: RefCell::new(callback),
            momentum,
        }
    });

    if let Err(err) = install(&runtime, config.capabilities) {
        runtime.destroy();
        return Err(err);
    }
    log::debug!(
        "pan/zoom attached to <{}> ({:?})",
        runtime.surface.element().tag_name(),
        config.capabilities
    );
    Ok(PanZoom { runtime })
}

fn detect_capabilities(window: &Window) -> Capabilities {
    let vendor = window.navigator().vendor();
    let has_touch = js_sys::Reflect::has(window, &JsValue::from_str("Touch")).unwrap_or(false);
    detect::capabilities(&vendor, has_touch)
}

/// Self-rescheduling `requestAnimationFrame` loop stepping post-release
/// momentum.
struct Momentum {
    frame: Cell<Option<i32>>,
    tick: Closure<dyn FnMut()>,
}

impl Momentum {
    fn new(tick: impl FnMut() + 'static) -> Self {
        Self {
            frame: Cell::new(None),
            tick: Closure::wrap(Box::new(tick) as Box<dyn FnMut()>),
        }
    }
}

struct Runtime {
    window: Window,
    document: Document,
    surface: ElementSurface,
    controller: RefCell<GestureController<WebBackend>>,
    callback: RefCell<Callback>,
    momentum: Momentum,
}

impl Runtime {
    fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut GestureController<WebBackend>) -> R,
    ) -> Option<R> {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => Some(f(&mut controller)),
            Err(_) => {
                log::trace!("controller busy, dropping notification");
                None
            }
        }
    }

    fn now(&self) -> f64 {
        self.window.performance().map_or(0.0, |p| p.now())
    }

    fn source_of(&self, event: &Event) -> Option<ElementSurface> {
        event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| ElementSurface::new(element, &self.document))
    }

    /// Delivers frame `handle` to the consumer with nothing borrowed.
    fn deliver(&self, handle: FrameHandle) {
        let Some(event) = self.with_controller(|c| c.begin_frame(handle)).flatten() else {
            return;
        };
        match self.callback.try_borrow_mut() {
            Ok(mut callback) => callback(event),
            Err(_) => log::warn!("pan/zoom callback re-entered; event dropped"),
        }
        self.with_controller(|c| c.end_frame());
    }

    fn press(&self, source: Option<ElementSurface>, client: Point) {
        let now = self.now();
        self.with_controller(|c| {
            c.press(source);
            c.inertia_mut().press(client, now);
        });
    }

    fn pointer_move(&self, client: Point) {
        let now = self.now();
        self.with_controller(|c| {
            if let Some(position) = c.inertia_mut().drag(client, now) {
                c.drag_update(position);
            }
        });
    }

    fn release(&self) {
        let now = self.now();
        let flicked = self.with_controller(|c| c.inertia_mut().release(now));
        if flicked == Some(true) {
            self.start_momentum();
        }
    }

    fn start_momentum(&self) {
        if self.momentum.frame.get().is_some() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.momentum.tick.as_ref().unchecked_ref())
        {
            Ok(id) => self.momentum.frame.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn momentum_tick(&self) {
        self.momentum.frame.set(None);
        let moving = self.with_controller(|c| match c.inertia_mut().step() {
            Some(position) => {
                c.drag_update(position);
                true
            }
            None => false,
        });
        if moving == Some(true) {
            self.start_momentum();
        }
    }

    fn pinch(
        &self,
        event: &TouchEvent,
        note: impl FnOnce(&mut TouchPinch, &[Contact]) -> Option<PinchNote>,
    ) {
        let contacts = touch_contacts(&event.touches(), &self.surface);
        let resumed = self.with_controller(|c| {
            match note(c.pinch_tracker_mut(), &contacts)? {
                PinchNote::Start => c.pinch_start(),
                PinchNote::Change { current, previous } => c.pinch_change(current, previous),
                PinchNote::End => {
                    c.pinch_end();
                    return Some(c.inertia_mut().is_decelerating());
                }
            }
            None
        });
        if resumed.flatten() == Some(true) {
            self.start_momentum();
        }
    }

    fn wheel(&self, event: &WheelEvent) {
        let page_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let mode = DeltaMode::from_dom(event.delta_mode());
        let input = WheelInput {
            pan: Vec2::new(mode.to_pixels(event.delta_x(), page_height), 0.0),
            zoom: mode.to_pixels(event.delta_y(), page_height),
            client: mouse_client(event),
        };
        let source = self.source_of(event);
        let disposition = self
            .with_controller(|c| c.wheel(input, source))
            .unwrap_or_default();
        apply(event, disposition);
    }

    fn destroy(&self) {
        self.with_controller(|c| c.destroy());
        if let Some(id) = self.momentum.frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

fn apply(event: &Event, disposition: Disposition) {
    if disposition.prevents_default() {
        event.prevent_default();
    }
}

/// Reads a numeric property `web-sys` has no binding for.
fn number(event: &Event, key: &str, fallback: f64) -> f64 {
    js_sys::Reflect::get(event, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(fallback)
}

fn listen(
    runtime: &Rc<Runtime>,
    target: &EventTarget,
    kind: &'static str,
    passive: bool,
    handler: impl Fn(&Runtime, &Event) + 'static,
) -> Result<(), PanZoomError> {
    let weak = Rc::downgrade(runtime);
    let listener = EventListener::new(target, kind, passive, move |event| {
        if let Some(runtime) = weak.upgrade() {
            handler(&runtime, &event);
        }
    })?;
    runtime.with_controller(|c| c.add_listener(listener));
    Ok(())
}

fn install(runtime: &Rc<Runtime>, capabilities: Capabilities) -> Result<(), PanZoomError> {
    let surface: &EventTarget = runtime.surface.element();
    let window: &EventTarget = &runtime.window;

    // Inertial drag: press on the surface, move and release anywhere.
    listen(runtime, surface, "mousedown", true, |rt, event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            rt.press(rt.source_of(event), mouse_client(mouse));
        }
    })?;
    listen(runtime, surface, "touchstart", true, |rt, event| {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        // A second finger joins the pinch; it does not start a new session.
        let touches = touch.touches();
        if touches.length() == 1 {
            if let Some(client) = first_touch_client(&touches) {
                rt.press(rt.source_of(event), client);
            }
        }
        rt.pinch(touch, |pinch, contacts| pinch.fingers_mut().touch_start(contacts));
    })?;
    listen(runtime, window, "mousemove", true, |rt, event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            rt.pointer_move(mouse_client(mouse));
        }
    })?;
    listen(runtime, window, "touchmove", true, |rt, event| {
        let client = event
            .dyn_ref::<TouchEvent>()
            .map(TouchEvent::touches)
            .filter(|touches| touches.length() == 1)
            .and_then(|touches| first_touch_client(&touches));
        if let Some(client) = client {
            rt.pointer_move(client);
        }
    })?;
    listen(runtime, window, "mouseup", true, |rt, _| rt.release())?;
    for kind in ["touchend", "touchcancel"] {
        listen(runtime, window, kind, true, |rt, event| {
            let lifted = event
                .dyn_ref::<TouchEvent>()
                .is_some_and(|touch| touch.touches().length() == 0);
            if lifted {
                rt.release();
            }
        })?;
    }

    // Wheel zoom.
    listen(runtime, surface, "wheel", false, |rt, event| {
        if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
            rt.wheel(wheel);
        }
    })?;

    // Two-finger pinch.
    listen(runtime, surface, "touchmove", true, |rt, event| {
        if let Some(touch) = event.dyn_ref::<TouchEvent>() {
            rt.pinch(touch, |pinch, contacts| pinch.fingers_mut().touch_move(contacts));
        }
    })?;
    for kind in ["touchend", "touchcancel"] {
        listen(runtime, surface, kind, true, |rt, event| {
            if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                rt.pinch(touch, |pinch, contacts| pinch.fingers_mut().touch_end(contacts));
            }
        })?;
    }

    if capabilities.handles_gestures() {
        listen(runtime, surface, "gesturestart", false, |rt, event| {
            let page = Point::new(number(event, "pageX", 0.0), number(event, "pageY", 0.0));
            let scale = number(event, "scale", 1.0);
            let disposition = rt
                .with_controller(|c| c.gesture_start(page, scale))
                .unwrap_or_default();
            apply(event, disposition);
        })?;
        listen(runtime, surface, "gesturechange", false, |rt, event| {
            let scale = number(event, "scale", 1.0);
            let disposition = rt
                .with_controller(|c| c.gesture_change(scale))
                .unwrap_or_default();
            apply(event, disposition);
        })?;
        listen(runtime, surface, "gestureend", false, |rt, event| {
            let disposition = rt.with_controller(|c| c.gesture_end()).unwrap_or_default();
            apply(event, disposition);
        })?;
    }

    if capabilities.suppresses_double_touch() {
        for kind in ["touchstart", "touchmove", "touchend"] {
            listen(runtime, surface, kind, false, |rt, event| {
                let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let contacts = touch.touches().length() as usize;
                let disposition = rt.with_controller(|c| c.touch(contacts)).unwrap_or_default();
                apply(event, disposition);
            })?;
        }
    }

    Ok(())
}
