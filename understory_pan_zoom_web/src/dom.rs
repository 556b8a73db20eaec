// Copyright 2026 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM implementations of the collaborator traits.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use kurbo::Point;
use understory_pan_zoom::{
    Backend, FrameHandle, FrameScheduler, Inertia, Listener, PinchTracker, PointerTracker, Surface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, MouseEvent, TouchEvent,
    TouchList, Window,
};

use crate::error::PanZoomError;
use crate::touch::{Contact, FingerPair};

/// A DOM element acting as a pan/zoom surface, or as the element a press
/// landed on.
#[derive(Clone, PartialEq)]
pub struct ElementSurface {
    element: Element,
    document_level: bool,
}

impl fmt::Debug for ElementSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSurface")
            .field("tag", &self.element.tag_name())
            .field("document_level", &self.document_level)
            .finish()
    }
}

impl ElementSurface {
    pub(crate) fn new(element: Element, document: &Document) -> Self {
        let is_root = document.document_element().as_ref() == Some(&element);
        let is_body = document
            .body()
            .is_some_and(|body| AsRef::<Element>::as_ref(&body) == &element);
        Self {
            element,
            document_level: is_root || is_body,
        }
    }

    /// The wrapped element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Converts a client-space point to coordinates relative to this element.
    pub fn to_local(&self, client: Point) -> Point {
        let origin = self.client_origin();
        Point::new(client.x - origin.x, client.y - origin.y)
    }
}

impl Surface for ElementSurface {
    fn client_origin(&self) -> Point {
        let rect = self.element.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    fn is_document_level(&self) -> bool {
        self.document_level
    }
}

/// Client coordinates of a mouse event.
pub(crate) fn mouse_client(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Client coordinates of every touch in `list`, with identifiers.
pub(crate) fn touch_contacts(list: &TouchList, surface: &ElementSurface) -> Vec<Contact> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Contact {
            id: touch.identifier(),
            at: surface.to_local(Point::new(
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
            )),
        })
        .collect()
}

/// Client coordinates of the first touch in `list`.
pub(crate) fn first_touch_client(list: &TouchList) -> Option<Point> {
    list.get(0)
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
}

/// An installed DOM event listener; removes itself on [`Listener::remove`]
/// or drop.
pub(crate) struct EventListener {
    target: EventTarget,
    kind: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl EventListener {
    /// Installs `handler` for `kind` events on `target`.
    ///
    /// Non-passive listeners may cancel the event's default action.
    pub(crate) fn new(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, PanZoomError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure: Some(closure),
        })
    }
}

impl Listener for EventListener {
    fn remove(&mut self) {
        let Some(closure) = self.closure.take() else {
            return;
        };
        // Teardown is best-effort; a failed removal leaves nothing to retry.
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, closure.as_ref().unchecked_ref());
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Pointer position relative to the surface, fed by window-level mouse and
/// touch listeners.
pub(crate) struct DomPointer {
    position: Rc<Cell<Option<Point>>>,
    listeners: Vec<EventListener>,
}

impl DomPointer {
    pub(crate) fn new(window: &Window, surface: &ElementSurface) -> Result<Self, PanZoomError> {
        let position = Rc::new(Cell::new(None));
        let mut listeners = Vec::with_capacity(4);
        for kind in ["mousemove", "mousedown"] {
            let (position, surface) = (position.clone(), surface.clone());
            listeners.push(EventListener::new(window, kind, true, move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    position.set(Some(surface.to_local(mouse_client(event))));
                }
            })?);
        }
        for kind in ["touchstart", "touchmove"] {
            let (position, surface) = (position.clone(), surface.clone());
            listeners.push(EventListener::new(window, kind, true, move |event| {
                let client = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|event| first_touch_client(&event.touches()));
                if let Some(client) = client {
                    position.set(Some(surface.to_local(client)));
                }
            })?);
        }
        Ok(Self {
            position,
            listeners,
        })
    }
}

impl PointerTracker for DomPointer {
    fn position(&self) -> Option<Point> {
        self.position.get()
    }

    fn dispose(&mut self) {
        for mut listener in self.listeners.drain(..) {
            listener.remove();
        }
    }
}

/// Two-finger tracking over the surface's touch events.
///
/// The surface listeners feed [`TouchPinch::fingers_mut`] and forward the
/// resulting notes to the controller.
#[derive(Default)]
pub(crate) struct TouchPinch {
    fingers: FingerPair,
}

impl TouchPinch {
    pub(crate) fn fingers_mut(&mut self) -> &mut FingerPair {
        &mut self.fingers
    }
}

impl PinchTracker for TouchPinch {
    fn fingers(&self) -> Option<[Point; 2]> {
        self.fingers.positions()
    }

    fn is_pinching(&self) -> bool {
        self.fingers.is_pinching()
    }

    fn disable(&mut self) {
        self.fingers.disable();
    }
}

/// `requestAnimationFrame`-backed frame scheduler.
///
/// One long-lived closure serves every request; at most one frame is
/// outstanding at a time.
pub(crate) struct RafScheduler {
    window: Window,
    next: u64,
    pending: Rc<Cell<Option<(FrameHandle, i32)>>>,
    callback: Closure<dyn FnMut()>,
}

impl RafScheduler {
    /// Creates a scheduler that calls `on_frame` with the handle of each
    /// frame as it fires.
    pub(crate) fn new(window: Window, mut on_frame: impl FnMut(FrameHandle) + 'static) -> Self {
        let pending: Rc<Cell<Option<(FrameHandle, i32)>>> = Rc::new(Cell::new(None));
        let slot = pending.clone();
        let callback = Closure::wrap(Box::new(move || {
            if let Some((handle, _)) = slot.take() {
                on_frame(handle);
            }
        }) as Box<dyn FnMut()>);
        Self {
            window,
            next: 0,
            pending,
            callback,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => self.pending.set(Some((handle, id))),
            Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        match self.pending.get() {
            Some((pending, id)) if pending == handle => {
                self.pending.set(None);
                // Cancelling an already-fired frame is harmless.
                let _ = self.window.cancel_animation_frame(id);
            }
            _ => {}
        }
    }
}

/// Collaborator types for the DOM.
pub(crate) struct WebBackend;

impl Backend for WebBackend {
    type Surface = ElementSurface;
    type Pointer = DomPointer;
    type Inertia = Inertia;
    type Pinch = TouchPinch;
    type Frames = RafScheduler;
    type Listener = EventListener;
}
