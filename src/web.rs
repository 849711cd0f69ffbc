//! Browser implementation of [`Host`] on top of `web-sys`.
//!
//! Each [`Listener`] gets one `Closure` the first time it is attached. The
//! closure is kept for the host's lifetime and only its DOM registration comes
//! and goes, so a listener may detach itself from inside its own callback.
//! Native events are converted to the synthetic records in [`crate::model`]
//! and fed to the installed [`Sink`]; a consumed outcome calls
//! `preventDefault` and `stopPropagation`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, CustomEvent, CustomEventInit, DomRect, Element, Event, EventTarget,
    HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent, TouchEvent,
    WheelEvent, Window,
};

use crate::config::{ATTRIBUTES, ConfigError, InputConfig, Platform};
use crate::handlers::Outcome;
use crate::host::{Host, Listener, Timer, TimerId};
use crate::model::{
    GestureInput, KeyInput, Modifiers, NativeEvent, Point, PointerId, PointerInput, PointerKind,
    TargetKind, TouchInput, TouchPoint, ViewerEvent, WheelInput,
};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(format!("{value:?}"))
    }
}

/// Where converted events and fired timers go, usually an `InputSystem`.
#[derive(Clone)]
pub struct Sink {
    pub event: Rc<dyn Fn(NativeEvent) -> Outcome>,
    pub timer: Rc<dyn Fn(Timer)>,
}

/// Shared slot for the [`Sink`]; set once the system owning the host exists.
#[derive(Clone, Default)]
pub struct SinkSlot(Rc<RefCell<Option<Sink>>>);

impl SinkSlot {
    pub fn set(&self, sink: Sink) {
        *self.0.borrow_mut() = Some(sink);
    }

    pub fn clear(&self) {
        self.0.borrow_mut().take();
    }

    fn get(&self) -> Option<Sink> {
        self.0.borrow().clone()
    }
}

type EventClosure = Closure<dyn FnMut(Event)>;

pub struct WebHost {
    window: Window,
    element: HtmlElement,
    sink: SinkSlot,
    closures: HashMap<Listener, EventClosure>,
    attached: HashSet<Listener>,
    timer_closures: HashMap<Timer, Closure<dyn FnMut()>>,
    on_emit: Option<Rc<dyn Fn(&ViewerEvent)>>,
}

impl WebHost {
    pub fn new(element: HtmlElement) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        Ok(Self {
            window,
            element,
            sink: SinkSlot::default(),
            closures: HashMap::new(),
            attached: HashSet::new(),
            timer_closures: HashMap::new(),
            on_emit: None,
        })
    }

    pub fn sink_slot(&self) -> SinkSlot {
        self.sink.clone()
    }

    /// Observe every emitted notification in addition to the DOM event.
    pub fn set_on_emit(&mut self, f: impl Fn(&ViewerEvent) + 'static) {
        self.on_emit = Some(Rc::new(f));
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn target_for(&self, listener: Listener) -> &EventTarget {
        if listener.on_window() {
            self.window.as_ref()
        } else {
            self.element.as_ref()
        }
    }

    fn make_closure(&self, listener: Listener) -> EventClosure {
        let sink = self.sink.clone();
        let element = self.element.clone();
        Closure::wrap(Box::new(move |event: Event| {
            let Some(native) = to_native(listener, &event, &element) else {
                return;
            };
            let Some(sink) = sink.get() else {
                return;
            };
            if (sink.event)(native).consumed() {
                event.prevent_default();
                event.stop_propagation();
            }
        }) as Box<dyn FnMut(Event)>)
    }

    fn dispatch_custom(&self, event: &ViewerEvent) -> Result<(), WebError> {
        let detail = js_sys::JSON::parse(&serde_json::to_string(event)?)?;
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        init.set_bubbles(true);
        let custom = CustomEvent::new_with_event_init_dict(event.name(), &init)?;
        self.element.dispatch_event(&custom)?;
        Ok(())
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        for listener in self.attached.clone() {
            self.unlisten(listener);
        }
    }
}

/// DOM event types behind a listener.
pub fn dom_events(listener: Listener) -> &'static [&'static str] {
    match listener {
        Listener::PointerUp => &["pointerup", "pointercancel"],
        Listener::PointerDown => &["pointerdown"],
        Listener::PointerUpElement => &["pointerup", "pointercancel"],
        Listener::PointerMove => &["pointermove"],
        Listener::TouchStart => &["touchstart"],
        Listener::TouchMove => &["touchmove"],
        Listener::TouchEnd => &["touchend"],
        Listener::TouchCancel => &["touchcancel"],
        Listener::Wheel => &["wheel"],
        Listener::GestureStart => &["gesturestart"],
        Listener::GestureChange => &["gesturechange"],
        Listener::GestureEnd => &["gestureend"],
        Listener::KeyDown => &["keydown"],
        Listener::DoubleClick => &["dblclick"],
    }
}

impl Host for WebHost {
    fn listen(&mut self, listener: Listener) {
        if !self.attached.insert(listener) {
            return;
        }
        if !self.closures.contains_key(&listener) {
            let closure = self.make_closure(listener);
            self.closures.insert(listener, closure);
        }
        let Some(closure) = self.closures.get(&listener) else {
            return;
        };
        // Non-passive so wheel and touch handlers may cancel page scrolling.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let target = self.target_for(listener);
        for name in dom_events(listener) {
            if let Err(err) = target.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            ) {
                log::warn!("listen {name}: {:?}", WebError::from(err));
            }
        }
    }

    fn unlisten(&mut self, listener: Listener) {
        if !self.attached.remove(&listener) {
            return;
        }
        let Some(closure) = self.closures.get(&listener) else {
            return;
        };
        let target = self.target_for(listener);
        for name in dom_events(listener) {
            if let Err(err) =
                target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::warn!("unlisten {name}: {:?}", WebError::from(err));
            }
        }
    }

    fn capture_pointer(&mut self, id: PointerId) {
        if let Err(err) = self.element.set_pointer_capture(id) {
            log::warn!("pointer capture {id}: {:?}", WebError::from(err));
        }
    }

    fn release_pointer(&mut self, id: PointerId) {
        if let Err(err) = self.element.release_pointer_capture(id) {
            log::warn!("pointer release {id}: {:?}", WebError::from(err));
        }
    }

    fn emit(&mut self, event: ViewerEvent) {
        if let Some(f) = &self.on_emit {
            f(&event);
        }
        if let Err(err) = self.dispatch_custom(&event) {
            log::warn!("emit {}: {err}", event.name());
        }
    }

    fn set_timeout(&mut self, timer: Timer, delay_ms: u32) -> TimerId {
        let sink = self.sink.clone();
        let closure = self.timer_closures.entry(timer).or_insert_with(move || {
            Closure::wrap(Box::new(move || {
                if let Some(sink) = sink.get() {
                    (sink.timer)(timer);
                }
            }) as Box<dyn FnMut()>)
        });
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .unwrap_or_else(|err| {
                log::warn!("setTimeout: {:?}", WebError::from(err));
                0
            });
        TimerId(handle as u32)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0 as i32);
    }
}

/// Platform traits of the running browser.
pub fn detect_platform(window: &Window) -> Platform {
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let has_gesture_events =
        js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("GestureEvent")).unwrap_or(false);
    Platform::detect(&user_agent, has_gesture_events)
}

/// Read the `data-*` configuration attributes of `element`.
pub fn config_from_element(element: &Element) -> Result<InputConfig, ConfigError> {
    let pairs: Vec<(&str, String)> = ATTRIBUTES
        .iter()
        .filter_map(|name| element.get_attribute(name).map(|v| (*name, v)))
        .collect();
    InputConfig::from_attributes(pairs.iter().map(|(n, v)| (*n, v.as_str())))
}

fn to_native(listener: Listener, event: &Event, element: &HtmlElement) -> Option<NativeEvent> {
    let origin = element.get_bounding_client_rect();
    let local = |x: i32, y: i32| Point::new(x as f64 - origin.left(), y as f64 - origin.top());
    let native = match listener {
        Listener::PointerDown => NativeEvent::PointerDown(pointer_input(event, &local)?),
        Listener::PointerMove => NativeEvent::PointerMove(pointer_input(event, &local)?),
        Listener::PointerUp | Listener::PointerUpElement => {
            let input = pointer_input(event, &local)?;
            if event.type_() == "pointercancel" {
                NativeEvent::PointerCancel(input)
            } else {
                NativeEvent::PointerUp(input)
            }
        }
        Listener::TouchStart => NativeEvent::TouchStart(touch_input(event, &local)?),
        Listener::TouchMove => NativeEvent::TouchMove(touch_input(event, &local)?),
        Listener::TouchEnd | Listener::TouchCancel => {
            NativeEvent::TouchEnd(touch_input(event, &local)?)
        }
        Listener::Wheel => {
            let ev = event.dyn_ref::<WheelEvent>()?;
            NativeEvent::Wheel(WheelInput {
                delta_x: ev.delta_x(),
                delta_y: ev.delta_y(),
                position: local(ev.client_x(), ev.client_y()),
                modifiers: mouse_modifiers(ev),
                time_stamp: event.time_stamp(),
            })
        }
        Listener::GestureStart => NativeEvent::GestureStart(gesture_input(event, &origin)),
        Listener::GestureChange => NativeEvent::GestureChange(gesture_input(event, &origin)),
        Listener::GestureEnd => NativeEvent::GestureEnd(gesture_input(event, &origin)),
        Listener::KeyDown => {
            let ev = event.dyn_ref::<KeyboardEvent>()?;
            NativeEvent::KeyDown(KeyInput {
                key: ev.key(),
                modifiers: Modifiers {
                    ctrl: ev.ctrl_key(),
                    meta: ev.meta_key(),
                    shift: ev.shift_key(),
                    alt: ev.alt_key(),
                },
            })
        }
        Listener::DoubleClick => {
            let ev = event.dyn_ref::<MouseEvent>()?;
            NativeEvent::DoubleClick(PointerInput {
                button: ev.button(),
                position: local(ev.client_x(), ev.client_y()),
                modifiers: mouse_modifiers(ev),
                target: target_kind(event),
                ..PointerInput::mouse(0.0, 0.0, event.time_stamp())
            })
        }
    };
    Some(native)
}

fn pointer_input(event: &Event, local: &dyn Fn(i32, i32) -> Point) -> Option<PointerInput> {
    let ev = event.dyn_ref::<PointerEvent>()?;
    Some(PointerInput {
        pointer_id: ev.pointer_id(),
        kind: PointerKind::from_dom(&ev.pointer_type()),
        button: ev.button(),
        is_primary: ev.is_primary(),
        position: local(ev.client_x(), ev.client_y()),
        modifiers: mouse_modifiers(ev),
        target: target_kind(event),
        time_stamp: event.time_stamp(),
    })
}

fn touch_input(event: &Event, local: &dyn Fn(i32, i32) -> Point) -> Option<TouchInput> {
    let ev = event.dyn_ref::<TouchEvent>()?;
    let list = ev.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            id: t.identifier(),
            position: local(t.client_x(), t.client_y()),
        })
        .collect();
    Some(TouchInput {
        touches,
        target: target_kind(event),
        time_stamp: event.time_stamp(),
    })
}

/// `GestureEvent` has no `web-sys` binding; read its fields reflectively.
fn gesture_input(event: &Event, origin: &DomRect) -> GestureInput {
    let field = |name: &str, default: f64| {
        js_sys::Reflect::get(event.as_ref(), &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    };
    GestureInput {
        scale: field("scale", 1.0),
        position: Point::new(
            field("clientX", 0.0) - origin.left(),
            field("clientY", 0.0) - origin.top(),
        ),
        time_stamp: event.time_stamp(),
    }
}

fn mouse_modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers {
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
    }
}

fn target_kind(event: &Event) -> TargetKind {
    let Some(target) = event.target() else {
        return TargetKind::Other;
    };
    if target.dyn_ref::<HtmlCanvasElement>().is_some() {
        return TargetKind::Canvas;
    }
    match target.dyn_ref::<Element>().map(|el| el.closest("[data-scroll-through]")) {
        Some(Ok(Some(_))) => TargetKind::ScrollThrough,
        _ => TargetKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_up_listeners_also_cover_cancel() {
        assert_eq!(dom_events(Listener::PointerUp), &["pointerup", "pointercancel"]);
        assert_eq!(
            dom_events(Listener::PointerUpElement),
            &["pointerup", "pointercancel"]
        );
    }

    #[test]
    fn every_listener_maps_to_its_event_name() {
        let all = [
            Listener::PointerDown,
            Listener::PointerUpElement,
            Listener::PointerMove,
            Listener::PointerUp,
            Listener::TouchStart,
            Listener::TouchMove,
            Listener::TouchEnd,
            Listener::TouchCancel,
            Listener::Wheel,
            Listener::GestureStart,
            Listener::GestureChange,
            Listener::GestureEnd,
            Listener::KeyDown,
            Listener::DoubleClick,
        ];
        for l in all {
            assert_eq!(dom_events(l)[0], l.event_name());
        }
    }
}
