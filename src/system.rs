//! The coordinator: owns the context and collaborators of one viewer element,
//! hooks handlers from configuration and routes native events to them.
//!
//! Handlers never see each other. Where one must end another's gesture the
//! coordinator passes the peer in as a [`GestureStop`]; where a pinch ends
//! with one contact left it re-issues a forced drag start itself.

use crate::config::InputConfig;
use crate::handlers::pinch::PinchStep;
use crate::handlers::{
    DoubleTap, Drag, Env, GestureStop, Keyboard, Outcome, PointerPinch, StopOptions, TouchPinch,
    Trackpad, Updates, Wheel,
};
use crate::host::{Engine, Host, Listener, Stage, Timer};
use crate::model::{GestureInput, KeyInput, NativeEvent, PointerInput, TouchInput, WheelInput};
use crate::state::EventContext;

/// Element-level listeners `hook` attaches for `config`.
pub fn element_listeners(config: &InputConfig) -> Vec<Listener> {
    let mut listeners = vec![Listener::PointerDown];
    if config.needs_element_pointer_up() {
        listeners.push(Listener::PointerUpElement);
    }
    if config.uses_touch_pinch() {
        listeners.push(Listener::TouchStart);
    }
    listeners.push(Listener::Wheel);
    if config.platform.native_gestures {
        listeners.extend([
            Listener::GestureStart,
            Listener::GestureChange,
            Listener::GestureEnd,
        ]);
    }
    if config.double_tap {
        listeners.push(Listener::DoubleClick);
    }
    if config.keyboard {
        listeners.push(Listener::KeyDown);
    }
    listeners
}

#[derive(Debug, Default)]
struct Handlers {
    drag: Drag,
    touch_pinch: TouchPinch,
    pointer_pinch: PointerPinch,
    trackpad: Trackpad,
    wheel: Wheel,
    keyboard: Keyboard,
    dbltap: DoubleTap,
}

/// Both pinch sources behind one stop capability; only the attached one acts.
struct AnyPinch<'a> {
    touch: &'a mut TouchPinch,
    pointer: &'a mut PointerPinch,
}

impl GestureStop for AnyPinch<'_> {
    fn stop(&mut self, env: &mut Env<'_>, time_stamp: Option<f64>, opts: StopOptions) {
        self.touch.stop(env, time_stamp, opts);
        self.pointer.stop(env, time_stamp, opts);
    }

    fn active(&self, env: &Env<'_>) -> bool {
        self.touch.active(env) || self.pointer.active(env)
    }
}

pub struct InputSystem<S: Stage, E: Engine, H: Host> {
    ctx: EventContext,
    stage: S,
    engine: E,
    host: H,
    handlers: Handlers,
    hooked: Vec<Listener>,
}

impl<S: Stage, E: Engine, H: Host> InputSystem<S, E, H> {
    pub fn new(config: InputConfig, stage: S, engine: E, host: H) -> Self {
        Self {
            ctx: EventContext::new(config),
            stage,
            engine,
            host,
            handlers: Handlers::default(),
            hooked: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &EventContext {
        &self.ctx
    }

    pub fn config(&self) -> &InputConfig {
        self.ctx.config()
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_hooked(&self) -> bool {
        !self.hooked.is_empty()
    }

    /// Element-level listeners currently attached.
    pub fn hooked(&self) -> &[Listener] {
        &self.hooked
    }

    fn split(&mut self) -> (Env<'_>, &mut Handlers) {
        (
            Env {
                ctx: &mut self.ctx,
                stage: &mut self.stage,
                engine: &mut self.engine,
                host: &mut self.host,
            },
            &mut self.handlers,
        )
    }

    /// Attach the element-level listeners for the current configuration.
    /// Calling it again while hooked does nothing.
    pub fn hook(&mut self) {
        if self.is_hooked() {
            return;
        }
        self.hooked = element_listeners(self.ctx.config());
        for &l in &self.hooked {
            self.host.listen(l);
        }
        log::debug!("hooked {} listeners", self.hooked.len());
    }

    /// Stop every active gesture and detach exactly what `hook` attached.
    pub fn unhook(&mut self) {
        self.stop_all(None);
        let (mut env, h) = self.split();
        h.wheel.cancel(&mut env);
        h.dbltap.cancel(&mut env);
        Updates::cancel(&mut env);
        for l in std::mem::take(&mut self.hooked) {
            self.host.unlisten(l);
        }
        log::debug!("unhooked");
    }

    /// Swap the configuration, re-hooking if the system was hooked.
    pub fn reconfigure(&mut self, config: InputConfig) {
        let was_hooked = self.is_hooked();
        self.unhook();
        self.ctx.set_config(config);
        if was_hooked {
            self.hook();
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.stop_all(None);
        }
        self.ctx.set_enabled(enabled);
    }

    /// Force-stop pan and pinch with their normal end notifications.
    fn stop_all(&mut self, time_stamp: Option<f64>) {
        let (mut env, h) = self.split();
        let mut pinch = AnyPinch {
            touch: &mut h.touch_pinch,
            pointer: &mut h.pointer_pinch,
        };
        pinch.stop(&mut env, time_stamp, StopOptions::default());
        h.drag.stop(&mut env, time_stamp, StopOptions::default());
    }

    pub fn dispatch(&mut self, event: NativeEvent) -> Outcome {
        let outcome = match &event {
            NativeEvent::PointerDown(ev) => self.on_pointer_down(ev),
            NativeEvent::PointerMove(ev) => self.on_pointer_move(ev),
            NativeEvent::PointerUp(ev) => self.on_pointer_up(ev),
            NativeEvent::PointerCancel(ev) => self.on_pointer_cancel(ev),
            NativeEvent::TouchStart(ev) => self.on_touch_start(ev),
            NativeEvent::TouchMove(ev) => self.on_touch_move(ev),
            NativeEvent::TouchEnd(ev) => self.on_touch_end(ev),
            NativeEvent::Wheel(ev) => self.on_wheel(ev),
            NativeEvent::GestureStart(ev) => self.on_gesture_start(ev),
            NativeEvent::GestureChange(ev) => self.on_gesture_change(ev),
            NativeEvent::GestureEnd(ev) => self.on_gesture_end(ev),
            NativeEvent::KeyDown(ev) => self.on_key_down(ev),
            NativeEvent::DoubleClick(ev) => self.on_double_click(ev),
        };
        debug_assert!(
            !(self.ctx.panning() && self.ctx.pinching()),
            "panning and pinching after {event:?}"
        );
        outcome
    }

    pub fn on_pointer_down(&mut self, ev: &PointerInput) -> Outcome {
        let double_tap = self.ctx.config().double_tap;
        let pointer_pinch = self.ctx.config().pointer_pinch;
        let (mut env, h) = self.split();
        if double_tap {
            h.dbltap.on_pointer_down(&mut env, ev);
        }
        if pointer_pinch {
            let step = h.pointer_pinch.down(&mut env, ev, &mut h.drag);
            if step != PinchStep::Ignored {
                return step.outcome();
            }
        }
        let mut pinch = AnyPinch {
            touch: &mut h.touch_pinch,
            pointer: &mut h.pointer_pinch,
        };
        h.drag.start(&mut env, ev, &mut pinch, false)
    }

    pub fn on_pointer_move(&mut self, ev: &PointerInput) -> Outcome {
        let pointer_pinch = self.ctx.config().pointer_pinch;
        let (mut env, h) = self.split();
        if pointer_pinch && h.pointer_pinch.on_move(&mut env, ev).consumed() {
            return Outcome::Consumed;
        }
        h.drag.on_move(&mut env, ev)
    }

    pub fn on_pointer_up(&mut self, ev: &PointerInput) -> Outcome {
        let tap = if self.ctx.config().double_tap {
            let (mut env, h) = self.split();
            h.dbltap.on_pointer_up(&mut env, ev)
        } else {
            Outcome::Ignored
        };
        tap.or(self.release_pointer(ev))
    }

    pub fn on_pointer_cancel(&mut self, ev: &PointerInput) -> Outcome {
        self.ctx.vars.dbltap.down = None;
        self.release_pointer(ev)
    }

    fn release_pointer(&mut self, ev: &PointerInput) -> Outcome {
        if self.ctx.config().pointer_pinch {
            let (mut env, h) = self.split();
            match h.pointer_pinch.up(&mut env, ev) {
                PinchStep::Ignored => {}
                PinchStep::Consumed => return Outcome::Consumed,
                PinchStep::Resume(rest) => return self.resume_drag(&rest),
            }
        }
        let was_panning = self.ctx.panning();
        let (mut env, h) = self.split();
        h.drag.end(&mut env, ev);
        if was_panning && !self.ctx.panning() {
            Outcome::Consumed
        } else {
            Outcome::Ignored
        }
    }

    pub fn on_touch_start(&mut self, ev: &TouchInput) -> Outcome {
        if !self.ctx.config().uses_touch_pinch() {
            return Outcome::Ignored;
        }
        let (mut env, h) = self.split();
        let step = h.touch_pinch.start(&mut env, ev, &mut h.drag);
        self.after_pinch_step(step)
    }

    pub fn on_touch_move(&mut self, ev: &TouchInput) -> Outcome {
        let (mut env, h) = self.split();
        h.touch_pinch.on_move(&mut env, ev)
    }

    /// Touch end or cancel.
    pub fn on_touch_end(&mut self, ev: &TouchInput) -> Outcome {
        let (mut env, h) = self.split();
        let step = h.touch_pinch.end(&mut env, ev);
        self.after_pinch_step(step)
    }

    fn after_pinch_step(&mut self, step: PinchStep) -> Outcome {
        match step {
            PinchStep::Resume(rest) => self.resume_drag(&rest),
            other => other.outcome(),
        }
    }

    /// Continue panning with the contact left over from a pinch.
    fn resume_drag(&mut self, ev: &PointerInput) -> Outcome {
        log::debug!("resuming pan with pointer {}", ev.pointer_id);
        let (mut env, h) = self.split();
        let mut pinch = AnyPinch {
            touch: &mut h.touch_pinch,
            pointer: &mut h.pointer_pinch,
        };
        if !h.drag.start(&mut env, ev, &mut pinch, true).consumed() && !env.ctx.panning() {
            // Nothing under the remaining contact; finish the session the pinch inherited.
            Drag::close_session(&mut env, Some(ev.position), ev.time_stamp);
        }
        Outcome::Consumed
    }

    pub fn on_wheel(&mut self, ev: &WheelInput) -> Outcome {
        let (mut env, h) = self.split();
        h.wheel.on_wheel(&mut env, ev)
    }

    pub fn on_gesture_start(&mut self, ev: &GestureInput) -> Outcome {
        let (mut env, h) = self.split();
        h.trackpad.start(&mut env, ev)
    }

    pub fn on_gesture_change(&mut self, ev: &GestureInput) -> Outcome {
        let (mut env, h) = self.split();
        h.trackpad.change(&mut env, ev)
    }

    pub fn on_gesture_end(&mut self, ev: &GestureInput) -> Outcome {
        let (mut env, h) = self.split();
        h.trackpad.end(&mut env, ev)
    }

    pub fn on_key_down(&mut self, ev: &KeyInput) -> Outcome {
        if !self.ctx.config().keyboard {
            return Outcome::Ignored;
        }
        let (mut env, h) = self.split();
        h.keyboard.on_key_down(&mut env, ev)
    }

    pub fn on_double_click(&mut self, ev: &PointerInput) -> Outcome {
        if !self.ctx.config().double_tap {
            return Outcome::Ignored;
        }
        let (mut env, h) = self.split();
        h.dbltap.on_double_click(&mut env, ev)
    }

    /// Host timer callback for a timer scheduled through [`Host::set_timeout`].
    pub fn on_timer(&mut self, timer: Timer) {
        let (mut env, h) = self.split();
        match timer {
            Timer::WheelEnd => h.wheel.on_timer(&mut env),
            Timer::DoubleTap => h.dbltap.on_timer(&mut env),
            Timer::Update => Updates::flush(&mut env),
        }
    }
}
