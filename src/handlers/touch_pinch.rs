//! Two-finger pinch from touch events.
//!
//! Hooked on `touchstart` for platforms that deliver multi-touch as touch
//! events. While a pinch is active the window-level move/end/cancel listeners
//! are attached; they are removed on every stop path.

use super::pinch::{self, PinchStep};
use super::{Env, GestureStop, Outcome, StopOptions};
use crate::host::Listener;
use crate::model::{PointerInput, TouchInput};

const LISTENERS: [Listener; 3] = [Listener::TouchMove, Listener::TouchEnd, Listener::TouchCancel];

#[derive(Debug, Default)]
pub struct TouchPinch {
    attached: bool,
}

impl TouchPinch {
    pub fn start(
        &mut self,
        env: &mut Env<'_>,
        ev: &TouchInput,
        drag: &mut dyn GestureStop,
    ) -> PinchStep {
        if !env.ctx.enabled() || !ev.target.is_interactive() {
            return PinchStep::Ignored;
        }
        if env.ctx.two_finger_pan() && ev.len() < 2 {
            return PinchStep::Ignored;
        }
        if env.ctx.pinching() || ev.len() != 2 {
            return self.end(env, ev);
        }
        let (a, b) = (ev.touches[0].position, ev.touches[1].position);
        match pinch::begin(env, a, b, ev.time_stamp, drag) {
            Outcome::Consumed => {
                env.listen_all(&LISTENERS);
                self.attached = true;
                PinchStep::Consumed
            }
            Outcome::Ignored => PinchStep::Ignored,
        }
    }

    pub fn on_move(&mut self, env: &mut Env<'_>, ev: &TouchInput) -> Outcome {
        if !self.attached || ev.len() < 2 {
            return Outcome::Ignored;
        }
        pinch::update(env, ev.touches[0].position, ev.touches[1].position)
    }

    /// Touch end or cancel; `ev.touches` holds the contacts still down.
    /// A pinch owned by the pointer path is left alone.
    pub fn end(&mut self, env: &mut Env<'_>, ev: &TouchInput) -> PinchStep {
        if !self.attached || !env.ctx.pinching() {
            return PinchStep::Ignored;
        }
        self.detach(env);
        let remaining = match ev.touches.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        pinch::end(
            env,
            ev.time_stamp,
            remaining.map(|t| t.position),
            StopOptions::default(),
        );
        match remaining {
            Some(t) => PinchStep::Resume(PointerInput::touch(
                t.id,
                t.position.x,
                t.position.y,
                ev.time_stamp,
            )),
            None => PinchStep::Consumed,
        }
    }

    fn detach(&mut self, env: &mut Env<'_>) {
        if std::mem::take(&mut self.attached) {
            env.unlisten_all(&LISTENERS);
        }
    }
}

impl GestureStop for TouchPinch {
    fn stop(&mut self, env: &mut Env<'_>, time_stamp: Option<f64>, opts: StopOptions) {
        if !self.attached {
            return;
        }
        self.detach(env);
        let time_stamp = time_stamp.unwrap_or(env.ctx.vars.pinch.started_at);
        pinch::end(env, time_stamp, None, opts);
    }

    fn active(&self, env: &Env<'_>) -> bool {
        self.attached && env.ctx.pinching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::handlers::Drag;
    use crate::model::{ImageRef, Point};
    use crate::testing::{EngineCall, Harness};

    fn pinch_at(h: &mut Harness, t: f64) -> PinchStep {
        TouchPinch::default().start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], t),
            &mut Drag,
        )
    }

    #[test]
    fn two_touches_start_a_pinch() {
        let mut h = Harness::default();
        let mut tp = TouchPinch::default();
        let step = tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], 0.0),
            &mut Drag,
        );
        assert_eq!(step, PinchStep::Consumed);
        assert!(h.ctx.pinching());
        for l in LISTENERS {
            assert!(h.host.listening(l));
        }
        assert_eq!(h.host.emitted_names(), vec!["pinchstart"]);
    }

    #[test]
    fn single_touch_is_not_a_pinch() {
        let mut h = Harness::default();
        let step = TouchPinch::default().start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0)], 0.0),
            &mut Drag,
        );
        assert_eq!(step, PinchStep::Ignored);
        assert!(!h.ctx.pinching());
        assert!(h.host.listeners.is_empty());
    }

    #[test]
    fn third_touch_stops_the_pinch() {
        let mut h = Harness::default();
        let mut tp = TouchPinch::default();
        tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], 0.0),
            &mut Drag,
        );
        let step = tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0), (300.0, 300.0)], 10.0),
            &mut Drag,
        );
        assert_eq!(step, PinchStep::Consumed);
        assert!(!h.ctx.pinching());
        assert!(h.host.listeners.is_empty());
        assert!(h.host.unbalanced.is_empty());
        assert_eq!(h.host.emitted_names(), vec!["pinchstart", "pinchend"]);
    }

    #[test]
    fn move_forwards_both_points() {
        let mut h = Harness::default();
        let mut tp = TouchPinch::default();
        tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], 0.0),
            &mut Drag,
        );
        let out = tp.on_move(
            &mut h.env(),
            &TouchInput::new(&[(90.0, 100.0), (210.0, 100.0)], 16.0),
        );
        assert_eq!(out, Outcome::Consumed);
        assert!((h.ctx.vars.pinch.factor - 1.2).abs() < 1e-9);
        assert_eq!(
            h.engine.lifecycle().last(),
            Some(&EngineCall::PinchUpdate(
                ImageRef(1),
                Point::new(90.0, 100.0),
                Point::new(210.0, 100.0)
            ))
        );
        let out = tp.on_move(&mut h.env(), &TouchInput::new(&[(90.0, 100.0)], 20.0));
        assert_eq!(out, Outcome::Ignored);
    }

    #[test]
    fn lifting_one_finger_resumes_with_the_other() {
        let mut h = Harness::default();
        let mut tp = TouchPinch::default();
        tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], 0.0),
            &mut Drag,
        );
        let step = tp.end(&mut h.env(), &TouchInput::new(&[(120.0, 110.0)], 500.0));
        let PinchStep::Resume(ev) = step else {
            panic!("expected a resume, got {step:?}");
        };
        assert_eq!(ev.position, Point::new(120.0, 110.0));
        assert_eq!(ev.time_stamp, 500.0);
        assert!(
            h.engine
                .calls
                .contains(&EngineCall::PinchStop(ImageRef(1), 500.0))
        );
        assert!(h.host.listeners.is_empty());
    }

    #[test]
    fn forced_stop_is_idempotent() {
        let mut h = Harness::default();
        let mut tp = TouchPinch::default();
        tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0), (200.0, 100.0)], 0.0),
            &mut Drag,
        );
        tp.stop(&mut h.env(), Some(30.0), StopOptions::default());
        tp.stop(&mut h.env(), Some(40.0), StopOptions::default());
        assert!(!h.ctx.pinching());
        assert!(h.host.unbalanced.is_empty());
        assert_eq!(h.host.emitted_names(), vec!["pinchstart", "pinchend"]);
    }

    #[test]
    fn two_finger_mode_ignores_single_touch_without_stopping() {
        let mut h = Harness::new(InputConfig {
            two_finger_pan: true,
            ..InputConfig::default()
        });
        pinch_at(&mut h, 0.0);
        let mut tp = TouchPinch::default();
        let step = tp.start(
            &mut h.env(),
            &TouchInput::new(&[(100.0, 100.0)], 10.0),
            &mut Drag,
        );
        assert_eq!(step, PinchStep::Ignored);
        assert!(h.ctx.pinching());
    }
}
