//! Two-finger pinch assembled from pointer events, for browsers that report
//! every contact as a pointer and never send touch events.

use super::pinch::{self, PinchStep};
use super::{Env, GestureStop, Outcome, StopOptions};
use crate::host::Listener;
use crate::model::{PointerInput, PointerKind};

const LISTENERS: [Listener; 2] = [Listener::PointerMove, Listener::PointerUp];

/// Contacts beyond this are not tracked.
const MAX_POINTERS: usize = 2;

#[derive(Debug, Default)]
pub struct PointerPinch {
    attached: bool,
}

impl PointerPinch {
    /// Track a touch/pen contact; the second one starts a pinch.
    pub fn down(
        &mut self,
        env: &mut Env<'_>,
        ev: &PointerInput,
        drag: &mut dyn GestureStop,
    ) -> PinchStep {
        if !env.ctx.enabled() || ev.kind == PointerKind::Mouse || !ev.target.is_interactive() {
            return PinchStep::Ignored;
        }
        let pointers = &mut env.ctx.vars.pinch.pointers;
        match pointers.iter().position(|(id, _)| *id == ev.pointer_id) {
            Some(i) => pointers[i].1 = ev.position,
            None if pointers.len() < MAX_POINTERS => pointers.push((ev.pointer_id, ev.position)),
            None => return PinchStep::Ignored,
        }
        if env.ctx.pinching() || env.ctx.vars.pinch.pointers.len() < MAX_POINTERS {
            return PinchStep::Ignored;
        }

        let (a, b) = (env.ctx.vars.pinch.pointers[0].1, env.ctx.vars.pinch.pointers[1].1);
        match pinch::begin(env, a, b, ev.time_stamp, drag) {
            Outcome::Consumed => {
                env.listen_all(&LISTENERS);
                self.attached = true;
                PinchStep::Consumed
            }
            Outcome::Ignored => PinchStep::Ignored,
        }
    }

    pub fn on_move(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> Outcome {
        let pointers = &mut env.ctx.vars.pinch.pointers;
        let Some(p) = pointers.iter_mut().find(|(id, _)| *id == ev.pointer_id) else {
            return Outcome::Ignored;
        };
        p.1 = ev.position;
        if !self.attached || pointers.len() < MAX_POINTERS {
            return Outcome::Ignored;
        }
        let (a, b) = (pointers[0].1, pointers[1].1);
        pinch::update(env, a, b)
    }

    /// Pointer up or cancel.
    pub fn up(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> PinchStep {
        let pointers = &mut env.ctx.vars.pinch.pointers;
        let before = pointers.len();
        pointers.retain(|(id, _)| *id != ev.pointer_id);
        if pointers.len() == before || !self.attached {
            return PinchStep::Ignored;
        }
        let remaining = env.ctx.vars.pinch.pointers.first().copied();

        self.detach(env);
        pinch::end(
            env,
            ev.time_stamp,
            remaining.map(|(_, p)| p),
            StopOptions::default(),
        );
        match remaining {
            Some((pointer_id, position)) => PinchStep::Resume(PointerInput {
                pointer_id,
                position,
                is_primary: false,
                ..ev.clone()
            }),
            None => PinchStep::Consumed,
        }
    }

    fn detach(&mut self, env: &mut Env<'_>) {
        if std::mem::take(&mut self.attached) {
            env.unlisten_all(&LISTENERS);
        }
    }
}

impl GestureStop for PointerPinch {
    fn stop(&mut self, env: &mut Env<'_>, time_stamp: Option<f64>, opts: StopOptions) {
        env.ctx.vars.pinch.pointers.clear();
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
