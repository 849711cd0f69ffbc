//! Single pointer panning (primary mouse button or one finger).
//!
//! ## Performance Notes
//!
//! Pointer move fires at display rate while dragging. The move path does one
//! hit-test and one camera call and returns early when no pan is active.

use super::{Env, GestureStop, Outcome, StopOptions, updates::Updates};
use crate::host::Listener;
use crate::model::{Point, PointerInput, PointerKind, ViewerEvent};
use crate::state::DragStart;
use crate::util::distance;

/// Travel from the start point before the pointer is captured. Capturing late
/// keeps plain clicks and double clicks from turning into drags.
pub const CAPTURE_THRESHOLD: f64 = 10.0;

const LISTENERS: [Listener; 2] = [Listener::PointerMove, Listener::PointerUp];

#[derive(Debug, Default)]
pub struct Drag;

impl Drag {
    /// Pointer down. `forced` is set when panning resumes after a pinch, which
    /// skips the button/target/two-finger checks.
    pub fn start(
        &mut self,
        env: &mut Env<'_>,
        ev: &PointerInput,
        pinch: &mut dyn GestureStop,
        forced: bool,
    ) -> Outcome {
        if !env.ctx.enabled() || env.ctx.panning() {
            return Outcome::Ignored;
        }
        if !forced {
            if ev.button != 0 || !ev.is_primary {
                return Outcome::Ignored;
            }
            if ev.kind == PointerKind::Touch && env.ctx.two_finger_pan() {
                return Outcome::Ignored;
            }
            if !ev.target.is_interactive() {
                return Outcome::Ignored;
            }
            if env.stage.omni_active() && ev.modifiers.any() {
                return Outcome::Ignored;
            }
        }
        if env.ctx.pinching() {
            // A pinch that never saw its end event; close it and drop this start.
            log::debug!("drag start while pinching, stopping pinch");
            pinch.stop(env, Some(ev.time_stamp), StopOptions::default());
            return Outcome::Ignored;
        }
        let Some(image) = env.image_at(ev.position) else {
            log::trace!("drag start missed every image at {:?}", ev.position);
            return Outcome::Ignored;
        };

        env.ctx.set_panning(true);
        let drag = &mut env.ctx.vars.drag;
        // A resumed pan reports against where its session began.
        if !drag.session_open || drag.start.is_none() {
            drag.start = Some(DragStart {
                position: ev.position,
                time_stamp: ev.time_stamp,
            });
        }
        drag.prev = Some(ev.position);
        drag.image = Some(image);
        // Touch contacts stay bound to their target without explicit capture.
        drag.pointer = if forced && ev.kind == PointerKind::Touch {
            None
        } else {
            Some(ev.pointer_id)
        };
        let open_session = !drag.session_open;
        drag.session_open = true;

        env.listen_all(&LISTENERS);
        env.engine.pan_start(image);
        env.engine.render();
        if open_session {
            env.host.emit(ViewerEvent::PanStart);
        }
        log::debug!("pan start {:?} at {:?}", image, ev.position);
        Outcome::Consumed
    }

    pub fn on_move(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> Outcome {
        if !env.ctx.panning() {
            return Outcome::Ignored;
        }
        let (Some(start), Some(prev)) = (env.ctx.vars.drag.start, env.ctx.vars.drag.prev) else {
            return Outcome::Ignored;
        };
        if env.ctx.captured().is_none()
            && distance(start.position, ev.position) >= CAPTURE_THRESHOLD
        {
            if let Some(id) = env.ctx.vars.drag.pointer {
                env.host.capture_pointer(id);
                env.ctx.set_captured(Some(id));
            }
        }

        // Delta against the previous move, not the start, so rounding cannot drift.
        let dx = prev.x - ev.position.x;
        let dy = prev.y - ev.position.y;
        env.ctx.vars.drag.prev = Some(ev.position);
        if let Some(image) = env.image_at(ev.position) {
            if let Some(camera) = env.camera(image) {
                camera.pan(dx, dy, None);
            }
        }
        Updates::request(env, "drag");
        Outcome::Consumed
    }

    /// Pointer up. Ups from a pointer other than the panning one are ignored.
    pub fn end(&mut self, env: &mut Env<'_>, ev: &PointerInput) {
        if env
            .ctx
            .vars
            .drag
            .pointer
            .is_some_and(|id| id != ev.pointer_id)
        {
            return;
        }
        self.finish(env, Some(ev), ev.time_stamp, StopOptions::default());
    }

    fn finish(
        &mut self,
        env: &mut Env<'_>,
        ev: Option<&PointerInput>,
        time_stamp: f64,
        opts: StopOptions,
    ) {
        if !env.ctx.panning() {
            return;
        }
        if let Some(id) = env.ctx.captured() {
            env.host.release_pointer(id);
            env.ctx.set_captured(None);
        }
        env.ctx.set_panning(false);
        let drag = &mut env.ctx.vars.drag;
        let last = ev.map(|e| e.position).or(drag.prev);
        drag.prev = None;
        drag.pointer = None;
        let image = drag.image.take();
        env.unlisten_all(&LISTENERS);

        if !opts.no_coast {
            if let Some(image) = image {
                env.engine.pan_stop(image);
            }
        }
        if !opts.no_emit {
            Self::close_session(env, last, time_stamp);
        }
        log::debug!("pan stop {:?} {:?}", image, opts);
    }

    /// Emit `panend` for an open pan session.
    pub fn close_session(env: &mut Env<'_>, last: Option<Point>, time_stamp: f64) {
        let drag = &mut env.ctx.vars.drag;
        if !drag.session_open {
            return;
        }
        drag.session_open = false;
        let (duration_ms, moved_x, moved_y) = match (drag.start.take(), last) {
            (Some(start), Some(last)) => (
                time_stamp - start.time_stamp,
                last.x - start.position.x,
                last.y - start.position.y,
            ),
            (Some(start), None) => (time_stamp - start.time_stamp, 0.0, 0.0),
            _ => (0.0, 0.0, 0.0),
        };
        env.host.emit(ViewerEvent::PanEnd {
            duration_ms,
            moved_x,
            moved_y,
        });
    }
}

impl GestureStop for Drag {
    fn stop(&mut self, env: &mut Env<'_>, time_stamp: Option<f64>, opts: StopOptions) {
        let time_stamp = time_stamp
            .or_else(|| env.ctx.vars.drag.start.map(|s| s.time_stamp))
            .unwrap_or(0.0);
        self.finish(env, None, time_stamp, opts);
    }

    fn active(&self, env: &Env<'_>) -> bool {
        env.ctx.panning()
    }
}
