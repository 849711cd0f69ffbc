//! Double tap (touch/pen) and double click (mouse) zoom.
//!
//! Same timing shape as the wheel debounce: the first tap opens a window held
//! by a host timer, a second compatible tap inside it zooms and closes it.

use super::{Env, Outcome, updates::Updates};
use crate::host::Timer;
use crate::model::{Point, PointerInput, PointerKind};
use crate::util::distance;

/// Longest press that still counts as a tap.
pub const TAP_MAX_MS: f64 = 250.0;
/// Most travel between down and up for a tap.
pub const TAP_MAX_MOVE: f64 = 10.0;
/// Window for the second tap.
pub const DOUBLE_TAP_MS: u32 = 300;
/// Largest distance between the two taps.
pub const DOUBLE_TAP_SLOP: f64 = 30.0;

pub const ZOOM_DELTA: f64 = -250.0;
pub const ZOOM_DURATION_MS: f64 = 300.0;

#[derive(Debug, Default)]
pub struct DoubleTap;

impl DoubleTap {
    /// Remember a touch/pen down that may turn into a tap. Never consumes.
    pub fn on_pointer_down(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> Outcome {
        if ev.kind == PointerKind::Mouse || !ev.is_primary || !ev.target.is_interactive() {
            return Outcome::Ignored;
        }
        env.ctx.vars.dbltap.down = Some((ev.pointer_id, ev.position, ev.time_stamp));
        Outcome::Ignored
    }

    pub fn on_pointer_up(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> Outcome {
        let Some((id, position, down_at)) = env.ctx.vars.dbltap.down.take() else {
            return Outcome::Ignored;
        };
        if id != ev.pointer_id
            || ev.time_stamp - down_at > TAP_MAX_MS
            || distance(position, ev.position) >= TAP_MAX_MOVE
        {
            return Outcome::Ignored;
        }
        if !env.ctx.enabled() || env.ctx.pinching() {
            return Outcome::Ignored;
        }
        self.tap(env, ev.position, ev.time_stamp)
    }

    pub fn on_double_click(&mut self, env: &mut Env<'_>, ev: &PointerInput) -> Outcome {
        if !env.ctx.enabled() || !ev.target.is_interactive() {
            return Outcome::Ignored;
        }
        if zoom_at(env, ev.position) {
            Outcome::Consumed
        } else {
            Outcome::Ignored
        }
    }

    /// Window expiry.
    pub fn on_timer(&mut self, env: &mut Env<'_>) {
        let vars = &mut env.ctx.vars.dbltap;
        vars.to = None;
        vars.last_tapped = 0.0;
        vars.last_position = None;
    }

    pub fn cancel(&mut self, env: &mut Env<'_>) {
        if let Some(id) = env.ctx.vars.dbltap.to.take() {
            env.host.clear_timeout(id);
        }
        self.on_timer(env);
        env.ctx.vars.dbltap.down = None;
    }

    fn tap(&mut self, env: &mut Env<'_>, position: Point, time_stamp: f64) -> Outcome {
        let vars = &mut env.ctx.vars.dbltap;
        let second = vars.last_position.is_some_and(|last| {
            time_stamp - vars.last_tapped <= DOUBLE_TAP_MS as f64
                && distance(last, position) < DOUBLE_TAP_SLOP
        });
        if let Some(id) = vars.to.take() {
            env.host.clear_timeout(id);
        }

        if second {
            self.on_timer(env);
            log::debug!("double tap at {:?}", position);
            zoom_at(env, position);
            return Outcome::Consumed;
        }
        let vars = &mut env.ctx.vars.dbltap;
        vars.last_tapped = time_stamp;
        vars.last_position = Some(position);
        vars.to = Some(env.host.set_timeout(Timer::DoubleTap, DOUBLE_TAP_MS));
        Outcome::Ignored
    }
}

fn zoom_at(env: &mut Env<'_>, position: Point) -> bool {
    let Some(image) = env
        .image_at(position)
        .or_else(|| env.stage.current_image())
    else {
        return false;
    };
    let Some(camera) = env.camera(image) else {
        return false;
    };
    camera.zoom(ZOOM_DELTA, ZOOM_DURATION_MS, Some(position));
    Updates::request(env, "dbltap");
    true
}
