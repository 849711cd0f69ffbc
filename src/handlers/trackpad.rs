//! Native trackpad pinch (`gesturestart` / `gesturechange` / `gestureend`).
//!
//! Independent of the pinch and wheel paths: it never claims `panning` or
//! `pinching`, it only zooms the camera under the gesture.

use super::{Env, Outcome, updates::Updates};
use crate::model::GestureInput;

#[derive(Debug, Default)]
pub struct Trackpad;

impl Trackpad {
    pub fn start(&mut self, env: &mut Env<'_>, _ev: &GestureInput) -> Outcome {
        if !env.ctx.enabled() {
            return Outcome::Ignored;
        }
        env.ctx.gesture_scale = 1.0;
        Outcome::Consumed
    }

    pub fn change(&mut self, env: &mut Env<'_>, ev: &GestureInput) -> Outcome {
        if !env.ctx.enabled() {
            return Outcome::Ignored;
        }
        // Some platforms send no-op changes with scale exactly 1.
        if ev.scale == 1.0 {
            return Outcome::Consumed;
        }
        let delta = (env.ctx.gesture_scale - ev.scale) * env.stage.viewport().height;
        env.ctx.gesture_scale = ev.scale;

        let image = env
            .image_at(ev.position)
            .or_else(|| env.stage.current_image());
        if let Some(image) = image {
            if let Some(camera) = env.camera(image) {
                log::trace!("trackpad zoom {:.2} at {:?}", delta, ev.position);
                camera.zoom(delta, 0.0, Some(ev.position));
            }
        }
        Updates::request(env, "gesture");
        Outcome::Consumed
    }

    pub fn end(&mut self, env: &mut Env<'_>, _ev: &GestureInput) -> Outcome {
        if !env.ctx.enabled() {
            return Outcome::Ignored;
        }
        env.ctx.gesture_scale = 1.0;
        Outcome::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use crate::testing::{CameraCall, Harness};

    fn gesture(scale: f64) -> GestureInput {
        GestureInput {
            scale,
            position: Point::new(300.0, 200.0),
            time_stamp: 0.0,
        }
    }

    #[test]
    fn zoom_follows_scale_delta() {
        let mut h = Harness::default();
        let mut tp = Trackpad;
        tp.start(&mut h.env(), &gesture(1.0));
        tp.change(&mut h.env(), &gesture(1.5));
        tp.change(&mut h.env(), &gesture(1.25));
        assert_eq!(h.stage.main_camera().zooms(), vec![-300.0, 150.0]);
        assert_eq!(
            h.stage.main_camera().calls[0],
            CameraCall::Zoom {
                delta: -300.0,
                duration_ms: 0.0,
                focus: Some(Point::new(300.0, 200.0))
            }
        );
        tp.end(&mut h.env(), &gesture(1.25));
        assert_eq!(h.ctx.gesture_scale, 1.0);
    }

    #[test]
    fn unit_scale_is_a_no_op() {
        let mut h = Harness::default();
        Trackpad.change(&mut h.env(), &gesture(1.0));
        assert!(h.stage.main_camera().calls.is_empty());
        assert!(h.ctx.vars.updates.stack.is_empty());
    }

    #[test]
    fn does_not_claim_gesture_flags() {
        let mut h = Harness::default();
        Trackpad.change(&mut h.env(), &gesture(0.8));
        assert!(h.ctx.is_idle());
        assert_eq!(h.ctx.vars.updates.stack, vec!["gesture".to_string()]);
    }

    #[test]
    fn disabled_ignores_every_phase() {
        let mut h = Harness::default();
        h.ctx.gesture_scale = 0.7;
        h.ctx.set_enabled(false);
        let mut tp = Trackpad;
        assert_eq!(tp.start(&mut h.env(), &gesture(1.0)), Outcome::Ignored);
        assert_eq!(tp.change(&mut h.env(), &gesture(1.4)), Outcome::Ignored);
        assert_eq!(tp.end(&mut h.env(), &gesture(1.4)), Outcome::Ignored);
        assert_eq!(h.ctx.gesture_scale, 0.7);
        assert!(h.stage.main_camera().calls.is_empty());
    }
}
