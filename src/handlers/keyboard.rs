use super::{Env, Outcome, updates::Updates};
use crate::model::KeyInput;

/// Animation length for key-driven moves.
pub const KEY_DURATION_MS: f64 = 250.0;

/// Zoom step for `+` / `-`; negative zooms in.
pub const KEY_ZOOM_DELTA: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum KeyAction {
    Pan(f64, f64),
    Zoom(f64),
}

fn action_for(key: &str, half_w: f64, half_h: f64) -> Option<KeyAction> {
    let action = match key {
        "ArrowLeft" => KeyAction::Pan(-half_w, 0.0),
        "ArrowRight" => KeyAction::Pan(half_w, 0.0),
        "ArrowUp" => KeyAction::Pan(0.0, -half_h),
        "ArrowDown" => KeyAction::Pan(0.0, half_h),
        "+" | "=" => KeyAction::Zoom(-KEY_ZOOM_DELTA),
        "-" | "_" => KeyAction::Zoom(KEY_ZOOM_DELTA),
        _ => return None,
    };
    Some(action)
}

/// Arrow and +/- navigation on the current image.
#[derive(Debug, Default)]
pub struct Keyboard;

impl Keyboard {
    pub fn on_key_down(&mut self, env: &mut Env<'_>, ev: &KeyInput) -> Outcome {
        if !env.ctx.enabled() || env.ctx.panning() || env.ctx.pinching() {
            return Outcome::Ignored;
        }
        // Leave browser shortcuts such as Ctrl + alone.
        if ev.modifiers.zoom_key() {
            return Outcome::Ignored;
        }
        let viewport = env.stage.viewport();
        let Some(action) = action_for(&ev.key, viewport.width / 2.0, viewport.height / 2.0) else {
            return Outcome::Ignored;
        };
        let Some(image) = env.stage.current_image() else {
            return Outcome::Ignored;
        };
        let Some(camera) = env.camera(image) else {
            return Outcome::Ignored;
        };
        match action {
            KeyAction::Pan(dx, dy) => camera.pan(dx, dy, Some(KEY_DURATION_MS)),
            KeyAction::Zoom(delta) => camera.zoom(delta, KEY_DURATION_MS, None),
        }
        log::trace!("key {} -> {:?}", ev.key, action);
        Updates::request(env, "keydown");
        Outcome::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CameraCall, Harness};

    #[test]
    fn arrows_pan_half_the_viewport() {
        let mut h = Harness::default();
        for key in ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown"] {
            assert_eq!(
                Keyboard.on_key_down(&mut h.env(), &KeyInput::new(key)),
                Outcome::Consumed
            );
        }
        assert_eq!(
            h.stage.main_camera().pans(),
            vec![(-400.0, 0.0), (400.0, 0.0), (0.0, -300.0), (0.0, 300.0)]
        );
        assert_eq!(
            h.stage.main_camera().calls[0],
            CameraCall::Pan {
                dx: -400.0,
                dy: 0.0,
                duration_ms: Some(KEY_DURATION_MS)
            }
        );
    }

    #[test]
    fn plus_and_minus_zoom() {
        let mut h = Harness::default();
        for key in ["+", "=", "-", "_"] {
            Keyboard.on_key_down(&mut h.env(), &KeyInput::new(key));
        }
        assert_eq!(h.stage.main_camera().zooms(), vec![-100.0, -100.0, 100.0, 100.0]);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let mut h = Harness::default();
        let out = Keyboard.on_key_down(&mut h.env(), &KeyInput::new("a"));
        assert_eq!(out, Outcome::Ignored);
        assert!(h.stage.main_camera().calls.is_empty());
        assert!(h.ctx.vars.updates.stack.is_empty());
    }

    #[test]
    fn suppressed_during_gestures() {
        let mut h = Harness::default();
        h.ctx.set_panning(true);
        assert_eq!(
            Keyboard.on_key_down(&mut h.env(), &KeyInput::new("ArrowLeft")),
            Outcome::Ignored
        );
        h.ctx.set_panning(false);
        h.ctx.set_pinching(true);
        assert_eq!(
            Keyboard.on_key_down(&mut h.env(), &KeyInput::new("+")),
            Outcome::Ignored
        );
        assert!(h.stage.main_camera().calls.is_empty());
    }

    #[test]
    fn no_current_image_is_ignored() {
        let mut h = Harness::default();
        h.stage.current = None;
        assert_eq!(
            Keyboard.on_key_down(&mut h.env(), &KeyInput::new("ArrowUp")),
            Outcome::Ignored
        );
    }
}
