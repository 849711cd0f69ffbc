//! Wheel and two-finger trackpad scroll.
//!
//! Browsers report notched mouse wheels, precise trackpad scrolling and
//! trackpad pinches (as Ctrl+wheel) through the same event. The classification
//! below is a heuristic and is kept deliberately close to deployed behavior:
//!
//! - a delta that is an exact multiple of 0.1 is taken to be a mouse wheel or
//!   pinch-emulated wheel; anything else is a precise touchpad delta
//! - once the zoom modifier has been used, precise deltas without it are
//!   two-finger scrolling, which pans
//!
//! Every handled event is consumed so the page neither scrolls nor zooms.

use super::{Env, Outcome, updates::Updates};
use crate::config::Platform;
use crate::host::Timer;
use crate::model::{Point, WheelInput};
use crate::util::is_multiple_of_tenth;

/// Quiet period after the last wheel event before `wheeling` clears.
pub const WHEEL_END_MS: u32 = 50;

/// Factor for platforms and inferred pinches with a small native delta range.
pub const AMPLIFY: f64 = 10.0;

/// What a wheel event means once classified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelClass {
    pub zoom: bool,
    /// Delta is multiplied by [`AMPLIFY`].
    pub amplify: bool,
}

/// Classify `ev`. Returns `None` when the event must be left to the page.
/// Sets `has_used_modifier` the first time the zoom modifier is seen in
/// modifier mode.
pub fn classify(
    ev: &WheelInput,
    requires_modifier: bool,
    has_used_modifier: &mut bool,
    platform: &Platform,
) -> Option<WheelClass> {
    let modifier = ev.modifiers.zoom_key();
    let exact = is_multiple_of_tenth(ev.delta_y) && is_multiple_of_tenth(ev.delta_x);
    let precise = !exact;

    if requires_modifier && !modifier && !precise {
        return None;
    }
    if requires_modifier && modifier {
        *has_used_modifier = true;
    }

    let two_finger_scroll = precise && (requires_modifier || *has_used_modifier);
    let zoom = platform.wheel_always_zooms || modifier || !two_finger_scroll;
    // Trackpad pinches arrive as Ctrl+wheel with tenth-multiple deltas.
    let pinch_inferred = requires_modifier && modifier && exact;
    Some(WheelClass {
        zoom,
        amplify: platform.amplify_wheel || pinch_inferred,
    })
}

#[derive(Debug, Default)]
pub struct Wheel;

impl Wheel {
    pub fn on_wheel(&mut self, env: &mut Env<'_>, ev: &WheelInput) -> Outcome {
        if !env.ctx.enabled() {
            return Outcome::Ignored;
        }
        let requires = env.ctx.zoom_requires_modifier();
        let platform = env.ctx.config().platform;
        let Some(class) = classify(ev, requires, &mut env.ctx.has_used_modifier, &platform) else {
            log::trace!("wheel left to the page: {:?}", ev);
            return Outcome::Ignored;
        };

        let image = env
            .image_at(ev.position)
            .or_else(|| env.stage.current_image());
        let Some(image) = image else {
            return Outcome::Ignored;
        };
        let two_finger_pan = env.ctx.two_finger_pan();
        let scale = env.stage.viewport().scale;
        let Some(camera) = env.camera(image) else {
            return Outcome::Ignored;
        };
        if two_finger_pan && camera.is_zoomed_out() {
            return Outcome::Ignored;
        }

        let k = if class.amplify { AMPLIFY } else { 1.0 };
        let (dx, dy) = (ev.delta_x * k, ev.delta_y * k);
        if class.zoom {
            let focus = Point::new(ev.position.x * scale, ev.position.y * scale);
            camera.zoom(dy, 0.0, Some(focus));
        } else {
            camera.pan(dx, dy, None);
        }
        log::trace!("wheel {:?} dx={} dy={}", class, dx, dy);

        env.ctx.set_wheeling(true);
        if let Some(id) = env.ctx.vars.wheel.to.take() {
            env.host.clear_timeout(id);
        }
        env.ctx.vars.wheel.to = Some(env.host.set_timeout(Timer::WheelEnd, WHEEL_END_MS));
        Updates::request(env, "wheel");
        Outcome::Consumed
    }

    /// Debounce expiry.
    pub fn on_timer(&mut self, env: &mut Env<'_>) {
        env.ctx.vars.wheel.to = None;
        env.ctx.set_wheeling(false);
    }

    /// Drop a pending debounce and end the burst now.
    pub fn cancel(&mut self, env: &mut Env<'_>) {
        if let Some(id) = env.ctx.vars.wheel.to.take() {
            env.host.clear_timeout(id);
        }
        env.ctx.set_wheeling(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::model::Modifiers;
    use crate::testing::{CameraCall, Harness};

    fn class(ev: &WheelInput, requires: bool, used: &mut bool) -> Option<WheelClass> {
        classify(ev, requires, used, &Platform::default())
    }

    #[test]
    fn notched_wheel_zooms_by_default() {
        let mut used = false;
        let c = class(&WheelInput::new(0.0, 100.0, 0.0), false, &mut used);
        assert_eq!(
            c,
            Some(WheelClass {
                zoom: true,
                amplify: false
            })
        );
    }

    #[test]
    fn modifier_mode_leaves_plain_wheel_to_the_page() {
        let mut used = false;
        assert_eq!(class(&WheelInput::new(0.0, 100.0, 0.0), true, &mut used), None);
        assert!(!used);
    }

    #[test]
    fn modifier_mode_with_modifier_always_zooms() {
        let mut used = false;
        for dy in [100.0, 3.0, 0.37, -12.25] {
            let ev = WheelInput::new(0.0, dy, 0.0).with_modifiers(Modifiers::CTRL);
            let c = class(&ev, true, &mut used).expect("handled");
            assert!(c.zoom, "dy {dy}");
        }
        assert!(used);
    }

    #[test]
    fn precise_deltas_pan_in_modifier_mode() {
        let mut used = false;
        let c = class(&WheelInput::new(1.37, 4.21, 0.0), true, &mut used).expect("handled");
        assert!(!c.zoom);
        assert!(!used);
    }

    #[test]
    fn tenths_with_modifier_infer_a_pinch() {
        let mut used = false;
        for dy in [1.3, 2.0, 0.5, -100.0] {
            let ev = WheelInput::new(0.0, dy, 0.0).with_modifiers(Modifiers::CTRL);
            let c = class(&ev, true, &mut used).expect("handled");
            assert!(c.zoom && c.amplify, "dy {dy}");
        }
        let precise = WheelInput::new(0.0, 0.37, 0.0).with_modifiers(Modifiers::CTRL);
        let c = class(&precise, true, &mut used).expect("handled");
        assert!(c.zoom && !c.amplify);
    }

    #[test]
    fn modifier_mode_amplifies_integer_ctrl_wheel() {
        let mut h = Harness::new(InputConfig {
            zoom_requires_modifier: true,
            ..InputConfig::default()
        });
        for dy in [2.0, 0.5] {
            let ev = WheelInput::new(0.0, dy, 0.0).with_modifiers(Modifiers::CTRL);
            Wheel.on_wheel(&mut h.env(), &ev);
        }
        assert_eq!(h.stage.main_camera().zooms(), vec![20.0, 5.0]);
    }

    #[test]
    fn firefox_always_zooms_and_amplifies() {
        let platform = Platform {
            wheel_always_zooms: true,
            amplify_wheel: true,
            ..Platform::default()
        };
        let mut used = true;
        let c = classify(&WheelInput::new(0.0, 0.37, 0.0), false, &mut used, &platform);
        assert_eq!(
            c,
            Some(WheelClass {
                zoom: true,
                amplify: true
            })
        );
    }

    #[test]
    fn zoom_focuses_on_scaled_pointer() {
        let mut h = Harness::default();
        h.stage.viewport.scale = 2.0;
        let out = Wheel.on_wheel(&mut h.env(), &WheelInput::new(0.0, -100.0, 0.0).at(100.0, 50.0));
        assert_eq!(out, Outcome::Consumed);
        assert_eq!(
            h.stage.main_camera().calls,
            vec![CameraCall::Zoom {
                delta: -100.0,
                duration_ms: 0.0,
                focus: Some(Point::new(200.0, 100.0))
            }]
        );
        assert!(h.ctx.wheeling());
    }

    #[test]
    fn two_finger_scroll_pans_both_axes() {
        let mut h = Harness::new(InputConfig {
            zoom_requires_modifier: true,
            ..InputConfig::default()
        });
        Wheel.on_wheel(&mut h.env(), &WheelInput::new(3.37, -2.21, 0.0));
        assert_eq!(h.stage.main_camera().pans(), vec![(3.37, -2.21)]);
    }

    #[test]
    fn zoomed_out_two_finger_mode_is_left_alone() {
        let mut h = Harness::new(InputConfig {
            two_finger_pan: true,
            ..InputConfig::default()
        });
        h.stage.set_zoomed_out(true);
        let out = Wheel.on_wheel(&mut h.env(), &WheelInput::new(0.0, 100.0, 0.0));
        assert_eq!(out, Outcome::Ignored);
        assert!(h.stage.main_camera().calls.is_empty());
        assert!(!h.ctx.wheeling());
    }

    #[test]
    fn burst_clears_fifty_ms_after_last_event() {
        let mut h = Harness::default();
        let mut wheel = Wheel;
        for i in 0..5 {
            let now = i as f64 * 20.0;
            h.host.now = now;
            wheel.on_wheel(&mut h.env(), &WheelInput::new(0.0, 10.0, now));
            assert!(h.ctx.wheeling());
        }
        // Last event at 80ms.
        let due: Vec<_> = h
            .host
            .advance(49.0)
            .into_iter()
            .filter(|t| *t == Timer::WheelEnd)
            .collect();
        assert!(due.is_empty());
        assert!(h.ctx.wheeling());
        let fired = h.host.advance(1.0);
        assert!(fired.contains(&Timer::WheelEnd));
        wheel.on_timer(&mut h.env());
        assert!(!h.ctx.wheeling());
    }
}
