// Start/update/stop core shared by touch and pointer pinch sources. The
// sources own their listeners and contact bookkeeping; this module owns the
// context flags, engine lifecycle and notifications.
use super::{Env, GestureStop, Outcome, StopOptions, drag::Drag, updates::Updates};
use crate::model::{Point, PointerInput, ViewerEvent};
use crate::state::DragStart;
use crate::util::{distance, midpoint};

/// Result of a pinch source callback.
#[derive(Clone, Debug, PartialEq)]
pub enum PinchStep {
    Ignored,
    Consumed,
    /// The pinch ended with one contact left; panning resumes with it.
    Resume(PointerInput),
}

impl PinchStep {
    pub fn outcome(&self) -> Outcome {
        match self {
            PinchStep::Ignored => Outcome::Ignored,
            PinchStep::Consumed | PinchStep::Resume(_) => Outcome::Consumed,
        }
    }
}

/// Distances below this are treated as coincident contacts.
const MIN_DISTANCE: f64 = 1e-3;

/// Claim `pinching` for contacts `a` and `b`. Returns `Ignored` when the first
/// contact misses every image; nothing has been touched in that case.
pub fn begin(
    env: &mut Env<'_>,
    a: Point,
    b: Point,
    time_stamp: f64,
    drag: &mut dyn GestureStop,
) -> Outcome {
    let Some(image) = env.image_at(a) else {
        log::trace!("pinch start missed every image at {:?}", a);
        return Outcome::Ignored;
    };

    let was_panning = drag.active(env);
    if was_panning {
        log::debug!("pinch takes over an active pan");
    }
    drag.stop(env, Some(time_stamp), StopOptions::HANDOFF);
    env.ctx.set_pinching(true);

    let mid = midpoint(a, b);
    let vars = &mut env.ctx.vars.pinch;
    vars.image = Some(image);
    vars.s_dst = distance(a, b).max(MIN_DISTANCE);
    vars.factor = 1.0;
    vars.was_panning = was_panning;
    vars.synthetic_pan = false;
    vars.started_at = time_stamp;
    vars.start_mid = mid;
    vars.last_mid = mid;

    env.engine.pinch_start(image);
    env.engine.render();
    env.host.emit(ViewerEvent::PinchStart);

    if env.ctx.two_finger_pan() && !env.ctx.vars.drag.session_open {
        let drag_vars = &mut env.ctx.vars.drag;
        drag_vars.session_open = true;
        drag_vars.start = Some(DragStart {
            position: mid,
            time_stamp,
        });
        env.ctx.vars.pinch.synthetic_pan = true;
        env.host.emit(ViewerEvent::PanStart);
    }
    log::debug!("pinch start {:?} s_dst={:.1}", image, env.ctx.vars.pinch.s_dst);
    Outcome::Consumed
}

/// New contact positions in screen coordinates.
pub fn update(env: &mut Env<'_>, a: Point, b: Point) -> Outcome {
    if !env.ctx.pinching() {
        return Outcome::Ignored;
    }
    let Some(image) = env.ctx.vars.pinch.image else {
        return Outcome::Ignored;
    };
    let offset = env.stage.view_offset(image);
    let (a, b) = (a.offset_by(offset), b.offset_by(offset));

    let vars = &mut env.ctx.vars.pinch;
    vars.factor = distance(a, b) / vars.s_dst;
    vars.last_mid = midpoint(a, b);
    log::trace!("pinch factor {:.3}", vars.factor);

    env.engine.pinch_update(image, a, b);
    Updates::request(env, "pinch");
    Outcome::Consumed
}

/// Release `pinching`. `remaining` is the contact still down, if any; a
/// session opened by the pinch or a handed-off pan is closed when none is.
/// Returns false if no pinch was active.
pub fn end(
    env: &mut Env<'_>,
    time_stamp: f64,
    remaining: Option<Point>,
    opts: StopOptions,
) -> bool {
    if !env.ctx.pinching() {
        return false;
    }
    env.ctx.set_pinching(false);
    let vars = &mut env.ctx.vars.pinch;
    let image = vars.image.take();
    let last_mid = vars.last_mid;
    let synthetic_pan = std::mem::take(&mut vars.synthetic_pan);
    let was_panning = std::mem::take(&mut vars.was_panning);
    vars.factor = 0.0;
    vars.s_dst = 0.0;

    if !opts.no_coast {
        if let Some(image) = image {
            env.engine.pinch_stop(image, time_stamp);
        }
    }
    if !opts.no_emit {
        env.host.emit(ViewerEvent::PinchEnd);
        let close = match remaining {
            None => true,
            Some(_) => synthetic_pan && !was_panning,
        };
        if close {
            Drag::close_session(env, Some(last_mid), time_stamp);
        }
    }
    log::debug!("pinch stop {:?} remaining={:?}", image, remaining);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::model::{ImageRef, PointerInput};
    use crate::testing::{EngineCall, Harness};

    fn two_finger() -> Harness {
        Harness::new(InputConfig {
            two_finger_pan: true,
            ..InputConfig::default()
        })
    }

    #[test]
    fn begin_hands_off_an_active_pan() {
        let mut h = Harness::default();
        let mut drag = Drag;
        drag.start(
            &mut h.env(),
            &PointerInput::touch(1, 100.0, 100.0, 0.0),
            &mut NoPinch,
            false,
        );
        h.engine.calls.clear();
        let out = begin(
            &mut h.env(),
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            40.0,
            &mut drag,
        );
        assert_eq!(out, Outcome::Consumed);
        assert!(h.ctx.pinching());
        assert!(!h.ctx.panning());
        assert!(h.ctx.vars.pinch.was_panning);
        assert_eq!(h.ctx.vars.pinch.s_dst, 100.0);
        // No pan stop: the pan was handed over, not ended.
        assert_eq!(h.engine.lifecycle(), vec![EngineCall::PinchStart(ImageRef(1))]);
        assert_eq!(h.host.emitted_names(), vec!["panstart", "pinchstart"]);
    }

    #[test]
    fn miss_leaves_everything_alone() {
        let mut h = Harness::default();
        let out = begin(
            &mut h.env(),
            Point::new(900.0, 100.0),
            Point::new(200.0, 100.0),
            0.0,
            &mut Drag,
        );
        assert_eq!(out, Outcome::Ignored);
        assert!(!h.ctx.pinching());
        assert!(h.engine.calls.is_empty());
    }

    #[test]
    fn update_reports_factor_and_offsets() {
        let mut h = Harness::default();
        h.stage = crate::testing::FakeStage::split();
        begin(
            &mut h.env(),
            Point::new(500.0, 100.0),
            Point::new(600.0, 100.0),
            0.0,
            &mut Drag,
        );
        update(&mut h.env(), Point::new(450.0, 100.0), Point::new(650.0, 100.0));
        assert_eq!(h.ctx.vars.pinch.factor, 2.0);
        assert_eq!(
            h.engine.lifecycle().last(),
            Some(&EngineCall::PinchUpdate(
                ImageRef(2),
                Point::new(50.0, 100.0),
                Point::new(250.0, 100.0)
            ))
        );
        assert_eq!(h.ctx.vars.updates.stack, vec!["pinch".to_string()]);
    }

    #[test]
    fn two_finger_mode_pairs_synthetic_pan() {
        let mut h = two_finger();
        begin(
            &mut h.env(),
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            0.0,
            &mut Drag,
        );
        assert!(end(&mut h.env(), 120.0, None, StopOptions::default()));
        assert_eq!(
            h.host.emitted_names(),
            vec!["pinchstart", "panstart", "pinchend", "panend"]
        );
        assert!(!h.ctx.vars.drag.session_open);
    }

    #[test]
    fn end_is_idempotent() {
        let mut h = Harness::default();
        begin(
            &mut h.env(),
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            0.0,
            &mut Drag,
        );
        assert!(end(&mut h.env(), 10.0, None, StopOptions::default()));
        let emitted = h.host.emitted.len();
        let calls = h.engine.calls.len();
        assert!(!end(&mut h.env(), 20.0, None, StopOptions::default()));
        assert_eq!(h.host.emitted.len(), emitted);
        assert_eq!(h.engine.calls.len(), calls);
        assert_eq!(h.ctx.vars.pinch.image, None);
    }

    struct NoPinch;

    impl GestureStop for NoPinch {
        fn stop(&mut self, _env: &mut Env<'_>, _time_stamp: Option<f64>, _opts: StopOptions) {}

        fn active(&self, _env: &Env<'_>) -> bool {
            false
        }
    }
}
