//! Coalesces bursts of view changes into one `update` notification per tick.

use super::Env;
use crate::host::Timer;
use crate::model::ViewerEvent;

/// Flush delay; zero lets the current callback and pending microtasks settle first.
pub const UPDATE_DELAY_MS: u32 = 0;

#[derive(Debug, Default)]
pub struct Updates;

impl Updates {
    /// Record that `kind` changed the view and schedule a flush if none is pending.
    pub fn request(env: &mut Env<'_>, kind: &str) {
        let vars = &mut env.ctx.vars.updates;
        if !vars.stack.iter().any(|k| k == kind) {
            vars.stack.push(kind.to_string());
        }
        if vars.to.is_none() {
            vars.to = Some(env.host.set_timeout(Timer::Update, UPDATE_DELAY_MS));
        }
    }

    /// Timer callback: emit the combined notification.
    pub fn flush(env: &mut Env<'_>) {
        let vars = &mut env.ctx.vars.updates;
        vars.to = None;
        if vars.stack.is_empty() {
            return;
        }
        let types = std::mem::take(&mut vars.stack);
        log::trace!("update flush {:?}", types);
        env.host.emit(ViewerEvent::Update { types });
    }

    /// Drop a pending flush without emitting.
    pub fn cancel(env: &mut Env<'_>) {
        let vars = &mut env.ctx.vars.updates;
        if let Some(id) = vars.to.take() {
            env.host.clear_timeout(id);
        }
        vars.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[test]
    fn many_requests_one_notification() {
        let mut h = Harness::default();
        {
            let mut env = h.env();
            Updates::request(&mut env, "drag");
            Updates::request(&mut env, "wheel");
            Updates::request(&mut env, "drag");
        }
        assert_eq!(h.host.pending_timers(), 1);
        for timer in h.host.advance(0.0) {
            assert_eq!(timer, Timer::Update);
            Updates::flush(&mut h.env());
        }
        assert_eq!(
            h.host.emitted,
            vec![ViewerEvent::Update {
                types: vec!["drag".to_string(), "wheel".to_string()]
            }]
        );
        assert!(h.ctx.vars.updates.stack.is_empty());
        assert!(h.ctx.vars.updates.to.is_none());
    }

    #[test]
    fn cancel_clears_pending_flush() {
        let mut h = Harness::default();
        Updates::request(&mut h.env(), "keydown");
        Updates::cancel(&mut h.env());
        assert_eq!(h.host.pending_timers(), 0);
        assert!(h.host.advance(10.0).is_empty());
        assert!(h.host.emitted.is_empty());
    }
}
