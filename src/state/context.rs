//! Shared gesture state.
//!
//! One `EventContext` exists per viewer element. Every handler reads and writes
//! it; ownership of the current gesture is expressed through the `panning` and
//! `pinching` flags.
//!
//! ```text
//! Idle -> Panning              (drag start)
//! Idle -> Pinching             (second contact)
//! Panning -> Pinching          (second contact; pan force-stopped first)
//! Pinching -> Panning          (pinch ends with one contact left)
//! Any -> Idle                  (stop paths)
//! ```

use super::vars::Vars;
use crate::config::InputConfig;
use crate::model::PointerId;

#[derive(Debug, Clone)]
pub struct EventContext {
    config: InputConfig,
    enabled: bool,
    panning: bool,
    pinching: bool,
    wheeling: bool,
    captured: Option<PointerId>,
    /// Last `scale` reported by a native trackpad gesture.
    pub gesture_scale: f64,
    /// Sticky: the user has zoomed with Ctrl/Cmd at least once.
    pub has_used_modifier: bool,
    pub vars: Vars,
}

impl EventContext {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            enabled: true,
            panning: false,
            pinching: false,
            wheeling: false,
            captured: None,
            gesture_scale: 1.0,
            has_used_modifier: false,
            vars: Vars::default(),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: InputConfig) {
        self.config = config;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn two_finger_pan(&self) -> bool {
        self.config.two_finger_pan
    }

    pub fn zoom_requires_modifier(&self) -> bool {
        self.config.zoom_requires_modifier
    }

    pub fn touch_supported(&self) -> bool {
        self.config.touch_supported
    }

    pub fn panning(&self) -> bool {
        self.panning
    }

    pub fn set_panning(&mut self, panning: bool) {
        self.panning = panning;
    }

    pub fn pinching(&self) -> bool {
        self.pinching
    }

    pub fn set_pinching(&mut self, pinching: bool) {
        self.pinching = pinching;
    }

    pub fn wheeling(&self) -> bool {
        self.wheeling
    }

    pub fn set_wheeling(&mut self, wheeling: bool) {
        self.wheeling = wheeling;
    }

    pub fn captured(&self) -> Option<PointerId> {
        self.captured
    }

    pub fn set_captured(&mut self, id: Option<PointerId>) {
        self.captured = id;
    }

    /// No modality currently owns a gesture.
    pub fn is_idle(&self) -> bool {
        !self.panning && !self.pinching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_idle_and_enabled() {
        let ctx = EventContext::new(InputConfig::default());
        assert!(ctx.is_idle());
        assert!(ctx.enabled());
        assert!(!ctx.wheeling());
        assert_eq!(ctx.captured(), None);
        assert_eq!(ctx.gesture_scale, 1.0);
        assert!(!ctx.has_used_modifier);
        assert_eq!(ctx.vars, Vars::default());
    }

    #[test]
    fn capability_accessors_follow_config() {
        let ctx = EventContext::new(InputConfig {
            two_finger_pan: true,
            zoom_requires_modifier: true,
            touch_supported: false,
            ..InputConfig::default()
        });
        assert!(ctx.two_finger_pan());
        assert!(ctx.zoom_requires_modifier());
        assert!(!ctx.touch_supported());
    }

    #[test]
    fn ownership_flags() {
        let mut ctx = EventContext::new(InputConfig::default());
        ctx.set_panning(true);
        assert!(!ctx.is_idle());
        ctx.set_panning(false);
        ctx.set_pinching(true);
        assert!(!ctx.is_idle());
        ctx.set_pinching(false);
        assert!(ctx.is_idle());
    }
}
