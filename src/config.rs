//! Input configuration supplied by the hosting element.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading an [`InputConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A boolean `data-*` attribute carried something other than a boolean.
    #[error("invalid value {value:?} for attribute {name}")]
    InvalidFlag { name: String, value: String },
}

/// Browser/OS traits that change how wheel and gesture events must be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Platform {
    /// Native `gesturestart/change/end` trackpad events are available.
    pub native_gestures: bool,
    /// The browser family whose wheel events are always treated as zoom.
    pub wheel_always_zooms: bool,
    /// Wheel deltas are reported on a smaller scale and need a 10x boost.
    pub amplify_wheel: bool,
}

impl Platform {
    /// Derive platform traits from a user agent string.
    ///
    /// `has_gesture_events` is whether `window.GestureEvent` exists.
    pub fn detect(user_agent: &str, has_gesture_events: bool) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let firefox = ua.contains("firefox");
        let mac = ua.contains("mac os") || ua.contains("macintosh");
        Self {
            native_gestures: has_gesture_events,
            wheel_always_zooms: firefox,
            // Gecko outside macOS reports line-mode deltas of about 3 per notch.
            amplify_wheel: firefox && !mac,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
    /// Panning with touch needs two fingers; one finger scrolls the page.
    pub two_finger_pan: bool,
    /// Wheel zoom only happens while Ctrl/Cmd is held.
    pub zoom_requires_modifier: bool,
    pub touch_supported: bool,
    /// Build pinches from pointer events instead of touch events.
    pub pointer_pinch: bool,
    pub keyboard: bool,
    pub double_tap: bool,
    pub platform: Platform,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            two_finger_pan: false,
            zoom_requires_modifier: false,
            touch_supported: true,
            pointer_pinch: false,
            keyboard: true,
            double_tap: true,
            platform: Platform::default(),
        }
    }
}

/// `data-*` attributes read by [`InputConfig::from_attributes`].
pub const ATTRIBUTES: [&str; 6] = [
    "data-two-finger-pan",
    "data-zoom-requires-modifier",
    "data-touch",
    "data-pointer-pinch",
    "data-keyboard",
    "data-double-tap",
];

impl InputConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply `data-*` attribute pairs on top of the defaults.
    ///
    /// Unknown attributes are skipped. A present-but-empty attribute means `true`.
    pub fn from_attributes<'a, I>(attrs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cfg = InputConfig::default();
        for (name, value) in attrs {
            let slot = match name.trim_start_matches("data-") {
                "two-finger-pan" => &mut cfg.two_finger_pan,
                "zoom-requires-modifier" => &mut cfg.zoom_requires_modifier,
                "touch" => &mut cfg.touch_supported,
                "pointer-pinch" => &mut cfg.pointer_pinch,
                "keyboard" => &mut cfg.keyboard,
                "double-tap" => &mut cfg.double_tap,
                _ => continue,
            };
            *slot = parse_flag(name, value)?;
        }
        Ok(cfg)
    }

    /// Touch-event pinch is used when touch is available, pointer pinch is not
    /// selected, and the platform does not deliver native gesture events (those
    /// already report the same pinch to the trackpad path).
    pub fn uses_touch_pinch(&self) -> bool {
        self.touch_supported && !self.pointer_pinch && !self.platform.native_gestures
    }

    /// Pointer pinch needs contact ups even when no drag or double tap listens for them.
    pub fn needs_element_pointer_up(&self) -> bool {
        self.double_tap || self.pointer_pinch
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "" | "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}
