//! Core data models for the gesture layer.
//! Synthetic native-event records consumed by the handlers, geometry, and the
//! notifications emitted to the hosting element.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Visible area of the hosting element in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Ratio applied to screen coordinates before they reach the camera.
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 1.0,
        }
    }
}

/// Opaque handle to a logical image owned by the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub u32);

pub type PointerId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
        alt: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn zoom_key(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// Where a pointer or touch landed relative to the interactive surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetKind {
    /// The viewer canvas itself.
    #[default]
    Canvas,
    /// A child element marked `data-scroll-through`, which forwards gestures.
    ScrollThrough,
    /// Anything else (toolbar buttons, popups, ...).
    Other,
}

impl TargetKind {
    pub fn is_interactive(self) -> bool {
        matches!(self, TargetKind::Canvas | TargetKind::ScrollThrough)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    /// DOM `button`: 0 primary, 1 middle, 2 secondary.
    pub button: i16,
    pub is_primary: bool,
    /// Position relative to the hosting element.
    pub position: Point,
    pub modifiers: Modifiers,
    pub target: TargetKind,
    /// Event time in milliseconds.
    pub time_stamp: f64,
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64, time_stamp: f64) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            button: 0,
            is_primary: true,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
            target: TargetKind::Canvas,
            time_stamp,
        }
    }

    pub fn touch(pointer_id: PointerId, x: f64, y: f64, time_stamp: f64) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Touch,
            button: 0,
            is_primary: pointer_id == 1,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
            target: TargetKind::Canvas,
            time_stamp,
        }
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_target(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// DOM `Touch.identifier`; unrelated to pointer ids.
    pub id: i32,
    pub position: Point,
}

/// A touch event; `touches` holds every contact still on the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchInput {
    pub touches: Vec<TouchPoint>,
    pub target: TargetKind,
    pub time_stamp: f64,
}

impl TouchInput {
    pub fn new(points: &[(f64, f64)], time_stamp: f64) -> Self {
        Self {
            touches: points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| TouchPoint {
                    id: i as i32,
                    position: Point::new(x, y),
                })
                .collect(),
            target: TargetKind::Canvas,
            time_stamp,
        }
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub position: Point,
    pub modifiers: Modifiers,
    pub time_stamp: f64,
}

impl WheelInput {
    pub fn new(delta_x: f64, delta_y: f64, time_stamp: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            position: Point::new(400.0, 300.0),
            modifiers: Modifiers::NONE,
            time_stamp,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }
}

/// Native trackpad gesture (`gesturestart` / `gesturechange` / `gestureend`).
#[derive(Clone, Debug, PartialEq)]
pub struct GestureInput {
    pub scale: f64,
    pub position: Point,
    pub time_stamp: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyInput {
    /// DOM `KeyboardEvent.key`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }
}

/// Every native event the input system can be fed.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    PointerCancel(PointerInput),
    TouchStart(TouchInput),
    TouchMove(TouchInput),
    TouchEnd(TouchInput),
    Wheel(WheelInput),
    GestureStart(GestureInput),
    GestureChange(GestureInput),
    GestureEnd(GestureInput),
    KeyDown(KeyInput),
    DoubleClick(PointerInput),
}

/// Notifications emitted to the hosting element's listeners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ViewerEvent {
    PanStart,
    PanEnd {
        #[serde(rename = "durationMs")]
        duration_ms: f64,
        #[serde(rename = "movedX")]
        moved_x: f64,
        #[serde(rename = "movedY")]
        moved_y: f64,
    },
    PinchStart,
    PinchEnd,
    /// Coalesced "view changed" notification.
    Update { types: Vec<String> },
}

impl ViewerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::PanStart => "panstart",
            ViewerEvent::PanEnd { .. } => "panend",
            ViewerEvent::PinchStart => "pinchstart",
            ViewerEvent::PinchEnd => "pinchend",
            ViewerEvent::Update { .. } => "update",
        }
    }
}
