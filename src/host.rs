//! Collaborator interfaces supplied by the hosting element.
//!
//! The gesture layer never computes camera transforms or draws anything; it
//! drives these traits in the lifecycle order the handlers define.

use crate::model::{ImageRef, Point, PointerId, ViewerEvent, Viewport};

/// Per-image camera. Animation and easing belong to the implementation.
pub trait Camera {
    fn pan(&mut self, dx: f64, dy: f64, duration_ms: Option<f64>);
    /// Positive `delta` zooms out, negative zooms in.
    fn zoom(&mut self, delta: f64, duration_ms: f64, focus: Option<Point>);
    fn is_zoomed_out(&self) -> bool;
}

/// Rendering/physics engine lifecycle entry points.
pub trait Engine {
    fn pan_start(&mut self, image: ImageRef);
    /// Ends a pan; the engine may start kinetic coasting.
    fn pan_stop(&mut self, image: ImageRef);
    fn pinch_start(&mut self, image: ImageRef);
    /// Both contact points; the engine owns the zoom-around-midpoint math.
    fn pinch_update(&mut self, image: ImageRef, a: Point, b: Point);
    fn pinch_stop(&mut self, image: ImageRef, time_ms: f64);
    fn render(&mut self);
}

/// Layout and image knowledge of the hosting element.
pub trait Stage {
    /// Hit-test a screen coordinate against the visible images.
    fn image_at(&self, point: Point) -> Option<ImageRef>;
    fn current_image(&self) -> Option<ImageRef>;
    fn camera(&mut self, image: ImageRef) -> Option<&mut dyn Camera>;
    fn viewport(&self) -> Viewport;

    /// Screen offset of a secondary split-screen view; zero for the main view.
    fn view_offset(&self, _image: ImageRef) -> Point {
        Point::ZERO
    }

    /// An omni (rotatable object) view is active.
    fn omni_active(&self) -> bool {
        false
    }
}

/// Native listeners a handler can ask the host to attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Listener {
    PointerDown,
    /// Element-level pointer up, used for tap detection.
    PointerUpElement,
    /// Window-level move/up while a pan owns the pointer.
    PointerMove,
    PointerUp,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    Wheel,
    GestureStart,
    GestureChange,
    GestureEnd,
    KeyDown,
    DoubleClick,
}

impl Listener {
    pub fn event_name(self) -> &'static str {
        match self {
            Listener::PointerDown => "pointerdown",
            Listener::PointerUpElement | Listener::PointerUp => "pointerup",
            Listener::PointerMove => "pointermove",
            Listener::TouchStart => "touchstart",
            Listener::TouchMove => "touchmove",
            Listener::TouchEnd => "touchend",
            Listener::TouchCancel => "touchcancel",
            Listener::Wheel => "wheel",
            Listener::GestureStart => "gesturestart",
            Listener::GestureChange => "gesturechange",
            Listener::GestureEnd => "gestureend",
            Listener::KeyDown => "keydown",
            Listener::DoubleClick => "dblclick",
        }
    }

    /// Window-level listeners keep tracking after the pointer leaves the element.
    pub fn on_window(self) -> bool {
        matches!(
            self,
            Listener::PointerMove
                | Listener::PointerUp
                | Listener::TouchMove
                | Listener::TouchEnd
                | Listener::TouchCancel
                | Listener::KeyDown
        )
    }
}

/// Timers the handlers schedule through the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    WheelEnd,
    DoubleTap,
    Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Event plumbing of the hosting element.
pub trait Host {
    fn listen(&mut self, listener: Listener);
    fn unlisten(&mut self, listener: Listener);
    fn capture_pointer(&mut self, id: PointerId);
    fn release_pointer(&mut self, id: PointerId);
    fn emit(&mut self, event: ViewerEvent);
    /// When the delay elapses the host calls `InputSystem::on_timer(timer)`.
    fn set_timeout(&mut self, timer: Timer, delay_ms: u32) -> TimerId;
    fn clear_timeout(&mut self, id: TimerId);
}
