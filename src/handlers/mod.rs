//! Per-modality input handlers.
//!
//! Each handler is a small object whose callbacks take an [`Env`]: the shared
//! [`EventContext`] plus the collaborators of the hosting element. Handlers
//! never hold references to each other; when one must end another's gesture it
//! goes through the [`GestureStop`] capability handed in by the coordinator.
//!
//! ## Modules
//!
//! - `drag` - single pointer panning
//! - `touch_pinch` - two-finger pinch from touch events
//! - `pointer_pinch` - two-finger pinch from pointer events
//! - `pinch` - start/update/stop core shared by both pinch sources
//! - `trackpad` - native trackpad gesture events
//! - `wheel` - wheel zoom/pan disambiguation
//! - `keyboard` - arrow and +/- navigation
//! - `dbltap` - double tap / double click zoom
//! - `updates` - per-tick coalescing of view change notifications

pub mod dbltap;
pub mod drag;
pub mod keyboard;
pub mod pinch;
pub mod pointer_pinch;
pub mod touch_pinch;
pub mod trackpad;
pub mod updates;
pub mod wheel;

pub use dbltap::DoubleTap;
pub use drag::Drag;
pub use keyboard::Keyboard;
pub use pointer_pinch::PointerPinch;
pub use touch_pinch::TouchPinch;
pub use trackpad::Trackpad;
pub use updates::Updates;
pub use wheel::Wheel;

use crate::host::{Camera, Engine, Host, Listener, Stage};
use crate::model::{ImageRef, Point};
use crate::state::EventContext;

/// Everything a handler callback may touch.
pub struct Env<'a> {
    pub ctx: &'a mut EventContext,
    pub stage: &'a mut dyn Stage,
    pub engine: &'a mut dyn Engine,
    pub host: &'a mut dyn Host,
}

impl Env<'_> {
    pub fn image_at(&self, point: Point) -> Option<ImageRef> {
        self.stage.image_at(point)
    }

    pub fn camera(&mut self, image: ImageRef) -> Option<&mut dyn Camera> {
        self.stage.camera(image)
    }

    pub fn listen_all(&mut self, listeners: &[Listener]) {
        for &l in listeners {
            self.host.listen(l);
        }
    }

    pub fn unlisten_all(&mut self, listeners: &[Listener]) {
        for &l in listeners {
            self.host.unlisten(l);
        }
    }
}

/// What the host should do with the native event after a handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Let the browser's default action and propagation happen.
    Ignored,
    /// Call `preventDefault` and `stopPropagation`.
    Consumed,
}

impl Outcome {
    pub fn consumed(self) -> bool {
        self == Outcome::Consumed
    }

    pub fn or(self, other: Outcome) -> Outcome {
        if self.consumed() || other.consumed() {
            Outcome::Consumed
        } else {
            Outcome::Ignored
        }
    }
}

/// Flags for a forced stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StopOptions {
    /// Skip the engine's end-of-gesture notification (no kinetic coasting).
    pub no_coast: bool,
    /// Skip the outward end notification.
    pub no_emit: bool,
}

impl StopOptions {
    /// A peer takes over the gesture: neither coast nor notify.
    pub const HANDOFF: StopOptions = StopOptions {
        no_coast: true,
        no_emit: true,
    };
}

/// End of a gesture as seen by a peer handler.
///
/// Stopping a modality that is not active must have no effect.
pub trait GestureStop {
    fn stop(&mut self, env: &mut Env<'_>, time_stamp: Option<f64>, opts: StopOptions);
    fn active(&self, env: &Env<'_>) -> bool;
}
