//! Recording fakes for the collaborator traits.
//!
//! Every callback can be driven directly with synthetic events and the
//! resulting camera/engine/host traffic inspected afterwards. `FakeHost` runs a
//! virtual clock so debounce windows can be stepped deterministically.

use crate::config::InputConfig;
use crate::handlers::Env;
use crate::host::{Camera, Engine, Host, Listener, Stage, Timer, TimerId};
use crate::model::{ImageRef, Point, PointerId, ViewerEvent, Viewport};
use crate::state::EventContext;
use crate::system::InputSystem;

#[derive(Clone, Debug, PartialEq)]
pub enum CameraCall {
    Pan {
        dx: f64,
        dy: f64,
        duration_ms: Option<f64>,
    },
    Zoom {
        delta: f64,
        duration_ms: f64,
        focus: Option<Point>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct RecordingCamera {
    pub calls: Vec<CameraCall>,
    pub zoomed_out: bool,
}

impl RecordingCamera {
    pub fn pans(&self) -> Vec<(f64, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CameraCall::Pan { dx, dy, .. } => Some((*dx, *dy)),
                _ => None,
            })
            .collect()
    }

    pub fn zooms(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                CameraCall::Zoom { delta, .. } => Some(*delta),
                _ => None,
            })
            .collect()
    }
}

impl Camera for RecordingCamera {
    fn pan(&mut self, dx: f64, dy: f64, duration_ms: Option<f64>) {
        self.calls.push(CameraCall::Pan {
            dx,
            dy,
            duration_ms,
        });
    }

    fn zoom(&mut self, delta: f64, duration_ms: f64, focus: Option<Point>) {
        self.calls.push(CameraCall::Zoom {
            delta,
            duration_ms,
            focus,
        });
    }

    fn is_zoomed_out(&self) -> bool {
        self.zoomed_out
    }
}

/// An image laid out on the fake stage.
#[derive(Clone, Debug)]
pub struct FakeImage {
    pub image: ImageRef,
    /// x, y, width, height in screen coordinates.
    pub rect: (f64, f64, f64, f64),
    pub offset: Point,
    pub camera: RecordingCamera,
}

impl FakeImage {
    fn contains(&self, p: Point) -> bool {
        let (x, y, w, h) = self.rect;
        p.x >= x && p.x < x + w && p.y >= y && p.y < y + h
    }
}

#[derive(Clone, Debug)]
pub struct FakeStage {
    pub images: Vec<FakeImage>,
    pub current: Option<ImageRef>,
    pub viewport: Viewport,
    pub omni: bool,
}

impl Default for FakeStage {
    /// One image filling an 800x600 viewport.
    fn default() -> Self {
        Self {
            images: vec![FakeImage {
                image: ImageRef(1),
                rect: (0.0, 0.0, 800.0, 600.0),
                offset: Point::ZERO,
                camera: RecordingCamera::default(),
            }],
            current: Some(ImageRef(1)),
            viewport: Viewport::default(),
            omni: false,
        }
    }
}

impl FakeStage {
    /// Two side-by-side images; the right one is a secondary view offset by its left edge.
    pub fn split() -> Self {
        Self {
            images: vec![
                FakeImage {
                    image: ImageRef(1),
                    rect: (0.0, 0.0, 400.0, 600.0),
                    offset: Point::ZERO,
                    camera: RecordingCamera::default(),
                },
                FakeImage {
                    image: ImageRef(2),
                    rect: (400.0, 0.0, 400.0, 600.0),
                    offset: Point::new(400.0, 0.0),
                    camera: RecordingCamera::default(),
                },
            ],
            ..Self::default()
        }
    }

    pub fn camera_of(&self, image: ImageRef) -> &RecordingCamera {
        &self
            .images
            .iter()
            .find(|i| i.image == image)
            .expect("unknown image")
            .camera
    }

    pub fn main_camera(&self) -> &RecordingCamera {
        &self.images[0].camera
    }

    pub fn set_zoomed_out(&mut self, zoomed_out: bool) {
        for img in &mut self.images {
            img.camera.zoomed_out = zoomed_out;
        }
    }
}

impl Stage for FakeStage {
    fn image_at(&self, point: Point) -> Option<ImageRef> {
        self.images.iter().find(|i| i.contains(point)).map(|i| i.image)
    }

    fn current_image(&self) -> Option<ImageRef> {
        self.current
    }

    fn camera(&mut self, image: ImageRef) -> Option<&mut dyn Camera> {
        self.images
            .iter_mut()
            .find(|i| i.image == image)
            .map(|i| &mut i.camera as &mut dyn Camera)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn view_offset(&self, image: ImageRef) -> Point {
        self.images
            .iter()
            .find(|i| i.image == image)
            .map(|i| i.offset)
            .unwrap_or(Point::ZERO)
    }

    fn omni_active(&self) -> bool {
        self.omni
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    PanStart(ImageRef),
    PanStop(ImageRef),
    PinchStart(ImageRef),
    PinchUpdate(ImageRef, Point, Point),
    PinchStop(ImageRef, f64),
    Render,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingEngine {
    pub calls: Vec<EngineCall>,
}

impl RecordingEngine {
    /// Calls other than `Render`.
    pub fn lifecycle(&self) -> Vec<EngineCall> {
        self.calls
            .iter()
            .filter(|c| **c != EngineCall::Render)
            .cloned()
            .collect()
    }
}

impl Engine for RecordingEngine {
    fn pan_start(&mut self, image: ImageRef) {
        self.calls.push(EngineCall::PanStart(image));
    }

    fn pan_stop(&mut self, image: ImageRef) {
        self.calls.push(EngineCall::PanStop(image));
    }

    fn pinch_start(&mut self, image: ImageRef) {
        self.calls.push(EngineCall::PinchStart(image));
    }

    fn pinch_update(&mut self, image: ImageRef, a: Point, b: Point) {
        self.calls.push(EngineCall::PinchUpdate(image, a, b));
    }

    fn pinch_stop(&mut self, image: ImageRef, time_ms: f64) {
        self.calls.push(EngineCall::PinchStop(image, time_ms));
    }

    fn render(&mut self) {
        self.calls.push(EngineCall::Render);
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeHost {
    pub listeners: Vec<Listener>,
    /// Listens for a listener already attached, or unlistens for one that is not.
    pub unbalanced: Vec<Listener>,
    pub captured: Option<PointerId>,
    pub capture_count: usize,
    pub emitted: Vec<ViewerEvent>,
    pub now: f64,
    timers: Vec<(TimerId, Timer, f64)>,
    next_timer: u32,
}

impl FakeHost {
    pub fn listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn emitted_names(&self) -> Vec<&'static str> {
        self.emitted.iter().map(|e| e.name()).collect()
    }

    /// Emitted notifications other than coalesced updates.
    pub fn lifecycle(&self) -> Vec<ViewerEvent> {
        self.emitted
            .iter()
            .filter(|e| !matches!(e, ViewerEvent::Update { .. }))
            .cloned()
            .collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.timers.iter().any(|(_, t, _)| *t == timer)
    }

    /// Remove the earliest timer due at or before `until`, moving the clock to it.
    pub fn pop_due(&mut self, until: f64) -> Option<Timer> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (_, _, due))| *due <= until)
            .min_by(|(_, a), (_, b)| a.2.total_cmp(&b.2).then(a.0.0.cmp(&b.0.0)))
            .map(|(i, _)| i)?;
        let (_, timer, due) = self.timers.remove(idx);
        self.now = self.now.max(due);
        Some(timer)
    }

    /// Move the clock forward and return every timer that came due, in order.
    pub fn advance(&mut self, ms: f64) -> Vec<Timer> {
        let until = self.now + ms;
        let mut fired = Vec::new();
        while let Some(t) = self.pop_due(until) {
            fired.push(t);
        }
        self.now = until;
        fired
    }
}

impl Host for FakeHost {
    fn listen(&mut self, listener: Listener) {
        if self.listeners.contains(&listener) {
            self.unbalanced.push(listener);
        }
        self.listeners.push(listener);
    }

    fn unlisten(&mut self, listener: Listener) {
        match self.listeners.iter().position(|l| *l == listener) {
            Some(i) => {
                self.listeners.remove(i);
            }
            None => self.unbalanced.push(listener),
        }
    }

    fn capture_pointer(&mut self, id: PointerId) {
        self.captured = Some(id);
        self.capture_count += 1;
    }

    fn release_pointer(&mut self, id: PointerId) {
        if self.captured == Some(id) {
            self.captured = None;
        }
    }

    fn emit(&mut self, event: ViewerEvent) {
        self.emitted.push(event);
    }

    fn set_timeout(&mut self, timer: Timer, delay_ms: u32) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push((id, timer, self.now + delay_ms as f64));
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|(t, _, _)| *t != id);
    }
}

/// Context plus fakes, for driving a single handler without the coordinator.
pub struct Harness {
    pub ctx: EventContext,
    pub stage: FakeStage,
    pub engine: RecordingEngine,
    pub host: FakeHost,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl Harness {
    pub fn new(config: InputConfig) -> Self {
        Self {
            ctx: EventContext::new(config),
            stage: FakeStage::default(),
            engine: RecordingEngine::default(),
            host: FakeHost::default(),
        }
    }

    pub fn env(&mut self) -> Env<'_> {
        Env {
            ctx: &mut self.ctx,
            stage: &mut self.stage,
            engine: &mut self.engine,
            host: &mut self.host,
        }
    }
}

pub type FakeSystem = InputSystem<FakeStage, RecordingEngine, FakeHost>;

/// A hooked input system on the default fakes.
pub fn fake_system(config: InputConfig) -> FakeSystem {
    let mut sys = InputSystem::new(
        config,
        FakeStage::default(),
        RecordingEngine::default(),
        FakeHost::default(),
    );
    sys.hook();
    sys
}

/// Step the virtual clock by `ms`, firing due timers into the system as it goes.
pub fn advance(sys: &mut FakeSystem, ms: f64) {
    let until = sys.host().now + ms;
    while let Some(timer) = sys.host_mut().pop_due(until) {
        sys.on_timer(timer);
    }
    sys.host_mut().now = until;
}
