// Demo scene: one large tiled image behind a pan/zoom camera. Implements the
// collaborator traits the input system drives.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew_deepzoom_gestures::host::{Camera, Engine, Stage};
use yew_deepzoom_gestures::model::{ImageRef, Point, Viewport};
use yew_deepzoom_gestures::util::{distance, midpoint};

pub const TILE_PX: f64 = 32.0;
pub const IMAGE_TILES: u32 = 48;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 5.0;

/// Per-frame velocity retention while coasting.
const FRICTION: f64 = 0.92;
/// Coasting stops below this speed (px/ms).
const MIN_SPEED: f64 = 0.01;

pub const IMAGE: ImageRef = ImageRef(0);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tween {
    Pan { dx: f64, dy: f64 },
    Zoom { factor_ln: f64, focus: Point },
}

#[derive(Debug, Clone, PartialEq)]
struct Animation {
    tween: Tween,
    remaining_ms: f64,
}

#[derive(Debug, Clone)]
pub struct SceneCamera {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub viewport: Viewport,
    animations: Vec<Animation>,
    /// Screen delta applied by pans since the last frame.
    frame_pan: (f64, f64),
    velocity: (f64, f64),
    coasting: bool,
    pinch: Option<PinchAnchor>,
}

#[derive(Debug, Clone, Copy)]
struct PinchAnchor {
    zoom: f64,
    dist: f64,
    mid: Point,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            viewport: Viewport::default(),
            animations: Vec::new(),
            frame_pan: (0.0, 0.0),
            velocity: (0.0, 0.0),
            coasting: false,
            pinch: None,
        }
    }
}

impl SceneCamera {
    pub fn scale_px(&self) -> f64 {
        self.zoom * TILE_PX
    }

    /// Zoom so the whole image fits and center it.
    pub fn fit(&mut self) {
        let size = IMAGE_TILES as f64 * TILE_PX;
        let fit = (self.viewport.width / size).min(self.viewport.height / size);
        self.zoom = fit.clamp(MIN_ZOOM, MAX_ZOOM);
        let scale = self.scale_px();
        self.offset_x = (self.viewport.width - IMAGE_TILES as f64 * scale) * 0.5;
        self.offset_y = (self.viewport.height - IMAGE_TILES as f64 * scale) * 0.5;
        self.animations.clear();
        self.coasting = false;
    }

    /// Image rectangle on screen: x, y, width, height.
    pub fn image_rect(&self) -> (f64, f64, f64, f64) {
        let side = IMAGE_TILES as f64 * self.scale_px();
        (self.offset_x, self.offset_y, side, side)
    }

    pub fn contains(&self, p: Point) -> bool {
        let (x, y, w, h) = self.image_rect();
        p.x >= x && p.x < x + w && p.y >= y && p.y < y + h
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset_x -= dx;
        self.offset_y -= dy;
    }

    /// Keep the image point under `focus` fixed while zooming by `factor`.
    fn zoom_about(&mut self, focus: Point, factor: f64) {
        let old_scale = self.scale_px();
        let world_x = (focus.x - self.offset_x) / old_scale;
        let world_y = (focus.y - self.offset_y) / old_scale;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let new_scale = self.scale_px();
        self.offset_x = focus.x - world_x * new_scale;
        self.offset_y = focus.y - world_y * new_scale;
    }

    fn center(&self) -> Point {
        Point::new(self.viewport.width * 0.5, self.viewport.height * 0.5)
    }

    /// Advance animations and coasting by `dt_ms`. Returns true while anything moved.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        let mut moved = false;
        if dt_ms > 0.0 && self.pinch.is_none() && !self.coasting {
            let (fx, fy) = self.frame_pan;
            self.velocity = (fx / dt_ms, fy / dt_ms);
        }
        self.frame_pan = (0.0, 0.0);

        let mut animations = std::mem::take(&mut self.animations);
        for anim in &mut animations {
            let step = (dt_ms / anim.remaining_ms).min(1.0);
            match &mut anim.tween {
                Tween::Pan { dx, dy } => {
                    let (sx, sy) = (*dx * step, *dy * step);
                    self.translate(sx, sy);
                    *dx -= sx;
                    *dy -= sy;
                }
                Tween::Zoom { factor_ln, focus } => {
                    let part = *factor_ln * step;
                    self.zoom_about(*focus, part.exp());
                    *factor_ln -= part;
                }
            }
            anim.remaining_ms -= dt_ms;
            moved = true;
        }
        animations.retain(|a| a.remaining_ms > 0.0);
        self.animations = animations;

        if self.coasting {
            let (vx, vy) = self.velocity;
            if vx.hypot(vy) < MIN_SPEED {
                self.coasting = false;
            } else {
                self.translate(vx * dt_ms, vy * dt_ms);
                self.velocity = (vx * FRICTION, vy * FRICTION);
                moved = true;
            }
        }
        moved
    }

    pub fn is_animating(&self) -> bool {
        self.coasting || !self.animations.is_empty()
    }
}

impl Camera for SceneCamera {
    fn pan(&mut self, dx: f64, dy: f64, duration_ms: Option<f64>) {
        match duration_ms {
            Some(ms) if ms > 0.0 => self.animations.push(Animation {
                tween: Tween::Pan { dx, dy },
                remaining_ms: ms,
            }),
            _ => {
                self.translate(dx, dy);
                self.frame_pan.0 += dx;
                self.frame_pan.1 += dy;
            }
        }
    }

    fn zoom(&mut self, delta: f64, duration_ms: f64, focus: Option<Point>) {
        let focus = focus.unwrap_or_else(|| self.center());
        let factor = (-delta * 0.001).exp();
        if duration_ms > 0.0 {
            self.animations.push(Animation {
                tween: Tween::Zoom {
                    factor_ln: factor.ln(),
                    focus,
                },
                remaining_ms: duration_ms,
            });
        } else {
            self.zoom_about(focus, factor);
        }
    }

    fn is_zoomed_out(&self) -> bool {
        self.zoom <= MIN_ZOOM + f64::EPSILON
    }
}

/// Camera handle shared by the stage and the engine.
#[derive(Clone, Default)]
pub struct SharedCamera(pub Rc<RefCell<SceneCamera>>);

impl Camera for SharedCamera {
    fn pan(&mut self, dx: f64, dy: f64, duration_ms: Option<f64>) {
        self.0.borrow_mut().pan(dx, dy, duration_ms);
    }

    fn zoom(&mut self, delta: f64, duration_ms: f64, focus: Option<Point>) {
        self.0.borrow_mut().zoom(delta, duration_ms, focus);
    }

    fn is_zoomed_out(&self) -> bool {
        self.0.borrow().is_zoomed_out()
    }
}

pub struct SceneStage {
    camera: SharedCamera,
}

impl SceneStage {
    pub fn new(camera: SharedCamera) -> Self {
        Self { camera }
    }
}

impl Stage for SceneStage {
    fn image_at(&self, point: Point) -> Option<ImageRef> {
        self.camera.0.borrow().contains(point).then_some(IMAGE)
    }

    fn current_image(&self) -> Option<ImageRef> {
        Some(IMAGE)
    }

    fn camera(&mut self, image: ImageRef) -> Option<&mut dyn Camera> {
        (image == IMAGE).then_some(&mut self.camera as &mut dyn Camera)
    }

    fn viewport(&self) -> Viewport {
        self.camera.0.borrow().viewport
    }
}

/// Drives coasting and pinch zoom; marks the frame dirty on `render`.
pub struct SceneEngine {
    camera: SharedCamera,
    dirty: Rc<Cell<bool>>,
}

impl SceneEngine {
    pub fn new(camera: SharedCamera, dirty: Rc<Cell<bool>>) -> Self {
        Self { camera, dirty }
    }
}

impl Engine for SceneEngine {
    fn pan_start(&mut self, _image: ImageRef) {
        let mut cam = self.camera.0.borrow_mut();
        cam.coasting = false;
        cam.velocity = (0.0, 0.0);
    }

    fn pan_stop(&mut self, _image: ImageRef) {
        self.camera.0.borrow_mut().coasting = true;
        self.dirty.set(true);
    }

    fn pinch_start(&mut self, _image: ImageRef) {
        let mut cam = self.camera.0.borrow_mut();
        cam.coasting = false;
        cam.pinch = None;
    }

    fn pinch_update(&mut self, _image: ImageRef, a: Point, b: Point) {
        let mut cam = self.camera.0.borrow_mut();
        let (dist, mid) = (distance(a, b), midpoint(a, b));
        let Some(anchor) = cam.pinch else {
            cam.pinch = Some(PinchAnchor {
                zoom: cam.zoom,
                dist,
                mid,
            });
            return;
        };
        let target = anchor.zoom * dist / anchor.dist.max(1.0);
        let factor = target / cam.zoom;
        cam.zoom_about(mid, factor);
        let prev_mid = anchor.mid;
        cam.translate(prev_mid.x - mid.x, prev_mid.y - mid.y);
        cam.pinch = Some(PinchAnchor { mid, ..anchor });
        self.dirty.set(true);
    }

    fn pinch_stop(&mut self, _image: ImageRef, _time_ms: f64) {
        self.camera.0.borrow_mut().pinch = None;
        self.dirty.set(true);
    }

    fn render(&mut self) {
        self.dirty.set(true);
    }
}

/// Paint the checkerboard image through the camera transform.
pub fn draw(canvas: &HtmlCanvasElement, cam: &SceneCamera) {
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    let scale_px = cam.scale_px();
    let n = IMAGE_TILES as f64;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str("#0e1116");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_transform(scale_px, 0.0, 0.0, scale_px, cam.offset_x, cam.offset_y)
        .ok();
    for y in 0..IMAGE_TILES {
        for x in 0..IMAGE_TILES {
            let fill = match ((x / 8 + y / 8) % 2, (x + y) % 2) {
                (0, 0) => "#1d2430",
                (0, _) => "#203a5a",
                (_, 0) => "#4d3b1f",
                _ => "#161b22",
            };
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(x as f64, y as f64, 1.0, 1.0);
        }
    }
    ctx.set_stroke_style_str("#2f3641");
    ctx.set_line_width((1.0f64 / scale_px).max(0.001f64));
    ctx.stroke_rect(0.0, 0.0, n, n);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> SceneCamera {
        let mut cam = SceneCamera::default();
        cam.fit();
        cam
    }

    #[test]
    fn fit_centers_the_image() {
        let cam = camera();
        let (x, y, w, h) = cam.image_rect();
        assert!((x + w / 2.0 - 400.0).abs() < 1e-9);
        assert!((y + h / 2.0 - 300.0).abs() < 1e-9);
        assert!(cam.contains(Point::new(400.0, 300.0)));
    }

    #[test]
    fn zoom_keeps_focus_fixed() {
        let mut cam = camera();
        let focus = Point::new(350.0, 280.0);
        let before = (
            (focus.x - cam.offset_x) / cam.scale_px(),
            (focus.y - cam.offset_y) / cam.scale_px(),
        );
        cam.zoom(-200.0, 0.0, Some(focus));
        let after = (
            (focus.x - cam.offset_x) / cam.scale_px(),
            (focus.y - cam.offset_y) / cam.scale_px(),
        );
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = camera();
        cam.zoom(100_000.0, 0.0, None);
        assert!(cam.is_zoomed_out());
        cam.zoom(-100_000.0, 0.0, None);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn animated_pan_lands_on_target() {
        let mut cam = camera();
        let start = cam.offset_x;
        cam.pan(100.0, 0.0, Some(250.0));
        while cam.tick(16.0) {}
        assert!((cam.offset_x - (start - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn coasting_decays() {
        let mut cam = camera();
        cam.pan(32.0, 0.0, None);
        cam.tick(16.0);
        cam.coasting = true;
        let mut frames = 0;
        while cam.tick(16.0) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(!cam.is_animating());
    }
}
