use yew::prelude::*;
use yew_deepzoom_gestures::host::Camera;

use crate::scene::SharedCamera;

/// Screen pixels moved by one pan button press.
pub const PAN_STEP: f64 = 160.0;
/// Zoom delta of one button press; negative zooms in.
pub const ZOOM_STEP: f64 = 300.0;
pub const STEP_DURATION_MS: f64 = 250.0;

/// A camera command issued from the on-screen buttons. These go straight to the
/// camera and never pass through the gesture layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraAction {
    ZoomIn,
    ZoomOut,
    Pan { dx: f64, dy: f64 },
    Fit,
}

impl CameraAction {
    pub fn apply(self, camera: &mut SharedCamera) {
        match self {
            CameraAction::ZoomIn => camera.zoom(-ZOOM_STEP, STEP_DURATION_MS, None),
            CameraAction::ZoomOut => camera.zoom(ZOOM_STEP, STEP_DURATION_MS, None),
            CameraAction::Pan { dx, dy } => camera.pan(dx, dy, Some(STEP_DURATION_MS)),
            CameraAction::Fit => camera.0.borrow_mut().fit(),
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_action: Callback<CameraAction>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let button = |action: CameraAction, label: &'static str, title: &'static str, area: &'static str| {
        let cb = props.on_action.clone();
        let onclick = Callback::from(move |_: MouseEvent| cb.emit(action));
        html! {
            <button {onclick} {title} style={format!("grid-area:{area}; min-width:32px;")}>{ label }</button>
        }
    };
    let step = PAN_STEP;
    html! {
        <div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:grid; gap:4px; grid-template-areas:'zi up fit' 'left zo right' '. down .';">
            { button(CameraAction::ZoomIn, "+", "Zoom in", "zi") }
            { button(CameraAction::ZoomOut, "-", "Zoom out", "zo") }
            { button(CameraAction::Pan { dx: 0.0, dy: -step }, "▲", "Pan up", "up") }
            { button(CameraAction::Pan { dx: -step, dy: 0.0 }, "◀", "Pan left", "left") }
            { button(CameraAction::Pan { dx: step, dy: 0.0 }, "▶", "Pan right", "right") }
            { button(CameraAction::Pan { dx: 0.0, dy: step }, "▼", "Pan down", "down") }
            { button(CameraAction::Fit, "⤢", "Fit image", "fit") }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_then_fit_restores_the_view() {
        let mut camera = SharedCamera::default();
        camera.0.borrow_mut().fit();
        let fitted = camera.0.borrow().zoom;

        CameraAction::ZoomIn.apply(&mut camera);
        for _ in 0..30 {
            camera.0.borrow_mut().tick(16.0);
        }
        assert!(camera.0.borrow().zoom > fitted);

        CameraAction::Fit.apply(&mut camera);
        assert_eq!(camera.0.borrow().zoom, fitted);
    }

    #[test]
    fn pan_moves_the_image_opposite_to_the_view() {
        let mut camera = SharedCamera::default();
        camera.0.borrow_mut().fit();
        let before = camera.0.borrow().offset_x;
        CameraAction::Pan { dx: PAN_STEP, dy: 0.0 }.apply(&mut camera);
        for _ in 0..30 {
            camera.0.borrow_mut().tick(16.0);
        }
        assert!((camera.0.borrow().offset_x - (before - PAN_STEP)).abs() < 1e-6);
    }
}
