use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;
use yew_deepzoom_gestures::web::{Sink, WebHost, detect_platform};
use yew_deepzoom_gestures::{InputConfig, InputSystem, NativeEvent, Outcome, Timer, ViewerEvent};

use super::camera_controls::{CameraAction, CameraControls};
use crate::scene::{self, SceneEngine, SceneStage, SharedCamera};

type System = InputSystem<SceneStage, SceneEngine, WebHost>;

#[derive(Properties, PartialEq, Clone)]
pub struct ViewerProps {
    pub config: InputConfig,
    pub enabled: bool,
    pub on_event: Callback<ViewerEvent>,
}

#[function_component(Viewer)]
pub fn viewer(props: &ViewerProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = use_mut_ref(SharedCamera::default);
    let dirty = use_mut_ref(|| Rc::new(Cell::new(true)));
    let system = use_mut_ref(|| None::<Rc<RefCell<System>>>);

    // Build the input system once the canvas exists; tear it down on unmount.
    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.borrow().clone();
        let dirty = dirty.borrow().clone();
        let system_slot = system.clone();
        let config = props.config;
        let on_event = props.on_event.clone();
        use_effect_with((), move |_| {
            let mut cleanup: Option<Box<dyn FnOnce()>> = None;
            if let (Some(canvas), Some(window)) = (
                canvas_ref.cast::<HtmlCanvasElement>(),
                web_sys::window(),
            ) {
                let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);
                {
                    let mut cam = camera.0.borrow_mut();
                    cam.viewport.width = width;
                    cam.viewport.height = height;
                    cam.fit();
                }

                match WebHost::new(canvas.clone().into()) {
                    Ok(mut host) => {
                        host.set_on_emit(move |ev| on_event.emit(ev.clone()));
                        let slot = host.sink_slot();
                        let config = InputConfig {
                            platform: detect_platform(&window),
                            ..config
                        };
                        let sys = Rc::new(RefCell::new(InputSystem::new(
                            config,
                            SceneStage::new(camera.clone()),
                            SceneEngine::new(camera.clone(), dirty.clone()),
                            host,
                        )));
                        let for_events = sys.clone();
                        let for_timers = sys.clone();
                        slot.set(Sink {
                            event: Rc::new(move |ev: NativeEvent| match for_events.try_borrow_mut() {
                                Ok(mut sys) => sys.dispatch(ev),
                                Err(_) => {
                                    log::warn!("event dropped while the input system was busy");
                                    Outcome::Ignored
                                }
                            }),
                            timer: Rc::new(move |timer: Timer| {
                                if let Ok(mut sys) = for_timers.try_borrow_mut() {
                                    sys.on_timer(timer);
                                }
                            }),
                        });
                        sys.borrow_mut().hook();
                        *system_slot.borrow_mut() = Some(sys.clone());

                        let raf = start_frame_loop(&window, canvas, camera.clone(), dirty.clone());
                        let system_slot = system_slot.clone();
                        cleanup = Some(Box::new(move || {
                            sys.borrow_mut().unhook();
                            slot.clear();
                            system_slot.borrow_mut().take();
                            raf.stop();
                        }));
                    }
                    Err(err) => log::error!("viewer host: {err}"),
                }
            }
            move || {
                if let Some(f) = cleanup {
                    f();
                }
            }
        });
    }

    // Live reconfiguration keeps the detected platform.
    {
        let system = system.clone();
        use_effect_with((props.config, props.enabled), move |(config, enabled)| {
            if let Some(sys) = &*system.borrow() {
                let mut sys = sys.borrow_mut();
                let platform = sys.config().platform;
                sys.reconfigure(InputConfig { platform, ..*config });
                sys.set_enabled(*enabled);
            }
            || ()
        });
    }

    let on_action = {
        let camera = camera.borrow().clone();
        let dirty = dirty.borrow().clone();
        Callback::from(move |action: CameraAction| {
            let mut camera = camera.clone();
            action.apply(&mut camera);
            dirty.set(true);
        })
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden;">
            <canvas ref={canvas_ref} style="display:block; touch-action:none;" tabindex="0" />
            <CameraControls {on_action} />
        </div>
    }
}

/// requestAnimationFrame loop that advances the camera and redraws when needed.
struct FrameLoop {
    window: web_sys::Window,
    id: Rc<Cell<Option<i32>>>,
    closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    fn stop(self) {
        if let Some(id) = self.id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancel animation frame: {err:?}");
            }
        }
        self.closure.borrow_mut().take();
    }
}

fn start_frame_loop(
    window: &web_sys::Window,
    canvas: HtmlCanvasElement,
    camera: SharedCamera,
    dirty: Rc<Cell<bool>>,
) -> FrameLoop {
    let id = Rc::new(Cell::new(None));
    let closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let last = Cell::new(None::<f64>);
    {
        let id = id.clone();
        let window = window.clone();
        let closure_loop = closure.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let dt = last.replace(Some(now)).map_or(16.0, |prev| now - prev);
            let moved = {
                let mut cam = camera.0.borrow_mut();
                cam.tick(dt) || cam.is_animating()
            };
            if moved || dirty.replace(false) {
                scene::draw(&canvas, &camera.0.borrow());
            }
            if let Some(cb) = closure_loop.borrow().as_ref() {
                id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));
    }
    if let Some(cb) = closure.borrow().as_ref() {
        id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
    FrameLoop {
        window: window.clone(),
        id,
        closure,
    }
}
