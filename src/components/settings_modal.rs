use yew::prelude::*;
use yew_deepzoom_gestures::InputConfig;

/// Which input option a checkbox flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputToggle {
    TwoFingerPan,
    ZoomRequiresModifier,
    Touch,
    PointerPinch,
    Keyboard,
    DoubleTap,
}

impl InputToggle {
    pub const ALL: [InputToggle; 6] = [
        InputToggle::TwoFingerPan,
        InputToggle::ZoomRequiresModifier,
        InputToggle::Touch,
        InputToggle::PointerPinch,
        InputToggle::Keyboard,
        InputToggle::DoubleTap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputToggle::TwoFingerPan => "Two-finger pan",
            InputToggle::ZoomRequiresModifier => "Wheel zoom needs Ctrl/Cmd",
            InputToggle::Touch => "Touch input",
            InputToggle::PointerPinch => "Pinch from pointer events",
            InputToggle::Keyboard => "Keyboard navigation",
            InputToggle::DoubleTap => "Double tap / double click zoom",
        }
    }

    pub fn get(self, config: &InputConfig) -> bool {
        match self {
            InputToggle::TwoFingerPan => config.two_finger_pan,
            InputToggle::ZoomRequiresModifier => config.zoom_requires_modifier,
            InputToggle::Touch => config.touch_supported,
            InputToggle::PointerPinch => config.pointer_pinch,
            InputToggle::Keyboard => config.keyboard,
            InputToggle::DoubleTap => config.double_tap,
        }
    }

    pub fn flip(self, config: &mut InputConfig) {
        let flag = match self {
            InputToggle::TwoFingerPan => &mut config.two_finger_pan,
            InputToggle::ZoomRequiresModifier => &mut config.zoom_requires_modifier,
            InputToggle::Touch => &mut config.touch_supported,
            InputToggle::PointerPinch => &mut config.pointer_pinch,
            InputToggle::Keyboard => &mut config.keyboard,
            InputToggle::DoubleTap => &mut config.double_tap,
        };
        *flag = !*flag;
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
    pub config: InputConfig,
    pub on_toggle: Callback<InputToggle>,
    pub enabled: bool,
    pub on_toggle_enabled: Callback<()>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let enabled_cb = {
        let cb = props.on_toggle_enabled.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let rows = InputToggle::ALL.iter().map(|&toggle| {
        let cb = props.on_toggle.clone();
        let onclick = Callback::from(move |_| cb.emit(toggle));
        html! {
            <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                <input type="checkbox" checked={toggle.get(&props.config)} {onclick} />
                <span>{ toggle.label() }</span>
            </label>
        }
    });
    let platform = props.config.platform;

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Input settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                    <input type="checkbox" checked={props.enabled} onclick={enabled_cb} />
                    <span>{"Interaction enabled"}</span>
                </label>
                { for rows }
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">
                { format!(
                    "Detected: native gestures {}, wheel always zooms {}, amplified wheel {}.",
                    platform.native_gestures, platform.wheel_always_zooms, platform.amplify_wheel,
                ) }
            </div>
            <div style="display:flex; gap:8px; justify-content:flex-end;">
                <button onclick={close_cb} style="flex:0 0 auto;">{"Done"}</button>
            </div>
        </div>
    </div>}
}
