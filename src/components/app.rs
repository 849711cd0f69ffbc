use super::event_log::{EventLog, EventLogState, LogAction};
use super::settings_modal::{InputToggle, SettingsModal};
use super::viewer::Viewer;
use yew::prelude::*;
use yew_deepzoom_gestures::web::{config_from_element, detect_platform};
use yew_deepzoom_gestures::{InputConfig, ViewerEvent};

const CONFIG_KEY: &str = "dz_input_config";

fn load_config() -> Option<InputConfig> {
    let store = web_sys::window()?.local_storage().ok()??;
    let raw = store.get_item(CONFIG_KEY).ok()??;
    match InputConfig::from_json(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("ignoring stored input config: {err}");
            None
        }
    }
}

fn save_config(config: &InputConfig) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            match serde_json::to_string(config) {
                Ok(s) => {
                    if let Err(err) = store.set_item(CONFIG_KEY, &s) {
                        log::warn!("saving input config: {err:?}");
                    }
                }
                Err(err) => log::warn!("serializing input config: {err}"),
            }
        }
    }
}

/// Stored settings win over `data-*` attributes on `<body>`; the platform is always detected.
fn initial_config() -> InputConfig {
    let window = web_sys::window();
    let from_body = || {
        let body = window.as_ref()?.document()?.body()?;
        config_from_element(&body)
            .map_err(|err| log::warn!("body attributes: {err}"))
            .ok()
    };
    let mut config = load_config().or_else(from_body).unwrap_or_default();
    if let Some(window) = &window {
        config.platform = detect_platform(window);
    }
    config
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_state(initial_config);
    let enabled = use_state(|| true);
    let show_settings = use_state(|| false);
    let log = use_reducer(EventLogState::default);

    // Persist config changes
    {
        use_effect_with(*config, move |config| {
            save_config(config);
            || ()
        });
    }

    // The viewer keeps the first callback it sees, so only the dispatcher is captured.
    let on_event = {
        let dispatch = log.dispatcher();
        Callback::from(move |event: ViewerEvent| dispatch.dispatch(LogAction::Push(event)))
    };
    let on_clear = {
        let dispatch = log.dispatcher();
        Callback::from(move |_| dispatch.dispatch(LogAction::Clear))
    };
    let on_toggle = {
        let config = config.clone();
        Callback::from(move |toggle: InputToggle| {
            let mut next = *config;
            toggle.flip(&mut next);
            config.set(next);
        })
    };
    let on_toggle_enabled = {
        let enabled = enabled.clone();
        Callback::from(move |_| enabled.set(!*enabled))
    };
    let open_settings = {
        let show = show_settings.clone();
        Callback::from(move |_| show.set(true))
    };
    let close_settings = {
        let show = show_settings.clone();
        Callback::from(move |_| show.set(false))
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; background:#0d1117; color:#c9d1d9; font-family:sans-serif;">
            <Viewer config={*config} enabled={*enabled} {on_event} />
            <EventLog entries={log.entries.clone()} {on_clear} />
            <button onclick={open_settings} style="position:absolute; top:12px; right:12px;">{"⚙ Settings"}</button>
            <SettingsModal
                show={*show_settings}
                on_close={close_settings}
                config={*config}
                {on_toggle}
                enabled={*enabled}
                {on_toggle_enabled}
            />
        </div>
    }
}
