mod components;
mod scene;

use components::app::App;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
        console_error_panic_hook::set_once();
    }
    log::info!("deep-zoom gesture demo starting");
    yew::Renderer::<App>::new().render();
}
