use frontend::app::App;
use yew::Renderer;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::log_1(&format!("logger unavailable: {err}").into());
    }

    log::info!("starting VisaDesk client");

    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body());
    match body {
        Some(root) => {
            Renderer::<App>::with_root(root.into()).render();
        }
        None => log::error!("no document body to mount the application on"),
    }
}
