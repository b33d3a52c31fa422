#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lessons_core::{App, AppConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    log::info!("Starting {} at lesson {}", config.title, config.lesson);

    let event_loop = match winit::event_loop::EventLoop::builder().build() {
        Ok(event_loop) => event_loop,
        Err(error) => {
            log::error!("Failed to create the event loop: {error}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(error) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated with an error: {error}");
        std::process::exit(1);
    }
}

// The browser build starts from `lessons_core::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
