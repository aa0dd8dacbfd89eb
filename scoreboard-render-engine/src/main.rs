mod constants;
mod data;
mod engine;
mod interaction;
mod rpc;

use crate::engine::core::lifecycle::{EngineHandle, RenderTargets};

fn main() {
    let engine = match EngineHandle::initialize(&RenderTargets::default()) {
        Ok(engine) => engine,
        Err(error) => {
            report_init_error(&error);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            engine.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        engine.run();
    }
}

/// No logger exists before the app is built, so report directly.
fn report_init_error(error: &engine::core::lifecycle::InitError) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&format!("Scoreboard engine failed to start: {error}").into());

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("Scoreboard engine failed to start: {error}");
}
