use bevy::prelude::*;
use bevy::window::PresentMode;

use super::lifecycle::RenderTargets;

pub fn create_window_config(targets: &RenderTargets) -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "Scoreboard".into(),
            canvas: Some(format!("#{}", targets.canvas_id)),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = targets;
        Window {
            title: "Scoreboard".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
