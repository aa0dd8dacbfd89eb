use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::data::DataSyncPlugin;
use crate::engine::camera::orbit_camera::{
    OrbitCamera, ViewportSize, camera_controller, spawn_orbit_camera, track_viewport_size,
};
use crate::engine::core::app_state::{
    AppState, LoadingProgress, report_loading_finished, transition_to_running,
};
use crate::engine::core::config::{ConfigLoader, EngineConfig, load_config_system, start_loading};
use crate::engine::core::lifecycle::{
    DisposeRequest, EngineLifecycle, RenderTargets, process_dispose_requests,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::effects::SolveEffectsPlugin;
use crate::engine::nodes::NodeScenePlugin;
use crate::engine::scene::ambient_particles::spawn_ambient_field;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::spin::spin_scene_elements;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::interaction::InteractionPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app(targets: &RenderTargets) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins(targets))
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers EngineConfig as a loadable asset type from *.config.json files.
        .add_plugins(JsonAssetPlugin::<EngineConfig>::new(&["config.json"]))
        .add_plugins(WebRpcPlugin);

    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<EngineLifecycle>()
        .init_resource::<OrbitCamera>()
        .init_resource::<ViewportSize>()
        .add_event::<DisposeRequest>();

    app.add_plugins((
        DataSyncPlugin,
        NodeScenePlugin,
        SolveEffectsPlugin,
        InteractionPlugin,
    ));

    app.add_systems(
        Startup,
        (
            start_loading,
            spawn_orbit_camera,
            spawn_lighting,
            spawn_ambient_field,
        ),
    )
    .add_systems(
        Update,
        (load_config_system, transition_to_running)
            .chain()
            .run_if(in_state(AppState::Loading)),
    );

    let runtime_systems = (
        camera_controller,
        track_viewport_size,
        spin_scene_elements,
        report_loading_finished,
        fps_notification_system,
    );
    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    // FPS overlay only for native builds; the host page draws its own.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_fps_overlay).add_systems(
            Update,
            fps_text_update_system.run_if(in_state(AppState::Running)),
        );
    }

    app.add_systems(Last, process_dispose_requests);

    app
}

fn create_default_plugins(targets: &RenderTargets) -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config(targets)),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "wgpu=error,naga=warn".to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
