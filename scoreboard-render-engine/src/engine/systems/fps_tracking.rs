use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::rpc::web_rpc::{WebRpcInterface, current_fps};

pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;

/// Push the frame rate to the host page twice a second.
pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL_SECS {
        return;
    }
    if diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS).is_none() {
        return;
    }

    rpc_interface.send_notification(
        "fps_update",
        serde_json::json!({ "fps": current_fps(Some(&diagnostics)) }),
    );
    *last_send_time = current_time;
}

/// Native overlay in the top-left corner.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_fps_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("FPS overlay"),
        FpsText,
        Text::new("FPS: --"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
        crate::engine::core::lifecycle::SceneOwned,
    ));
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}
