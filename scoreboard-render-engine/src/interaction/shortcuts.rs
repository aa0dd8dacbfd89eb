use bevy::prelude::*;

use super::host_commands::{CommandSource, HostCommand, HostCommandEvent};

/// Keyboard shortcuts (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: EventWriter<HostCommandEvent>,
) {
    let bindings = [
        (KeyCode::KeyR, HostCommand::ResetCamera),
        (KeyCode::Space, HostCommand::ToggleAutoRotate),
        (KeyCode::KeyP, HostCommand::TogglePanels),
        (KeyCode::KeyF, HostCommand::ToggleFullscreen),
        (KeyCode::KeyT, HostCommand::TestSolve(None)),
        (KeyCode::Escape, HostCommand::ExitFullscreen),
    ];

    for (key, command) in bindings {
        if keyboard.just_pressed(key) {
            commands.write(HostCommandEvent {
                command,
                source: CommandSource::Keyboard,
            });
        }
    }
}

/// The host page owns the keyboard in WASM builds.
#[cfg(target_arch = "wasm32")]
pub fn handle_keyboard_shortcuts() {}
