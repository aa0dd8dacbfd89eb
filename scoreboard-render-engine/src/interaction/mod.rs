pub mod banner;
pub mod fullscreen;
pub mod host_commands;
pub mod info_panel;
pub mod picking;
pub mod ray;
pub mod shortcuts;
pub mod side_panels;
pub mod spinner;

use bevy::prelude::*;

use crate::data::mutations::apply_scene_mutations;
use crate::engine::core::app_state::AppState;
use banner::{spawn_banner, update_banner, SolveBanner};
use fullscreen::{
    apply_fullscreen_requests, follow_window_mode, FullscreenRequest, FullscreenState,
};
use host_commands::{handle_host_commands, HostCommandEvent};
use info_panel::{spawn_info_panel, update_info_panel, InfoPanel};
use picking::pick_challenge_on_click;
use shortcuts::handle_keyboard_shortcuts;
use side_panels::{
    refresh_activity_feed, refresh_leaderboard, reveal_side_panels, slide_side_panels,
    spawn_side_panels, PanelState,
};
use spinner::{animate_loading_spinner, hide_loading_spinner, spawn_loading_spinner};

/// Overlay UI plus every path by which the user or the host page drives the
/// engine: keyboard, pointer, and host commands.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SolveBanner>()
            .init_resource::<InfoPanel>()
            .init_resource::<PanelState>()
            .init_resource::<FullscreenState>()
            .add_event::<HostCommandEvent>()
            .add_event::<FullscreenRequest>()
            .add_systems(
                Startup,
                (
                    spawn_side_panels,
                    spawn_info_panel,
                    spawn_banner,
                    spawn_loading_spinner,
                ),
            )
            .add_systems(
                Update,
                (
                    handle_keyboard_shortcuts,
                    handle_host_commands,
                    apply_fullscreen_requests,
                    follow_window_mode,
                )
                    .chain()
                    .before(apply_scene_mutations)
                    .run_if(not(in_state(AppState::Disposed))),
            )
            .add_systems(
                Update,
                (animate_loading_spinner, hide_loading_spinner)
                    .chain()
                    .run_if(not(in_state(AppState::Disposed))),
            )
            .add_systems(
                Update,
                (
                    pick_challenge_on_click,
                    update_info_panel,
                    update_banner,
                    reveal_side_panels,
                    slide_side_panels,
                    refresh_leaderboard,
                    refresh_activity_feed,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
