use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
    Disposed,
}

#[derive(Component)]
pub struct FpsText;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub challenges_answered: bool,
    pub scoreboard_answered: bool,
    pub loading_reported: bool,
}

impl LoadingProgress {
    /// Both lists have answered at least once, successfully or not.
    pub fn first_poll_done(&self) -> bool {
        self.challenges_answered && self.scoreboard_answered
    }
}

pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.config_loaded {
        info!("→ Configuration ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

/// Tell the host page once the first poll cycle has answered.
pub fn report_loading_finished(
    mut loading_progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if loading_progress.loading_reported || !loading_progress.first_poll_done() {
        return;
    }
    loading_progress.loading_reported = true;
    rpc_interface.send_notification("loading_finished", serde_json::json!({}));
}
