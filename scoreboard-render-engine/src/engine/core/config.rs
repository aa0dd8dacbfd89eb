use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use scoreboard_constants::timeline::DEFAULT_POLL_INTERVAL_SECS;

use super::app_state::LoadingProgress;
use crate::data::backend::{Backend, HttpBackend};
use crate::data::poller::PollSchedule;

pub const CONFIG_PATH: &str = "scoreboard.config.json";

/// Runtime settings read from `assets/scoreboard.config.json`.
#[derive(Asset, TypePath, Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix for API paths, empty for same-origin requests.
    pub backend_url: String,
    pub poll_interval_secs: f32,
    pub request_timeout_secs: f32,
    pub panels_reveal_delay_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: 10.0,
            panels_reveal_delay_secs: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f32(self.poll_interval_secs.max(1.0))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.request_timeout_secs.max(1.0))
    }
}

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<EngineConfig>>,
}

pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    config_loader.handle = Some(asset_server.load(CONFIG_PATH));
}

/// Install the config once it has loaded, or the defaults if the file is
/// missing or unreadable.
pub fn load_config_system(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    configs: Res<Assets<EngineConfig>>,
    asset_server: Res<AssetServer>,
    backend: Option<Res<Backend>>,
) {
    if loading_progress.config_loaded {
        return;
    }
    let Some(handle) = config_loader.handle.as_ref() else {
        return;
    };

    let config = if let Some(config) = configs.get(handle) {
        info!("✓ Configuration loaded");
        config.clone()
    } else if asset_server.load_state(handle).is_failed() {
        warn!("{} unavailable, using default configuration", CONFIG_PATH);
        EngineConfig::default()
    } else {
        return;
    };

    install_config(&mut commands, config, backend.is_some());
    loading_progress.config_loaded = true;
}

pub fn install_config(commands: &mut Commands, config: EngineConfig, has_backend: bool) {
    if !has_backend {
        commands.insert_resource(Backend(Box::new(HttpBackend::new(
            &config.backend_url,
            config.request_timeout(),
        ))));
    }
    commands.insert_resource(PollSchedule::new(config.poll_interval()));
    commands.insert_resource(config);
}
