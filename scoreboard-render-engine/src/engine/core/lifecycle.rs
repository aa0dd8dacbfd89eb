use bevy::prelude::*;
use thiserror::Error;

use super::app_setup::create_app;
use super::app_state::AppState;
use crate::engine::nodes::registry::NodeRegistry;

pub const CONTAINER_ID: &str = "scoreboard-3d-container";
pub const CANVAS_ID: &str = "scoreboard-3d-canvas";

#[derive(Debug, Error)]
pub enum InitError {
    #[error("no window available")]
    NoWindow,
    #[error("no document available")]
    NoDocument,
    #[error("{role} element #{id} not found")]
    MissingElement { role: &'static str, id: String },
}

/// DOM ids of the host container and canvas.
#[derive(Debug, Clone)]
pub struct RenderTargets {
    pub container_id: String,
    pub canvas_id: String,
}

impl Default for RenderTargets {
    fn default() -> Self {
        Self {
            container_id: CONTAINER_ID.to_string(),
            canvas_id: CANVAS_ID.to_string(),
        }
    }
}

impl RenderTargets {
    #[cfg(target_arch = "wasm32")]
    fn verify(&self) -> Result<(), InitError> {
        let window = web_sys::window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoDocument)?;
        for (role, id) in [("container", &self.container_id), ("canvas", &self.canvas_id)] {
            if document.get_element_by_id(id).is_none() {
                return Err(InitError::MissingElement {
                    role,
                    id: id.clone(),
                });
            }
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn verify(&self) -> Result<(), InitError> {
        Ok(())
    }
}

/// Marks root entities torn down on dispose.
#[derive(Component)]
pub struct SceneOwned;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineLifecycle {
    #[default]
    Active,
    Disposed,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DisposeRequest;

/// A fully built engine waiting to run.
pub struct EngineHandle {
    app: App,
}

impl EngineHandle {
    /// Fails when the render targets are missing; nothing is built then.
    pub fn initialize(targets: &RenderTargets) -> Result<Self, InitError> {
        targets.verify()?;
        info!("Initialising scoreboard engine on #{}", targets.canvas_id);
        Ok(Self {
            app: create_app(targets),
        })
    }

    pub fn run(mut self) -> AppExit {
        if self
            .app
            .world()
            .get_resource::<EngineLifecycle>()
            .is_some_and(|lifecycle| *lifecycle == EngineLifecycle::Disposed)
        {
            return AppExit::Success;
        }
        self.app.run()
    }

    /// Tear the scene down before running, safe to call more than once.
    pub fn dispose(&mut self) {
        dispose_world(self.app.world_mut());
    }
}

/// Despawn everything the engine owns and stop further updates.
/// Returns false when the engine was already disposed.
pub fn dispose_world(world: &mut World) -> bool {
    if world
        .get_resource::<EngineLifecycle>()
        .is_some_and(|lifecycle| *lifecycle == EngineLifecycle::Disposed)
    {
        return false;
    }

    let owned: Vec<Entity> = world
        .query_filtered::<Entity, With<SceneOwned>>()
        .iter(world)
        .collect();
    let count = owned.len();
    for entity in owned {
        world.despawn(entity);
    }

    if let Some(mut registry) = world.get_resource_mut::<NodeRegistry>() {
        registry.clear();
    }
    world.insert_resource(EngineLifecycle::Disposed);

    if let Some(mut next_state) = world.get_resource_mut::<NextState<AppState>>() {
        next_state.set(AppState::Disposed);
    }
    if world.contains_resource::<Events<AppExit>>() {
        world.send_event(AppExit::Success);
    }

    info!("Scoreboard engine disposed, {} scene roots released", count);
    true
}

pub fn process_dispose_requests(world: &mut World) {
    let requested = world
        .get_resource_mut::<Events<DisposeRequest>>()
        .is_some_and(|mut events| events.drain().count() > 0);
    if requested {
        dispose_world(world);
    }
}
