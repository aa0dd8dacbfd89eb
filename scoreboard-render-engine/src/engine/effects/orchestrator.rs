use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use scoreboard_constants::timeline::*;

use super::easing::ease_out_cubic;
use super::explosion::spawn_explosion;
use super::fireworks::spawn_fireworks;
use crate::data::activity::ActivityFeed;
use crate::data::mutations::ResolvedSolve;
use crate::data::store::ScoreboardData;
use crate::engine::camera::orbit_camera::ViewportSize;
use crate::engine::core::clock::clock_label;
use crate::engine::nodes::labels::LabelsDirty;
use crate::engine::nodes::registry::{ChallengeNode, NodeRegistry, TeamNode};
use crate::engine::nodes::shapes::NodeAssets;
use crate::interaction::banner::SolveBanner;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    /// Spawned, nothing shown yet.
    Pending,
    /// Team node travelling to the challenge node.
    Approach,
    /// One of the nodes was missing; wait instead of moving.
    Fallback,
    /// Glow, particles and the challenge pulse.
    Celebrate,
    Done,
}

/// One solve being animated. Nodes are looked up by id every frame so
/// a rebuild in the middle of the animation never leaves it dangling.
#[derive(Component, Debug)]
pub struct SolveAnimation {
    pub solve: ResolvedSolve,
    phase: SolvePhase,
    elapsed: f32,
    approach: Option<(Vec3, Vec3)>,
    glow: Option<Entity>,
}

impl SolveAnimation {
    pub fn new(solve: ResolvedSolve) -> Self {
        Self {
            solve,
            phase: SolvePhase::Pending,
            elapsed: 0.0,
            approach: None,
            glow: None,
        }
    }

    pub fn phase(&self) -> SolvePhase {
        self.phase
    }

    fn enter(&mut self, phase: SolvePhase) {
        self.phase = phase;
        self.elapsed = 0.0;
    }
}

/// Challenge scale during the pulse.
pub fn pulse_scale(elapsed: f32) -> f32 {
    1.0 + PULSE_AMPLITUDE * (PULSE_RATE * elapsed).sin()
}

/// Fired once per animation when the approach (or its fallback) ends.
#[derive(Event, Debug, Clone, Copy)]
pub struct SolveCelebration {
    pub task: Entity,
}

/// Gold sphere wrapped around a celebrating challenge.
#[derive(Component)]
pub struct SolveGlow;

pub fn advance_solve_animations(
    mut commands: Commands,
    time: Res<Time>,
    registry: Res<NodeRegistry>,
    mut banner: ResMut<SolveBanner>,
    mut tasks: Query<(Entity, &mut SolveAnimation)>,
    mut nodes: Query<&mut Transform, Or<(With<ChallengeNode>, With<TeamNode>)>>,
    mut celebrations: EventWriter<SolveCelebration>,
) {
    let dt = time.delta_secs();

    for (entity, mut task) in &mut tasks {
        let team = registry.team(task.solve.team.account_id);
        let challenge = registry.challenge(task.solve.challenge.id);

        match task.phase {
            SolvePhase::Pending => {
                banner.show(
                    &task.solve.team.name,
                    &format!("Solving: {}", task.solve.challenge.name),
                    time.elapsed_secs(),
                );
                let start = team.and_then(|e| nodes.get(e).ok()).map(|t| t.translation);
                let end = challenge.and_then(|e| nodes.get(e).ok()).map(|t| t.translation);
                match start.zip(end) {
                    Some(path) => {
                        task.approach = Some(path);
                        task.enter(SolvePhase::Approach);
                    }
                    None => {
                        debug!(
                            "Solve by {} has no node pair, skipping approach",
                            task.solve.team.name
                        );
                        task.enter(SolvePhase::Fallback);
                    }
                }
            }
            SolvePhase::Approach => {
                task.elapsed += dt;
                let t = (task.elapsed / APPROACH_DURATION_SECS).min(1.0);
                if let (Some((start, end)), Some(team)) = (task.approach, team) {
                    if let Ok(mut transform) = nodes.get_mut(team) {
                        transform.translation = start.lerp(end, ease_out_cubic(t));
                    }
                }
                if t >= 1.0 {
                    task.enter(SolvePhase::Celebrate);
                    celebrations.write(SolveCelebration { task: entity });
                }
            }
            SolvePhase::Fallback => {
                task.elapsed += dt;
                if task.elapsed >= APPROACH_FALLBACK_SECS {
                    task.enter(SolvePhase::Celebrate);
                    celebrations.write(SolveCelebration { task: entity });
                }
            }
            SolvePhase::Celebrate => {
                task.elapsed += dt;
                let done = task.elapsed >= PULSE_DURATION_SECS;
                if let Some(Ok(mut transform)) = challenge.map(|e| nodes.get_mut(e)) {
                    transform.scale = if done {
                        Vec3::ONE
                    } else {
                        Vec3::splat(pulse_scale(task.elapsed))
                    };
                }
                if done {
                    task.phase = SolvePhase::Done;
                }
            }
            SolvePhase::Done => {
                if let Some(glow) = task.glow.take() {
                    if let Ok(mut glow) = commands.get_entity(glow) {
                        glow.try_despawn();
                    }
                }
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Start the one-shot solve effects and account for the solve.
pub fn celebrate_solves(
    mut commands: Commands,
    mut events: EventReader<SolveCelebration>,
    mut tasks: Query<&mut SolveAnimation>,
    registry: Res<NodeRegistry>,
    node_assets: Res<NodeAssets>,
    globals: Query<&GlobalTransform>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    viewport: Res<ViewportSize>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut data: ResMut<ScoreboardData>,
    mut labels_dirty: ResMut<LabelsDirty>,
    mut activity: ResMut<ActivityFeed>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut rng = rand::thread_rng();

    for event in events.read() {
        let Ok(mut task) = tasks.get_mut(event.task) else {
            continue;
        };
        let solve = task.solve.clone();

        let challenge = registry
            .challenge(solve.challenge.id)
            .and_then(|entity| globals.get(entity).ok().map(|g| (entity, g.translation())));

        if let Some((entity, centre)) = challenge {
            let (mesh, material) = node_assets.solve_glow();
            let glow = commands
                .spawn((
                    Name::new("Solve glow"),
                    SolveGlow,
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    NotShadowCaster,
                    ChildOf(entity),
                ))
                .id();
            task.glow = Some(glow);
            spawn_explosion(&mut commands, &mut meshes, &mut materials, centre, &mut rng);
        }

        let origin = challenge
            .and_then(|(_, centre)| {
                let (camera, camera_transform) = camera_query.single().ok()?;
                camera.world_to_viewport(camera_transform, centre).ok()
            })
            .unwrap_or_else(|| viewport.centre());
        spawn_fireworks(&mut commands, origin, &mut rng);

        if data.record_solve(solve.challenge.id).is_some() {
            labels_dirty.0 = true;
        }

        let entry = activity.push(
            solve.team.name.clone(),
            format!(
                "Solved {} (+{} points)",
                solve.challenge.name, solve.challenge.value
            ),
            clock_label(),
        );
        rpc_interface.send_notification(
            "activity_added",
            serde_json::to_value(&entry).unwrap_or_default(),
        );
    }
}
