use std::collections::HashSet;

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use scoreboard_constants::layout::{CHALLENGE_LABEL_HEIGHT, TEAM_LABEL_HEIGHT};
use scoreboard_constants::timeline::{CHALLENGE_SPIN, TEAM_SPIN};

use super::labels::{LabelContent, LabelsDirty, spawn_label};
use super::layout::{layout_challenges, team_position, visible_teams};
use super::registry::{
    ChallengeNode, GlowShell, NodeEntry, NodeRegistry, PickBounds, TeamNode, despawn_entry,
};
use super::shapes::{NodeAssets, shape_extent};
use crate::constants::render_settings::{GLOW_SCALE, TEAM_NODE_RADIUS};
use crate::data::schema::{Challenge, Team};
use crate::data::store::ScoreboardData;
use crate::engine::core::lifecycle::SceneOwned;
use crate::engine::scene::spin::Spin;

fn spawn_challenge_node(
    commands: &mut Commands,
    assets: &NodeAssets,
    challenge: &Challenge,
    translation: Vec3,
) -> NodeEntry {
    let style = assets.category(&challenge.category);
    let node = commands
        .spawn((
            Name::new(format!("Challenge {}", challenge.name)),
            ChallengeNode {
                id: challenge.id,
                category: challenge.category.clone(),
            },
            Transform::from_translation(translation),
            Visibility::default(),
            Spin(CHALLENGE_SPIN),
            PickBounds {
                half_extents: shape_extent(style.shape),
            },
            SceneOwned,
        ))
        .with_children(|parent| {
            parent.spawn((Mesh3d(style.mesh.clone()), MeshMaterial3d(style.body)));
            parent.spawn((
                Mesh3d(style.mesh),
                MeshMaterial3d(style.glow),
                Transform::from_scale(Vec3::splat(GLOW_SCALE)),
                NotShadowCaster,
                GlowShell,
            ));
        })
        .id();

    let label = spawn_label(
        commands,
        node,
        &LabelContent::for_challenge(challenge),
        CHALLENGE_LABEL_HEIGHT,
    );
    NodeEntry {
        node,
        label: Some(label),
    }
}

fn spawn_team_node(
    commands: &mut Commands,
    assets: &NodeAssets,
    team: &Team,
    rank: usize,
    translation: Vec3,
) -> NodeEntry {
    let (mesh, material) = assets.team(rank);
    let node = commands
        .spawn((
            Name::new(format!("Team {}", team.account_id)),
            TeamNode {
                id: team.account_id,
                rank,
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(translation),
            Spin(TEAM_SPIN),
            PickBounds {
                half_extents: Vec3::splat(TEAM_NODE_RADIUS),
            },
            SceneOwned,
        ))
        .id();

    let label = LabelContent::for_team(team)
        .map(|content| spawn_label(commands, node, &content, TEAM_LABEL_HEIGHT));
    NodeEntry { node, label }
}

/// A team that gained a name gets its card, one that lost it loses it.
fn reconcile_team_label(commands: &mut Commands, entry: NodeEntry, team: &Team) -> Option<Entity> {
    match (entry.label, LabelContent::for_team(team)) {
        (None, Some(content)) => {
            Some(spawn_label(commands, entry.node, &content, TEAM_LABEL_HEIGHT))
        }
        (Some(label), None) => {
            if let Ok(mut label_commands) = commands.get_entity(label) {
                label_commands.try_despawn();
            }
            None
        }
        (label, _) => label,
    }
}

/// Reconcile challenge nodes with `challenges`: stale ones go, new ones
/// are spawned, surviving ones move to their new slot.
pub fn rebuild_challenge_nodes(
    commands: &mut Commands,
    registry: &mut NodeRegistry,
    assets: &NodeAssets,
    nodes: &mut Query<(&ChallengeNode, &mut Transform)>,
    challenges: &[Challenge],
) {
    let wanted: HashSet<_> = challenges.iter().map(|c| c.id).collect();
    registry.challenges.retain(|id, entry| {
        let keep = wanted.contains(id);
        if !keep {
            despawn_entry(commands, *entry);
        }
        keep
    });

    for (challenge, placement) in challenges.iter().zip(layout_challenges(challenges)) {
        let existing = registry.challenges.get(&challenge.id).copied();
        if let Some(entry) = existing {
            if let Ok((node, mut transform)) = nodes.get_mut(entry.node) {
                if node.category == challenge.category {
                    transform.translation = placement.translation;
                    continue;
                }
            }
            // Category changed or the entity vanished: start over.
            despawn_entry(commands, entry);
        }

        let entry = spawn_challenge_node(commands, assets, challenge, placement.translation);
        registry.challenges.insert(challenge.id, entry);
    }
}

pub fn rebuild_team_nodes(
    commands: &mut Commands,
    registry: &mut NodeRegistry,
    assets: &NodeAssets,
    nodes: &mut Query<(&mut TeamNode, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
    teams: &[Team],
) {
    let visible = visible_teams(teams);
    let wanted: HashSet<_> = visible.iter().map(|t| t.account_id).collect();
    registry.teams.retain(|id, entry| {
        let keep = wanted.contains(id);
        if !keep {
            despawn_entry(commands, *entry);
        }
        keep
    });

    for (rank, team) in visible.iter().enumerate() {
        let translation = team_position(rank, visible.len());
        let existing = registry.teams.get(&team.account_id).copied();
        if let Some(entry) = existing {
            if let Ok((mut node, mut transform, mut material)) = nodes.get_mut(entry.node) {
                transform.translation = translation;
                if node.rank != rank {
                    node.rank = rank;
                    material.0 = assets.team(rank).1;
                }
                let label = reconcile_team_label(commands, entry, team);
                registry.teams.insert(team.account_id, NodeEntry { label, ..entry });
                continue;
            }
            despawn_entry(commands, entry);
        }

        let entry = spawn_team_node(commands, assets, team, rank, translation);
        registry.teams.insert(team.account_id, entry);
    }
}

pub fn sync_challenge_nodes(
    mut commands: Commands,
    data: Res<ScoreboardData>,
    assets: Res<NodeAssets>,
    mut registry: ResMut<NodeRegistry>,
    mut nodes: Query<(&ChallengeNode, &mut Transform)>,
    mut labels_dirty: ResMut<LabelsDirty>,
    mut synced_revision: Local<u64>,
) {
    if data.challenge_revision() == *synced_revision {
        return;
    }
    *synced_revision = data.challenge_revision();

    rebuild_challenge_nodes(
        &mut commands,
        &mut registry,
        &assets,
        &mut nodes,
        data.challenges(),
    );
    labels_dirty.0 = true;
    debug!("Challenge nodes rebuilt: {}", registry.challenge_count());
}

pub fn sync_team_nodes(
    mut commands: Commands,
    data: Res<ScoreboardData>,
    assets: Res<NodeAssets>,
    mut registry: ResMut<NodeRegistry>,
    mut nodes: Query<(&mut TeamNode, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
    mut labels_dirty: ResMut<LabelsDirty>,
    mut synced_revision: Local<u64>,
) {
    if data.team_revision() == *synced_revision {
        return;
    }
    *synced_revision = data.team_revision();

    rebuild_team_nodes(&mut commands, &mut registry, &assets, &mut nodes, data.teams());
    labels_dirty.0 = true;
    debug!("Team nodes rebuilt: {}", registry.team_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{AccountId, ChallengeId};
    use crate::engine::nodes::labels::{LabelRow, NodeLabel, refresh_label_text};

    fn challenge(id: u64, category: &str, solves: u64) -> Challenge {
        Challenge {
            id: ChallengeId(id),
            name: format!("c{id}"),
            category: category.into(),
            value: 100 * id as i64,
            solves,
            description: None,
        }
    }

    fn team(id: u64) -> Team {
        Team {
            account_id: AccountId(id),
            name: Some(format!("team{id}")),
            score: 1000 - id as i64,
        }
    }

    fn app() -> App {
        let mut app = App::new();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let assets = NodeAssets::create(&mut meshes, &mut materials);
        app.insert_resource(meshes)
            .insert_resource(materials)
            .insert_resource(assets)
            .init_resource::<ScoreboardData>()
            .init_resource::<NodeRegistry>()
            .init_resource::<LabelsDirty>()
            .add_systems(
                Update,
                (sync_challenge_nodes, sync_team_nodes, refresh_label_text).chain(),
            );
        app
    }

    fn challenge_nodes(app: &mut App) -> Vec<(Entity, ChallengeId)> {
        app.world_mut()
            .query::<(Entity, &ChallengeNode)>()
            .iter(app.world())
            .map(|(e, n)| (e, n.id))
            .collect()
    }

    fn assert_registry_matches_scene(app: &mut App) {
        let nodes = challenge_nodes(app);
        let registry = app.world().resource::<NodeRegistry>();
        assert_eq!(nodes.len(), registry.challenge_count());
        for (entity, id) in nodes {
            assert_eq!(registry.challenge(id), Some(entity));
        }
    }

    fn set_challenges(app: &mut App, challenges: Vec<Challenge>) {
        app.world_mut()
            .resource_mut::<ScoreboardData>()
            .replace_challenges(challenges);
        app.update();
    }

    #[test]
    fn rebuild_keeps_registry_and_scene_in_step() {
        let mut app = app();
        set_challenges(
            &mut app,
            vec![challenge(1, "web", 0), challenge(2, "crypto", 0), challenge(3, "web", 0)],
        );
        assert_eq!(challenge_nodes(&mut app).len(), 3);
        assert_registry_matches_scene(&mut app);

        let kept = app.world().resource::<NodeRegistry>().challenge(ChallengeId(1));
        set_challenges(&mut app, vec![challenge(1, "web", 0), challenge(4, "pwn", 0)]);

        assert_eq!(challenge_nodes(&mut app).len(), 2);
        assert_registry_matches_scene(&mut app);
        let registry = app.world().resource::<NodeRegistry>();
        assert_eq!(registry.challenge(ChallengeId(1)), kept);
        assert_eq!(registry.challenge(ChallengeId(2)), None);
    }

    #[test]
    fn empty_list_clears_every_node() {
        let mut app = app();
        set_challenges(&mut app, vec![challenge(1, "web", 0), challenge(2, "misc", 0)]);
        set_challenges(&mut app, Vec::new());

        assert!(challenge_nodes(&mut app).is_empty());
        assert_eq!(app.world().resource::<NodeRegistry>().challenge_count(), 0);
        let labels = app
            .world_mut()
            .query::<&LabelRow>()
            .iter(app.world())
            .count();
        assert_eq!(labels, 0);
    }

    #[test]
    fn category_change_replaces_the_node() {
        let mut app = app();
        set_challenges(&mut app, vec![challenge(1, "web", 0)]);
        let before = app.world().resource::<NodeRegistry>().challenge(ChallengeId(1));
        set_challenges(&mut app, vec![challenge(1, "crypto", 0)]);

        let after = app.world().resource::<NodeRegistry>().challenge(ChallengeId(1));
        assert_ne!(before, after);
        assert_registry_matches_scene(&mut app);
    }

    #[test]
    fn label_refresh_keeps_node_count() {
        let mut app = app();
        set_challenges(&mut app, vec![challenge(1, "web", 2), challenge(2, "web", 0)]);
        let before = challenge_nodes(&mut app);

        app.world_mut()
            .resource_mut::<ScoreboardData>()
            .record_solve(ChallengeId(1));
        app.world_mut().resource_mut::<LabelsDirty>().0 = true;
        app.update();

        assert_eq!(challenge_nodes(&mut app), before);
        let node = app.world().resource::<NodeRegistry>().challenge(ChallengeId(1));
        let solves: Vec<String> = app
            .world_mut()
            .query::<(&LabelRow, &Text)>()
            .iter(app.world())
            .filter(|(row, _)| Some(row.owner) == node && row.row == 2)
            .map(|(_, text)| text.0.clone())
            .collect();
        assert_eq!(solves, vec!["3 solves".to_string()]);
    }

    fn set_teams(app: &mut App, teams: Vec<Team>) {
        app.world_mut()
            .resource_mut::<ScoreboardData>()
            .replace_teams(teams);
        app.update();
    }

    fn team_label_count(app: &mut App, id: u64) -> usize {
        let node = app.world().resource::<NodeRegistry>().team(AccountId(id));
        app.world_mut()
            .query::<&NodeLabel>()
            .iter(app.world())
            .filter(|label| Some(label.owner) == node)
            .count()
    }

    #[test]
    fn team_card_follows_its_name() {
        let mut app = app();
        let unnamed = Team {
            name: None,
            ..team(1)
        };
        set_teams(&mut app, vec![unnamed.clone(), team(2)]);
        assert_eq!(team_label_count(&mut app, 1), 0);
        assert_eq!(team_label_count(&mut app, 2), 1);
        let node = app.world().resource::<NodeRegistry>().team(AccountId(1));

        set_teams(&mut app, vec![team(1), team(2)]);
        assert_eq!(team_label_count(&mut app, 1), 1);
        assert_eq!(app.world().resource::<NodeRegistry>().team(AccountId(1)), node);
        let names: Vec<String> = app
            .world_mut()
            .query::<(&LabelRow, &Text)>()
            .iter(app.world())
            .filter(|(row, _)| Some(row.owner) == node)
            .map(|(_, text)| text.0.clone())
            .collect();
        assert_eq!(names, vec!["team1".to_string()]);

        set_teams(&mut app, vec![unnamed, team(2)]);
        assert_eq!(team_label_count(&mut app, 1), 0);
        assert_eq!(team_label_count(&mut app, 2), 1);
    }

    #[test]
    fn only_ten_team_nodes_are_spawned() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<ScoreboardData>()
            .replace_teams((0..15).map(team).collect());
        app.update();

        assert_eq!(app.world().resource::<NodeRegistry>().team_count(), 10);
        let mut ranks: Vec<usize> = app
            .world_mut()
            .query::<&TeamNode>()
            .iter(app.world())
            .map(|t| t.rank)
            .collect();
        ranks.sort();
        assert_eq!(ranks, (0..10).collect::<Vec<_>>());
    }
}
