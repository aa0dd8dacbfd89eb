//! Challenge and team nodes.
//!
//! Each challenge is a category-shaped mesh on its category's ring, each
//! of the top teams a small sphere on an inner ring. Nodes are rebuilt
//! from `ScoreboardData` whenever a list changes, and every node carries
//! a screen-space label card.

/// Label content, spawning and per-frame projection.
pub mod labels;

/// Deterministic ring placement for challenges and teams.
pub mod layout;

/// Node components and the id to entity registry.
pub mod registry;

/// Shared meshes and materials for node shapes.
pub mod shapes;

/// Reconciliation of scene nodes with the current lists.
pub mod sync;

use bevy::prelude::*;

use crate::data::mutations::apply_scene_mutations;
use crate::engine::core::app_state::AppState;
use labels::{LabelsDirty, position_node_labels, refresh_label_text};
use registry::NodeRegistry;
use shapes::setup_node_assets;
use sync::{sync_challenge_nodes, sync_team_nodes};

pub struct NodeScenePlugin;

impl Plugin for NodeScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NodeRegistry>()
            .init_resource::<LabelsDirty>()
            .add_systems(Startup, setup_node_assets)
            .add_systems(
                Update,
                (
                    sync_challenge_nodes,
                    sync_team_nodes,
                    refresh_label_text,
                    position_node_labels,
                )
                    .chain()
                    .after(apply_scene_mutations)
                    .run_if(in_state(AppState::Running)),
            );
    }
}
