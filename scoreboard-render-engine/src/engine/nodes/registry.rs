use std::collections::HashMap;

use bevy::prelude::*;

use crate::data::schema::{AccountId, ChallengeId};

#[derive(Component, Debug, Clone)]
pub struct ChallengeNode {
    pub id: ChallengeId,
    pub category: String,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct TeamNode {
    pub id: AccountId,
    pub rank: usize,
}

/// Translucent enlarged copy of a challenge shape.
#[derive(Component)]
pub struct GlowShell;

/// Oriented pick box, in the node's local space.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickBounds {
    pub half_extents: Vec3,
}

/// Scene entities backing one challenge or team.
#[derive(Debug, Clone, Copy)]
pub struct NodeEntry {
    pub node: Entity,
    pub label: Option<Entity>,
}

/// Id to entity lookup. Holds exactly one entry per challenge and per
/// visible team currently in the scene.
#[derive(Resource, Default, Debug)]
pub struct NodeRegistry {
    pub(super) challenges: HashMap<ChallengeId, NodeEntry>,
    pub(super) teams: HashMap<AccountId, NodeEntry>,
}

impl NodeRegistry {
    pub fn challenge(&self, id: ChallengeId) -> Option<Entity> {
        self.challenges.get(&id).map(|entry| entry.node)
    }

    pub fn team(&self, id: AccountId) -> Option<Entity> {
        self.teams.get(&id).map(|entry| entry.node)
    }

    pub fn challenge_count(&self) -> usize {
        self.challenges.len()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn challenge_ids(&self) -> impl Iterator<Item = ChallengeId> + '_ {
        self.challenges.keys().copied()
    }

    pub fn clear(&mut self) {
        self.challenges.clear();
        self.teams.clear();
    }

    #[cfg(test)]
    pub fn insert_challenge(&mut self, id: ChallengeId, entry: NodeEntry) {
        self.challenges.insert(id, entry);
    }

    #[cfg(test)]
    pub fn insert_team(&mut self, id: AccountId, entry: NodeEntry) {
        self.teams.insert(id, entry);
    }
}

/// Despawn both halves of an entry, tolerating ones already gone.
pub(super) fn despawn_entry(commands: &mut Commands, entry: NodeEntry) {
    for entity in std::iter::once(entry.node).chain(entry.label) {
        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.try_despawn();
        }
    }
}
