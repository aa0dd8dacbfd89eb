use bevy::prelude::*;

use scoreboard_constants::category::SOLVE_GLOW_COLOUR;

use super::registry::{ChallengeNode, TeamNode};
use crate::constants::render_settings::hex_colour;
use crate::data::schema::{Challenge, Team};
use crate::data::store::ScoreboardData;
use crate::engine::core::lifecycle::SceneOwned;

const LABEL_WHITE: u32 = 0xFFFFFF;
const LABEL_GREEN: u32 = 0x34C759;
const LABEL_SKY: u32 = 0x5AC8FA;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub text: String,
    pub colour: u32,
    pub font_size: f32,
}

impl LabelLine {
    fn new(text: String, colour: u32, font_size: f32) -> Self {
        Self {
            text,
            colour,
            font_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub lines: Vec<LabelLine>,
}

impl LabelContent {
    pub fn for_challenge(challenge: &Challenge) -> Self {
        Self {
            lines: vec![
                LabelLine::new(challenge.name.clone(), LABEL_WHITE, 14.0),
                LabelLine::new(format!("{} pts", challenge.value), SOLVE_GLOW_COLOUR, 12.0),
                LabelLine::new(format!("{} solves", challenge.solves), LABEL_GREEN, 12.0),
                LabelLine::new(challenge.category.to_uppercase(), LABEL_SKY, 10.0),
            ],
        }
    }

    /// Unnamed teams get no card.
    pub fn for_team(team: &Team) -> Option<Self> {
        let name = team.name.clone()?;
        Some(Self {
            lines: vec![LabelLine::new(name, LABEL_WHITE, 12.0)],
        })
    }
}

/// Screen-space card following a node.
#[derive(Component)]
pub struct NodeLabel {
    pub owner: Entity,
    pub height: f32,
}

#[derive(Component)]
pub struct LabelRow {
    pub owner: Entity,
    pub row: usize,
}

/// Set when label text may be stale.
#[derive(Resource, Default)]
pub struct LabelsDirty(pub bool);

pub fn spawn_label(
    commands: &mut Commands,
    owner: Entity,
    content: &LabelContent,
    height: f32,
) -> Entity {
    commands
        .spawn((
            Name::new("Node label"),
            NodeLabel { owner, height },
            Node {
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            BorderRadius::all(Val::Px(4.0)),
            Visibility::Hidden,
            SceneOwned,
        ))
        .with_children(|card| {
            for (row, line) in content.lines.iter().enumerate() {
                card.spawn((
                    Text::new(line.text.clone()),
                    TextFont {
                        font_size: line.font_size,
                        ..default()
                    },
                    TextColor(hex_colour(line.colour)),
                    LabelRow { owner, row },
                ));
            }
        })
        .id()
}

/// Project each label above its node; hide it when off screen.
pub fn position_node_labels(
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    owners: Query<&GlobalTransform, Without<NodeLabel>>,
    mut labels: Query<(&NodeLabel, &mut Node, &mut Visibility, &ComputedNode)>,
) {
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for (label, mut node, mut visibility, computed) in &mut labels {
        let projected = owners.get(label.owner).ok().and_then(|owner| {
            let anchor = owner.translation() + Vec3::Y * label.height;
            camera.world_to_viewport(camera_transform, anchor).ok()
        });

        match projected {
            Some(screen) => {
                let half = computed.size() * computed.inverse_scale_factor() * 0.5;
                node.left = Val::Px(screen.x - half.x);
                node.top = Val::Px(screen.y - half.y);
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

/// Rewrite label rows from the current data when marked dirty.
pub fn refresh_label_text(
    mut dirty: ResMut<LabelsDirty>,
    data: Res<ScoreboardData>,
    challenges: Query<&ChallengeNode>,
    teams: Query<&TeamNode>,
    mut rows: Query<(&LabelRow, &mut Text)>,
) {
    if !dirty.0 {
        return;
    }
    dirty.0 = false;

    for (row, mut text) in &mut rows {
        let content = if let Ok(node) = challenges.get(row.owner) {
            data.challenge(node.id).map(LabelContent::for_challenge)
        } else if let Ok(node) = teams.get(row.owner) {
            data.team(node.id).and_then(LabelContent::for_team)
        } else {
            None
        };

        if let Some(line) = content.as_ref().and_then(|c| c.lines.get(row.row)) {
            if text.0 != line.text {
                text.0 = line.text.clone();
            }
        }
    }
}
