use bevy::prelude::*;

use crate::data::schema::{Challenge, ChallengeId};
use crate::data::store::ScoreboardData;
use crate::engine::core::lifecycle::SceneOwned;

pub const INFO_PANEL_HIDE_SECS: f32 = 5.0;

/// Which challenge the panel shows and until when.
#[derive(Resource, Default, Debug)]
pub struct InfoPanel {
    challenge: Option<ChallengeId>,
    hide_at: f32,
}

impl InfoPanel {
    pub fn open(&mut self, id: ChallengeId, now: f32) {
        self.challenge = Some(id);
        self.hide_at = now + INFO_PANEL_HIDE_SECS;
    }

    pub fn close(&mut self) {
        self.challenge = None;
    }

    pub fn challenge(&self) -> Option<ChallengeId> {
        self.challenge
    }

    fn expired(&self, now: f32) -> bool {
        self.challenge.is_some() && now >= self.hide_at
    }
}

pub fn difficulty_label(points: i64) -> &'static str {
    match points {
        ..=100 => "Easy",
        101..=300 => "Medium",
        301..=500 => "Hard",
        _ => "Expert",
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoField {
    Name,
    Category,
    Points,
    Solves,
    Difficulty,
    Description,
}

impl InfoField {
    const ALL: [InfoField; 6] = [
        InfoField::Name,
        InfoField::Category,
        InfoField::Points,
        InfoField::Solves,
        InfoField::Difficulty,
        InfoField::Description,
    ];

    pub fn render(self, challenge: &Challenge) -> String {
        match self {
            InfoField::Name => challenge.name.clone(),
            InfoField::Category => format!("Category: {}", challenge.category),
            InfoField::Points => format!("Points: {}", challenge.value),
            InfoField::Solves => format!("Solves: {}", challenge.solves),
            InfoField::Difficulty => format!("Difficulty: {}", difficulty_label(challenge.value)),
            InfoField::Description => challenge
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description available")
                .to_string(),
        }
    }

    fn font_size(self) -> f32 {
        match self {
            InfoField::Name => 20.0,
            InfoField::Description => 12.0,
            _ => 14.0,
        }
    }
}

#[derive(Component)]
pub struct InfoPanelRoot;

pub fn spawn_info_panel(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Challenge info panel"),
            InfoPanelRoot,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-200.0)),
                width: Val::Px(400.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::all(Val::Px(14.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            BorderRadius::all(Val::Px(8.0)),
            Visibility::Hidden,
            GlobalZIndex(15),
            SceneOwned,
        ))
        .with_children(|panel| {
            for field in InfoField::ALL {
                panel.spawn((
                    field,
                    Text::new(""),
                    TextFont {
                        font_size: field.font_size(),
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            }
        });
}

/// Fill the panel from current data; close it on timeout or when the
/// challenge is gone.
pub fn update_info_panel(
    time: Res<Time>,
    data: Res<ScoreboardData>,
    mut panel: ResMut<InfoPanel>,
    mut root: Query<&mut Visibility, With<InfoPanelRoot>>,
    mut fields: Query<(&InfoField, &mut Text)>,
) {
    if panel.expired(time.elapsed_secs()) {
        panel.close();
    }

    let challenge = panel.challenge().and_then(|id| data.challenge(id));
    if panel.challenge().is_some() && challenge.is_none() {
        panel.close();
    }

    if panel.is_changed() || data.is_changed() {
        if let Some(challenge) = challenge {
            for (field, mut text) in &mut fields {
                let value = field.render(challenge);
                if text.0 != value {
                    text.0 = value;
                }
            }
        }
    }

    let target = if challenge.is_some() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut root {
        visibility.set_if_neq(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(value: i64, description: Option<&str>) -> Challenge {
        Challenge {
            id: ChallengeId(4),
            name: "rop-city".into(),
            category: "pwn".into(),
            value,
            solves: 2,
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn difficulty_bands() {
        assert_eq!(difficulty_label(0), "Easy");
        assert_eq!(difficulty_label(100), "Easy");
        assert_eq!(difficulty_label(101), "Medium");
        assert_eq!(difficulty_label(300), "Medium");
        assert_eq!(difficulty_label(500), "Hard");
        assert_eq!(difficulty_label(501), "Expert");
    }

    #[test]
    fn missing_description_has_placeholder() {
        assert_eq!(
            InfoField::Description.render(&challenge(200, None)),
            "No description available"
        );
        assert_eq!(
            InfoField::Description.render(&challenge(200, Some("  "))),
            "No description available"
        );
        assert_eq!(
            InfoField::Description.render(&challenge(200, Some("Smash it"))),
            "Smash it"
        );
        assert_eq!(
            InfoField::Difficulty.render(&challenge(450, None)),
            "Difficulty: Hard"
        );
    }

    #[test]
    fn reopening_extends_the_timeout() {
        let mut panel = InfoPanel::default();
        panel.open(ChallengeId(4), 0.0);
        panel.open(ChallengeId(5), 4.0);
        assert!(!panel.expired(8.0));
        assert!(panel.expired(9.0));
        assert_eq!(panel.challenge(), Some(ChallengeId(5)));
    }
}
