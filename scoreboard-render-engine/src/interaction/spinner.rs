use bevy::prelude::*;

use crate::engine::core::app_state::LoadingProgress;
use crate::engine::core::lifecycle::SceneOwned;

#[derive(Component)]
pub struct LoadingSpinner;

pub fn spawn_loading_spinner(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Loading spinner"),
            LoadingSpinner,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GlobalZIndex(30),
            SceneOwned,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                LoadingSpinner,
                Text::new("Loading scoreboard"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Cycle trailing dots and fade the text while loading.
pub fn animate_loading_spinner(
    time: Res<Time>,
    mut texts: Query<(&mut Text, &mut TextColor), With<LoadingSpinner>>,
) {
    let t = time.elapsed_secs();
    let dots = ".".repeat((t * 2.0) as usize % 4);
    let alpha = 0.6 + 0.4 * (t * 3.0).sin().abs();
    for (mut text, mut colour) in &mut texts {
        text.0 = format!("Loading scoreboard{dots}");
        colour.0 = Color::srgba(1.0, 1.0, 1.0, alpha);
    }
}

pub fn hide_loading_spinner(
    mut commands: Commands,
    progress: Res<LoadingProgress>,
    spinner: Query<Entity, (With<LoadingSpinner>, Without<ChildOf>)>,
) {
    if !progress.first_poll_done() {
        return;
    }
    for entity in &spinner {
        if let Ok(mut entity) = commands.get_entity(entity) {
            entity.try_despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_goes_away_after_first_poll() {
        let mut app = App::new();
        app.init_resource::<LoadingProgress>()
            .add_systems(Startup, spawn_loading_spinner)
            .add_systems(Update, hide_loading_spinner);
        app.update();
        assert_eq!(
            app.world_mut()
                .query_filtered::<(), With<LoadingSpinner>>()
                .iter(app.world())
                .count(),
            2
        );

        {
            let mut progress = app.world_mut().resource_mut::<LoadingProgress>();
            progress.challenges_answered = true;
            progress.scoreboard_answered = true;
        }
        app.update();
        assert_eq!(
            app.world_mut()
                .query_filtered::<(), With<LoadingSpinner>>()
                .iter(app.world())
                .count(),
            0
        );
    }
}
