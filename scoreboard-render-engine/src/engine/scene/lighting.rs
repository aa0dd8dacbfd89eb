use bevy::prelude::*;

use crate::constants::render_settings::*;
use crate::engine::core::lifecycle::SceneOwned;

pub fn spawn_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: hex_colour(AMBIENT_LIGHT_COLOUR),
        brightness: AMBIENT_LIGHT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        Name::new("Key light"),
        DirectionalLight {
            illuminance: DIRECTIONAL_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        SceneOwned,
    ));

    for (colour, position) in POINT_LIGHTS {
        commands.spawn((
            Name::new("Accent light"),
            PointLight {
                color: hex_colour(colour),
                intensity: POINT_LIGHT_INTENSITY,
                range: POINT_LIGHT_RANGE,
                ..default()
            },
            Transform::from_translation(position),
            SceneOwned,
        ));
    }
}
