use bevy::prelude::*;
use rand::Rng;

use super::particle_mesh::tetrahedron_cloud_mesh;
use super::spin::Spin;
use crate::constants::render_settings::*;
use crate::engine::core::lifecycle::SceneOwned;
use scoreboard_constants::timeline::AMBIENT_FIELD_SPIN;

#[derive(Component)]
pub struct AmbientField;

/// Random points on a spherical shell between the min and max radius.
pub fn ambient_positions(rng: &mut impl Rng, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let radius = AMBIENT_MIN_RADIUS + rng.gen_range(0.0..AMBIENT_RADIUS_SPREAD);
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let phi = (rng.gen_range(-1.0f32..1.0)).acos();
            Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

pub fn spawn_ambient_field(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = rand::thread_rng();
    let positions = ambient_positions(&mut rng, AMBIENT_PARTICLE_COUNT);
    let (hue_min, hue_max) = AMBIENT_HUE_RANGE;
    let colours: Vec<[f32; 4]> = positions
        .iter()
        .map(|_| {
            let hue = rng.gen_range(hue_min..hue_max) * 360.0;
            let colour = LinearRgba::from(Color::hsl(hue, 0.7, 0.5));
            [colour.red, colour.green, colour.blue, 1.0]
        })
        .collect();

    let mesh = meshes.add(tetrahedron_cloud_mesh(
        &positions,
        &colours,
        AMBIENT_PARTICLE_SIZE,
    ));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE.with_alpha(AMBIENT_PARTICLE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("Ambient field"),
        AmbientField,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
        Spin(AMBIENT_FIELD_SPIN),
        SceneOwned,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn particles_stay_inside_the_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in ambient_positions(&mut rng, 500) {
            let r = p.length();
            assert!(r >= AMBIENT_MIN_RADIUS - 1e-3, "{r}");
            assert!(r <= AMBIENT_MIN_RADIUS + AMBIENT_RADIUS_SPREAD + 1e-3, "{r}");
        }
    }
}
