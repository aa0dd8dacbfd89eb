use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use rand::Rng;

use scoreboard_constants::category::SOLVE_GLOW_COLOUR;
use scoreboard_constants::timeline::{
    EXPLOSION_DURATION_SECS, EXPLOSION_GRAVITY, EXPLOSION_PARTICLES,
};

use crate::constants::render_settings::*;
use crate::engine::core::lifecycle::SceneOwned;
use crate::engine::scene::particle_mesh::{tetrahedron_cloud_mesh, tetrahedron_cloud_positions};

/// Ballistic particle cloud thrown up from a solved challenge.
#[derive(Component, Debug)]
pub struct ParticleBurst {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    elapsed: f32,
}

impl ParticleBurst {
    pub fn new(centre: Vec3, rng: &mut impl Rng) -> Self {
        let (min_up, max_up) = EXPLOSION_VERTICAL_SPEED;
        let velocities = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-EXPLOSION_HORIZONTAL_SPEED..EXPLOSION_HORIZONTAL_SPEED),
                    rng.gen_range(min_up..max_up),
                    rng.gen_range(-EXPLOSION_HORIZONTAL_SPEED..EXPLOSION_HORIZONTAL_SPEED),
                )
            })
            .collect();
        let positions = (0..EXPLOSION_PARTICLES)
            .map(|_| {
                centre
                    + Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    )
            })
            .collect();
        Self {
            positions,
            velocities,
            elapsed: 0.0,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.elapsed += dt;
        for (position, velocity) in self.positions.iter_mut().zip(&mut self.velocities) {
            velocity.y -= EXPLOSION_GRAVITY * dt;
            *position += *velocity * dt;
        }
    }

    pub fn opacity(&self) -> f32 {
        (1.0 - self.elapsed / EXPLOSION_DURATION_SECS).clamp(0.0, 1.0)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= EXPLOSION_DURATION_SECS
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}

pub fn spawn_explosion(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    centre: Vec3,
    rng: &mut impl Rng,
) {
    let burst = ParticleBurst::new(centre, rng);
    let mesh = meshes.add(tetrahedron_cloud_mesh(
        burst.positions(),
        &[[1.0; 4]; EXPLOSION_PARTICLES],
        EXPLOSION_PARTICLE_SIZE,
    ));
    let material = materials.add(StandardMaterial {
        base_color: hex_colour(SOLVE_GLOW_COLOUR),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Name::new("Solve explosion"),
        burst,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        NoFrustumCulling,
        NotShadowCaster,
        SceneOwned,
    ));
}

pub fn animate_explosions(
    mut commands: Commands,
    time: Res<Time>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut bursts: Query<(
        Entity,
        &mut ParticleBurst,
        &Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, mut burst, mesh, material) in &mut bursts {
        burst.step(dt);

        if burst.finished() {
            meshes.remove(&mesh.0);
            materials.remove(&material.0);
            commands.entity(entity).despawn();
            continue;
        }

        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            mesh.insert_attribute(
                Mesh::ATTRIBUTE_POSITION,
                tetrahedron_cloud_positions(burst.positions(), EXPLOSION_PARTICLE_SIZE),
            );
        }
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(burst.opacity());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn particles_rise_then_fall() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut burst = ParticleBurst::new(Vec3::ZERO, &mut rng);
        let start: Vec<f32> = burst.positions().iter().map(|p| p.y).collect();
        for _ in 0..12 {
            burst.step(1.0 / 60.0);
        }
        assert!(burst.positions().iter().zip(&start).all(|(p, y0)| p.y > *y0));

        for _ in 0..120 {
            burst.step(1.0 / 60.0);
        }
        assert!(burst.finished());
        assert_eq!(burst.opacity(), 0.0);
    }

    #[test]
    fn velocities_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let burst = ParticleBurst::new(Vec3::ZERO, &mut rng);
        assert_eq!(burst.velocities.len(), EXPLOSION_PARTICLES);
        for v in &burst.velocities {
            assert!(v.x.abs() <= EXPLOSION_HORIZONTAL_SPEED);
            assert!((6.0..36.0).contains(&v.y));
        }
    }
}
