use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use scoreboard_constants::timeline::*;

use super::easing::ease_out_quad;
use crate::constants::render_settings::hex_colour;
use crate::engine::core::lifecycle::SceneOwned;

const SPARK_SIZE: f32 = 6.0;
const SPARK_COLOURS: [u32; 5] = [0xFFD700, 0xFF3B30, 0x007AFF, 0x34C759, 0xFF9500];

/// Screen-space spark flying outward from a solve.
#[derive(Component, Debug, Clone)]
pub struct FireworkSpark {
    pub origin: Vec2,
    pub direction: Vec2,
    pub distance: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl FireworkSpark {
    /// Screen position and opacity (also the size factor) after
    /// `elapsed` seconds.
    pub fn sample(&self) -> (Vec2, f32) {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let position = self.origin + self.direction * self.distance * ease_out_quad(t);
        (position, 1.0 - t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

pub fn spawn_fireworks(commands: &mut Commands, origin: Vec2, rng: &mut impl Rng) {
    for i in 0..FIREWORK_SPARKS {
        let angle = TAU * i as f32 / FIREWORK_SPARKS as f32;
        let spark = FireworkSpark {
            origin,
            direction: Vec2::from_angle(angle),
            distance: rng.gen_range(FIREWORK_MIN_DISTANCE_PX..FIREWORK_MAX_DISTANCE_PX),
            duration: rng.gen_range(FIREWORK_MIN_SECS..FIREWORK_MAX_SECS),
            elapsed: 0.0,
        };
        let colour = SPARK_COLOURS[rng.gen_range(0..SPARK_COLOURS.len())];

        commands.spawn((
            Name::new("Firework spark"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(origin.x - SPARK_SIZE * 0.5),
                top: Val::Px(origin.y - SPARK_SIZE * 0.5),
                width: Val::Px(SPARK_SIZE),
                height: Val::Px(SPARK_SIZE),
                ..default()
            },
            BackgroundColor(hex_colour(colour)),
            BorderRadius::MAX,
            GlobalZIndex(20),
            spark,
            SceneOwned,
        ));
    }
}

pub fn animate_fireworks(
    mut commands: Commands,
    time: Res<Time>,
    mut sparks: Query<(Entity, &mut FireworkSpark, &mut Node, &mut BackgroundColor)>,
) {
    let dt = time.delta_secs();
    for (entity, mut spark, mut node, mut colour) in &mut sparks {
        spark.elapsed += dt;
        if spark.finished() {
            commands.entity(entity).despawn();
            continue;
        }
        let (position, alpha) = spark.sample();
        let size = SPARK_SIZE * alpha;
        node.left = Val::Px(position.x - size * 0.5);
        node.top = Val::Px(position.y - size * 0.5);
        node.width = Val::Px(size);
        node.height = Val::Px(size);
        colour.0.set_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn spark_travels_its_full_distance_and_fades() {
        let mut spark = FireworkSpark {
            origin: Vec2::new(100.0, 100.0),
            direction: Vec2::X,
            distance: 150.0,
            duration: 1.5,
            elapsed: 0.0,
        };
        assert_eq!(spark.sample(), (Vec2::new(100.0, 100.0), 1.0));

        spark.elapsed = 1.5;
        let (position, alpha) = spark.sample();
        assert!((position.x - 250.0).abs() < 1e-3);
        assert_eq!(alpha, 0.0);
        assert!(spark.finished());
    }

    #[test]
    fn burst_spawns_every_spark_within_ranges() {
        let mut app = App::new();
        app.add_systems(Startup, |mut commands: Commands| {
            let mut rng = StdRng::seed_from_u64(3);
            spawn_fireworks(&mut commands, Vec2::new(640.0, 360.0), &mut rng);
        });
        app.update();

        let sparks: Vec<FireworkSpark> = app
            .world_mut()
            .query::<&FireworkSpark>()
            .iter(app.world())
            .cloned()
            .collect();
        assert_eq!(sparks.len(), FIREWORK_SPARKS);
        for spark in sparks {
            assert!((FIREWORK_MIN_DISTANCE_PX..FIREWORK_MAX_DISTANCE_PX).contains(&spark.distance));
            assert!((FIREWORK_MIN_SECS..FIREWORK_MAX_SECS).contains(&spark.duration));
        }
    }
}
