use bevy::prelude::*;

/// Constant rotation about the Y axis, in radians per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct Spin(pub f32);

pub fn spin_scene_elements(time: Res<Time>, mut spinning: Query<(&Spin, &mut Transform)>) {
    let dt = time.delta_secs();
    for (spin, mut transform) in &mut spinning {
        transform.rotate_y(spin.0 * dt);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn spin_follows_elapsed_time() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, spin_scene_elements);
        let entity = app.world_mut().spawn((Spin(0.5), Transform::default())).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(2));
        app.update();

        let rotation = app.world().get::<Transform>(entity).unwrap().rotation;
        let (axis, angle) = rotation.to_axis_angle();
        assert!((angle - 1.0).abs() < 1e-4);
        assert!((axis - Vec3::Y).length() < 1e-4);
    }
}
