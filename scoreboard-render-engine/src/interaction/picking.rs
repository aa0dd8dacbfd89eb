use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::info_panel::InfoPanel;
use super::ray::ray_hits_obb;
use crate::constants::render_settings::CLICK_SLOP_PX;
use crate::data::schema::ChallengeId;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::nodes::registry::{ChallengeNode, PickBounds};

/// Nearest hit among candidates that belong to a challenge.
pub fn nearest_challenge_hit(
    origin: Vec3,
    dir: Vec3,
    candidates: impl IntoIterator<Item = (GlobalTransform, Vec3, Option<ChallengeId>)>,
) -> Option<ChallengeId> {
    candidates
        .into_iter()
        .filter_map(|(xf, half_extents, id)| {
            let t = ray_hits_obb(origin, dir, &xf, half_extents)?;
            Some((t, id?))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

pub fn pick_challenge_on_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    orbit: Res<OrbitCamera>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    nodes: Query<(&GlobalTransform, &PickBounds, Option<&ChallengeNode>)>,
    mut info_panel: ResMut<InfoPanel>,
) {
    if !mouse_button.just_released(MouseButton::Left) || orbit.drag_distance >= CLICK_SLOP_PX {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let candidates = nodes
        .iter()
        .map(|(xf, bounds, challenge)| (*xf, bounds.half_extents, challenge.map(|c| c.id)));
    if let Some(id) = nearest_challenge_hit(ray.origin, *ray.direction, candidates) {
        debug!("Picked challenge {}", id);
        info_panel.open(id, time.elapsed_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(z: f32) -> GlobalTransform {
        GlobalTransform::from(Transform::from_xyz(0.0, 0.0, z))
    }

    #[test]
    fn nearest_challenge_wins() {
        let hit = nearest_challenge_hit(
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::Z,
            [
                (at(5.0), Vec3::ONE, Some(ChallengeId(2))),
                (at(-5.0), Vec3::ONE, Some(ChallengeId(1))),
            ],
        );
        assert_eq!(hit, Some(ChallengeId(1)));
    }

    #[test]
    fn team_nodes_do_not_block_challenges() {
        let hit = nearest_challenge_hit(
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::Z,
            [
                (at(-10.0), Vec3::ONE, None),
                (at(0.0), Vec3::ONE, Some(ChallengeId(7))),
            ],
        );
        assert_eq!(hit, Some(ChallengeId(7)));
    }

    #[test]
    fn empty_space_picks_nothing() {
        let hit = nearest_challenge_hit(
            Vec3::new(0.0, 10.0, -20.0),
            Vec3::Z,
            [(at(0.0), Vec3::ONE, Some(ChallengeId(7)))],
        );
        assert_eq!(hit, None);
    }
}
