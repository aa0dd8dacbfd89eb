use std::f32::consts::{PI, TAU};

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::window::WindowResized;

use crate::constants::render_settings::*;
use crate::engine::core::lifecycle::SceneOwned;

/// Orbit state around the scene origin. Pointer input moves the target
/// angles, the applied angles ease towards them every frame.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub radius: f32,
    pub auto_rotate: bool,
    /// Pointer travel since the left button went down.
    pub drag_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            target_yaw: 0.0,
            target_pitch: 0.0,
            radius: CAMERA_DEFAULT_RADIUS,
            auto_rotate: true,
            drag_distance: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn apply_drag(&mut self, delta: Vec2) {
        self.drag_distance += delta.length();
        self.target_yaw += delta.x * DRAG_RADIANS_PER_PIXEL;
        self.target_pitch = (self.target_pitch + delta.y * DRAG_RADIANS_PER_PIXEL)
            .clamp(-CAMERA_PITCH_LIMIT, CAMERA_PITCH_LIMIT);
    }

    /// Positive amounts zoom out.
    pub fn apply_zoom(&mut self, amount: f32) {
        self.radius = (self.radius + amount).clamp(CAMERA_MIN_RADIUS, CAMERA_MAX_RADIUS);
    }

    pub fn advance(&mut self, dt: f32) {
        if self.auto_rotate {
            self.target_yaw += AUTO_ROTATE_SPEED * dt;
        }
        let blend = 1.0 - (1.0 - CAMERA_SMOOTHING).powf(dt * 60.0);
        self.yaw += (self.target_yaw - self.yaw) * blend;
        self.pitch += (self.target_pitch - self.pitch) * blend;
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos() * self.radius,
            self.pitch.sin() * self.radius + CAMERA_HEIGHT_OFFSET,
            self.yaw.sin() * self.pitch.cos() * self.radius,
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(Vec3::ZERO, Vec3::Y)
    }

    pub fn reset(&mut self) {
        // Unwind accumulated turns so the way back is the short one.
        self.yaw = self.yaw.rem_euclid(TAU);
        if self.yaw > PI {
            self.yaw -= TAU;
        }
        self.target_yaw = 0.0;
        self.target_pitch = 0.0;
        self.radius = CAMERA_DEFAULT_RADIUS;
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }
}

/// Logical size of the render surface, tracked for screen-space effects.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ViewportSize(pub Vec2);

impl Default for ViewportSize {
    fn default() -> Self {
        Self(Vec2::new(1280.0, 720.0))
    }
}

impl ViewportSize {
    pub fn centre(&self) -> Vec2 {
        self.0 * 0.5
    }
}

pub fn spawn_orbit_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    commands.spawn((
        Name::new("Scoreboard camera"),
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(hex_colour(BACKGROUND_COLOUR)),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        DistanceFog {
            color: hex_colour(BACKGROUND_COLOUR),
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        orbit.transform(),
        SceneOwned,
    ));
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    if mouse_button.just_pressed(MouseButton::Left) {
        orbit.drag_distance = 0.0;
    }
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        orbit.apply_drag(mouse_delta);
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * WHEEL_ZOOM_PER_LINE,
            MouseScrollUnit::Pixel => ev.y * WHEEL_ZOOM_PER_PIXEL,
        };
    }
    // Wheel up moves closer.
    if scroll_accum.abs() > f32::EPSILON {
        orbit.apply_zoom(-scroll_accum);
    }

    orbit.advance(time.delta_secs());

    if let Ok(mut camera_transform) = camera_query.single_mut() {
        *camera_transform = orbit.transform();
    }
}

pub fn track_viewport_size(
    mut resize_events: EventReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
) {
    if let Some(resized) = resize_events.read().last() {
        viewport.0 = Vec2::new(resized.width, resized.height);
    }
}
