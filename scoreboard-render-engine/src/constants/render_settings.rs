use bevy::prelude::*;

pub const BACKGROUND_COLOUR: u32 = 0x1A1A2E;
pub const FOG_START: f32 = 50.0;
pub const FOG_END: f32 = 200.0;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Orbit centre sits on the origin, the eye is lifted by this much.
pub const CAMERA_HEIGHT_OFFSET: f32 = 20.0;
pub const CAMERA_DEFAULT_RADIUS: f32 = 30.0;
pub const CAMERA_MIN_RADIUS: f32 = 10.0;
pub const CAMERA_MAX_RADIUS: f32 = 100.0;
pub const CAMERA_PITCH_LIMIT: f32 = 1.5;
pub const DRAG_RADIANS_PER_PIXEL: f32 = 0.01;
pub const AUTO_ROTATE_SPEED: f32 = 0.3;
/// Fraction of the remaining angle covered per 60 Hz frame.
pub const CAMERA_SMOOTHING: f32 = 0.1;
pub const WHEEL_ZOOM_PER_PIXEL: f32 = 0.1;
pub const WHEEL_ZOOM_PER_LINE: f32 = 2.0;

/// Pointer travel beyond which a press counts as a drag, not a click.
pub const CLICK_SLOP_PX: f32 = 4.0;

pub const AMBIENT_LIGHT_COLOUR: u32 = 0x404040;
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 400.0;
pub const DIRECTIONAL_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
pub const DIRECTIONAL_LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const POINT_LIGHT_RANGE: f32 = 30.0;
pub const POINT_LIGHT_INTENSITY: f32 = 400_000.0;
pub const POINT_LIGHTS: [(u32, Vec3); 3] = [
    (0x007AFF, Vec3::new(-15.0, 10.0, -15.0)),
    (0xFF3B30, Vec3::new(15.0, 10.0, -15.0)),
    (0x34C759, Vec3::new(0.0, 10.0, 15.0)),
];

pub const AMBIENT_PARTICLE_COUNT: usize = 1000;
pub const AMBIENT_MIN_RADIUS: f32 = 50.0;
pub const AMBIENT_RADIUS_SPREAD: f32 = 100.0;
pub const AMBIENT_PARTICLE_SIZE: f32 = 0.35;
pub const AMBIENT_HUE_RANGE: (f32, f32) = (0.6, 0.7);
pub const AMBIENT_PARTICLE_ALPHA: f32 = 0.6;

pub const NODE_OPACITY: f32 = 0.8;
pub const GLOW_SCALE: f32 = 1.2;
pub const GLOW_OPACITY: f32 = 0.2;
pub const TEAM_NODE_RADIUS: f32 = 0.8;
pub const SOLVE_GLOW_RADIUS: f32 = 3.0;
pub const SOLVE_GLOW_OPACITY: f32 = 0.3;

pub const EXPLOSION_PARTICLE_SIZE: f32 = 0.3;
pub const EXPLOSION_HORIZONTAL_SPEED: f32 = 15.0;
pub const EXPLOSION_VERTICAL_SPEED: (f32, f32) = (6.0, 36.0);

/// `0xRRGGBB` to an sRGB colour.
pub fn hex_colour(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_splits_channels() {
        assert_eq!(hex_colour(0xFFD700), Color::srgb_u8(255, 215, 0));
    }
}
