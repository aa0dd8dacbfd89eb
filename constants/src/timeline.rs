/// Poll interval used when the config does not set one.
pub const DEFAULT_POLL_INTERVAL_SECS: f32 = 30.0;

/// Team node travel time towards the solved challenge.
pub const APPROACH_DURATION_SECS: f32 = 2.0;

/// Delay before the solve effect when the approach cannot run.
pub const APPROACH_FALLBACK_SECS: f32 = 2.0;

pub const BANNER_DURATION_SECS: f32 = 3.0;
pub const PULSE_DURATION_SECS: f32 = 3.0;

/// Pulse oscillation: scale = 1 + amplitude * sin(rate * t).
pub const PULSE_RATE: f32 = 5.0;
pub const PULSE_AMPLITUDE: f32 = 0.2;

pub const INFO_PANEL_DURATION_SECS: f32 = 5.0;
pub const PANEL_SLIDE_SECS: f32 = 0.6;

pub const FIREWORK_SPARKS: usize = 20;
pub const FIREWORK_MIN_SECS: f32 = 1.0;
pub const FIREWORK_MAX_SECS: f32 = 2.0;
pub const FIREWORK_MIN_DISTANCE_PX: f32 = 100.0;
pub const FIREWORK_MAX_DISTANCE_PX: f32 = 200.0;

pub const EXPLOSION_PARTICLES: usize = 50;
pub const EXPLOSION_DURATION_SECS: f32 = 2.0;
pub const EXPLOSION_GRAVITY: f32 = 36.0;

/// Scene spin rates, radians per second.
pub const CHALLENGE_SPIN: f32 = 0.5;
pub const TEAM_SPIN: f32 = 0.3;
pub const AMBIENT_FIELD_SPIN: f32 = 0.1;
