/// Radius of the innermost challenge ring.
pub const CHALLENGE_RING_BASE_RADIUS: f32 = 15.0;

/// Extra radius for each further category ring.
pub const CHALLENGE_RING_STEP: f32 = 5.0;

/// Vertical wave amplitude applied by index within a category.
pub const CHALLENGE_HEIGHT_AMPLITUDE: f32 = 2.0;
pub const CHALLENGE_HEIGHT_FREQUENCY: f32 = 0.5;

/// Only the first teams in scoreboard order get a node.
pub const MAX_TEAM_NODES: usize = 10;
pub const TEAM_RING_RADIUS: f32 = 8.0;

/// Team hue step per rank, as a fraction of the colour wheel.
pub const TEAM_HUE_STEP: f32 = 0.1;

/// Label card offsets above the node centre, world units.
pub const CHALLENGE_LABEL_HEIGHT: f32 = 3.0;
pub const TEAM_LABEL_HEIGHT: f32 = 2.0;
