//! Solve celebration effects.
//!
//! A `SolveAnimation` entity is spawned for every new solve. It announces
//! the solve, moves the team node onto the challenge, then fires the
//! glow, explosion and fireworks while the challenge pulses.

/// Easing curves shared by the effects.
pub mod easing;

/// 3D particle burst with gravity.
pub mod explosion;

/// Screen-space fireworks.
pub mod fireworks;

/// Per-solve animation timeline.
pub mod orchestrator;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use crate::engine::nodes::sync::sync_team_nodes;
use explosion::animate_explosions;
use fireworks::animate_fireworks;
use orchestrator::{SolveCelebration, advance_solve_animations, celebrate_solves};

pub struct SolveEffectsPlugin;

impl Plugin for SolveEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SolveCelebration>().add_systems(
            Update,
            (
                advance_solve_animations,
                celebrate_solves,
                animate_fireworks,
                animate_explosions,
            )
                .chain()
                .after(sync_team_nodes)
                .run_if(in_state(AppState::Running)),
        );
    }
}
