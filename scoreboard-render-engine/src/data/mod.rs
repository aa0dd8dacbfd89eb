//! Remote scoreboard data: wire schema, in-memory store, polling and
//! solve-event detection.
//!
//! ## Data Flow
//!
//! ```text
//! PollSchedule tick
//!   └─> ScoreboardBackend::request(endpoint)      (async, off the frame)
//!       └─> FetchQueue                             (shared outcome queue)
//!           └─> drain_fetch_results()              (decode + validate)
//!               └─> SceneMutation events
//!                   └─> apply_scene_mutations()    (single writer)
//!                       ├─> ScoreboardData         (node sync follows)
//!                       └─> SolveDetector          (new solves spawn animations)
//! ```
//!
//! Every change to the entity lists or the seen-event set goes through
//! `apply_scene_mutations`, one event at a time, in arrival order.

/// Activity feed store fed by animated solves.
pub mod activity;

/// Backend seam and the HTTP implementation for native and WASM targets.
pub mod backend;

/// De-duplicated solve detection over correct submissions.
pub mod detector;

/// Scene mutation events and the single system that applies them.
pub mod mutations;

/// Fixed-interval polling and decoding of backend responses.
pub mod poller;

/// Wire records, validated domain types and boundary validation.
pub mod schema;

/// Current challenge and team lists.
pub mod store;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use activity::ActivityFeed;
use backend::FetchQueue;
use detector::SolveDetector;
use mutations::{SceneMutation, apply_scene_mutations};
use poller::{PollState, drain_fetch_results, schedule_polls};
use store::ScoreboardData;

pub struct DataSyncPlugin;

impl Plugin for DataSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScoreboardData>()
            .init_resource::<SolveDetector>()
            .init_resource::<ActivityFeed>()
            .init_resource::<FetchQueue>()
            .init_resource::<PollState>()
            .add_event::<SceneMutation>()
            .add_systems(
                Update,
                (schedule_polls, drain_fetch_results, apply_scene_mutations)
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
