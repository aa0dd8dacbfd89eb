//! Core application setup and lifecycle.
//!
//! Handles app construction, window configuration, runtime configuration,
//! state transitions, and engine teardown for both native and WASM targets.

/// Builds the Bevy app: plugins, resources, and state-gated systems.
pub mod app_setup;

/// `Loading` → `Running` → `Disposed` and first-poll progress tracking.
pub mod app_state;

pub mod clock;

/// Runtime settings loaded as a JSON asset.
pub mod config;

/// Render target checks, the engine handle, and idempotent disposal.
pub mod lifecycle;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
