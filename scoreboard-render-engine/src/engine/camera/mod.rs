//! Orbiting scene camera.
//!
//! Drag rotates the view around the origin, the wheel zooms, and an
//! optional auto-rotation slowly spins the scene when idle.

/// Orbit camera resource, spawn helper and controller system.
pub mod orbit_camera;
