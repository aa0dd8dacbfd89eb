//! Runtime diagnostics.

/// FPS notifications to the host page and the native overlay text.
pub mod fps_tracking;
