//! JSON-RPC 2.0 bridge between the engine and the page hosting it.
//!
//! The host posts requests or notifications with `postMessage`; the engine
//! acts on both, replies only to requests carrying an `id`, and pushes its
//! own notifications back the same way.
//!
//! ```text
//! Host page  <──postMessage──>  Engine
//!    ├─ Request (with ID) ────────> act, reply
//!    ├─ Notification (no ID) ─────> act
//!    │ <──── activity_added / loading_finished / fps_update
//! ```
//!
//! ## Methods
//!
//! - `reset_camera`, `toggle_auto_rotate`, `toggle_panels`, `toggle_fullscreen`
//! - `test_solve_effect`: optional `submission`; without one the engine
//!   makes up a solve for the first team on the first challenge
//! - `check_submission`: `submission` runs through solve detection
//! - `dispose`: tear the engine down
//! - `get_fps`: current smoothed frame rate
//!
//! The `reset-camera` and `toggle-auto-rotate` window events, and page
//! unload, arrive as notifications on the same queue.
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (including submissions that fail validation)

/// Message queue, request routing and outgoing notifications.
pub mod web_rpc;
