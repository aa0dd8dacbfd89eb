//! Shared tables for the 3D scoreboard: category styling, node layout and
//! effect timing.

/// Challenge category styles: colour and shape per known category.
pub mod category;

/// Ring layout for challenge and team nodes.
pub mod layout;

/// Durations and rates for the solve timeline and scene motion.
pub mod timeline;
