//! Static scene dressing: lights, the ambient particle field, and the
//! constant spin applied to node groups.

/// Ambient particle field surrounding the scoreboard.
pub mod ambient_particles;

/// Ambient, directional and coloured point lights.
pub mod lighting;

/// Merged tetrahedron meshes used for particle clouds.
pub mod particle_mesh;

/// Constant rotation of spinning scene elements.
pub mod spin;
