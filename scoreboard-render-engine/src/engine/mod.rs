pub mod camera;
pub mod core;
pub mod effects;
pub mod nodes;
pub mod scene;
pub mod systems;
