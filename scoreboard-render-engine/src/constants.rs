/// Scene, camera and lighting settings for the renderer.
pub mod render_settings;
