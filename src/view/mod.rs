pub mod camera;
pub mod geometry;
pub mod renderer;

pub use camera::Camera;
pub use renderer::{SceneLayers, SceneRenderer};
