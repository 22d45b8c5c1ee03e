pub mod animation;
pub mod app;
pub mod appliances;
pub mod camera3d;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod easing;
pub mod input;
pub mod kitchen;
pub mod mesh;
pub mod renderer;
pub mod scene_graph;
pub mod steam;
pub mod time;

pub use app::{run, run_with_overrides, App};
pub use kitchen::Kitchen;
