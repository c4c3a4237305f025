pub mod config;
pub mod engine;
pub mod map;
pub mod math;
pub mod renderer;
pub mod session;
pub mod world;

pub use session::{Session, render};
