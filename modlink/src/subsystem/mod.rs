pub mod components;
pub mod resources;
pub mod world;
