pub mod app;
pub mod color;
pub mod config;
pub mod gradient;
pub mod palette;
pub mod palette_file;
pub mod render;
pub mod terminal;
pub mod wheel;
pub mod wire;
