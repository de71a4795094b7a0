pub mod config;
pub mod feed;
pub mod render;
