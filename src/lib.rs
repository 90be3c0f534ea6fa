pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod render;
pub mod version;
